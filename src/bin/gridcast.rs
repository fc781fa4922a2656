use std::{error::Error, path::PathBuf};

use argh::FromArgs;
use simplelog::TermLogger;

use gridcast_3d::config::{Config, DEFAULT_CONFIG_PATH};

/// Grid ray caster. W/S or arrows move, A/D or arrows turn, Escape quits.
#[derive(Debug, FromArgs)]
struct CLIOptions {
	/// path to the TOML configuration file
	#[argh(option, default = "PathBuf::from(DEFAULT_CONFIG_PATH)")]
	config: PathBuf,
	/// map image, overrides the configured one
	#[argh(option)]
	map: Option<PathBuf>,
	/// verbose level: off, error, warn, info, debug, trace
	#[argh(option)]
	verbose: Option<log::LevelFilter>
}

fn main() -> Result<(), Box<dyn Error>> {
	let options: CLIOptions = argh::from_env();

	// logger accepts everything, the max level below does the filtering
	TermLogger::init(
		log::LevelFilter::Trace,
		simplelog::ConfigBuilder::default()
			.set_time_level(log::LevelFilter::Trace)
			.build(),
		simplelog::TerminalMode::Mixed,
		simplelog::ColorChoice::Auto,
	)?;
	log::set_max_level(options.verbose.unwrap_or(log::LevelFilter::Info));

	let mut config = Config::load(&options.config)?;
	log::set_max_level(options.verbose.unwrap_or(config.logging.level));

	if let Some(map) = options.map {
		config.world.map = Some(map);
	}

	gridcast_3d::run(config)?;
	Ok(())
}
