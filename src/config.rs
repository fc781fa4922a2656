use std::{fs, path::{Path, PathBuf}};

use anyhow::Context;
use serde::Deserialize;

use crate::raycasting::MIN_RAY_STEP;

pub const DEFAULT_CONFIG_PATH: &str = "gridcast.toml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
	#[serde(default)]
	pub view: ViewConfig,
	#[serde(default)]
	pub world: WorldConfig,
	#[serde(default)]
	pub movement: MovementConfig,
	#[serde(default)]
	pub render: RenderConfig,
	#[serde(default)]
	pub logging: LoggingConfig
}

#[derive(Debug, Clone, Deserialize)]
pub struct ViewConfig {
	#[serde(default = "default_width")]
	pub width: u32,
	#[serde(default = "default_height")]
	pub height: u32,
	#[serde(default = "default_fov")]
	pub fov: f32,
	#[serde(default = "default_title")]
	pub title: String
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorldConfig {
	#[serde(default = "default_grid_size")]
	pub grid_size: u32,
	#[serde(default = "default_cubesize")]
	pub cubesize: f32,
	#[serde(default)]
	pub map: Option<PathBuf>
}

#[derive(Debug, Clone, Deserialize)]
pub struct MovementConfig {
	#[serde(default = "default_move_speed")]
	pub move_speed: f32,
	#[serde(default = "default_turn_speed")]
	pub turn_speed: f32,
	#[serde(default = "default_clip_distance")]
	pub clip_distance: f32,
	#[serde(default = "default_command_interval_ms")]
	pub command_interval_ms: u64
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
	#[serde(default = "default_ray_step")]
	pub ray_step: f32,
	#[serde(default = "default_max_distance")]
	pub max_distance: f32,
	/// Defaults to half the cube size, which puts the horizon at wall centre.
	#[serde(default)]
	pub eye_height: Option<f32>,
	#[serde(default)]
	pub wall_textures: Vec<PathBuf>,
	#[serde(default)]
	pub floor_texture: Option<PathBuf>,
	#[serde(default)]
	pub ceiling_texture: Option<PathBuf>
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
	#[serde(default = "default_log_level")]
	pub level: log::LevelFilter
}

fn default_width() -> u32 { 400 }
fn default_height() -> u32 { 300 }
fn default_fov() -> f32 { 60.0 }
fn default_title() -> String { "gridcast".to_string() }
fn default_grid_size() -> u32 { 32 }
fn default_cubesize() -> f32 { 64.0 }
fn default_move_speed() -> f32 { 15.0 }
fn default_turn_speed() -> f32 { 10.0 }
fn default_clip_distance() -> f32 { 50.0 }
fn default_command_interval_ms() -> u64 { 50 }
fn default_ray_step() -> f32 { 1.0 }
fn default_max_distance() -> f32 { 9999.0 }
fn default_log_level() -> log::LevelFilter { log::LevelFilter::Info }

impl Default for ViewConfig {
	fn default() -> Self {
		Self {
			width: default_width(),
			height: default_height(),
			fov: default_fov(),
			title: default_title()
		}
	}
}

impl Default for WorldConfig {
	fn default() -> Self {
		Self {
			grid_size: default_grid_size(),
			cubesize: default_cubesize(),
			map: None
		}
	}
}

impl Default for MovementConfig {
	fn default() -> Self {
		Self {
			move_speed: default_move_speed(),
			turn_speed: default_turn_speed(),
			clip_distance: default_clip_distance(),
			command_interval_ms: default_command_interval_ms()
		}
	}
}

impl Default for RenderConfig {
	fn default() -> Self {
		Self {
			ray_step: default_ray_step(),
			max_distance: default_max_distance(),
			eye_height: None,
			wall_textures: Vec::new(),
			floor_texture: None,
			ceiling_texture: None
		}
	}
}

impl Default for LoggingConfig {
	fn default() -> Self {
		Self { level: default_log_level() }
	}
}

impl Config {
	pub fn parse(contents: &str) -> anyhow::Result<Self> {
		let config: Config = toml::from_str(contents).context("invalid configuration")?;
		config.validate()?;
		Ok(config)
	}

	/// Reads `path`. A missing file yields the defaults.
	pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
		let path = path.as_ref();
		match fs::read_to_string(path) {
			Ok(contents) => {
				let config = Self::parse(&contents)
					.with_context(|| format!("failed to parse {}", path.display()))?;
				log::info!("loaded configuration from {}", path.display());
				Ok(config)
			},
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
				log::info!("no {} found, using default configuration", path.display());
				Ok(Self::default())
			},
			Err(e) => Err(e).with_context(|| format!("failed to read {}", path.display()))
		}
	}

	pub fn validate(&self) -> anyhow::Result<()> {
		anyhow::ensure!(self.view.width > 0 && self.view.height > 0, "viewport must be at least 1x1");
		anyhow::ensure!(self.view.fov > 0.0 && self.view.fov < 180.0, "fov must be within (0, 180) degrees");
		anyhow::ensure!(self.world.cubesize > 0.0, "cubesize must be positive");
		anyhow::ensure!(self.world.grid_size > 0, "grid_size must be positive");
		anyhow::ensure!(self.render.ray_step >= MIN_RAY_STEP, "ray_step must be at least {}", MIN_RAY_STEP);
		anyhow::ensure!(self.render.max_distance > 0.0, "max_distance must be positive");
		anyhow::ensure!(
			self.eye_height() > 0.0 && self.eye_height() < self.world.cubesize,
			"eye_height must lie between the floor and the ceiling (0, {})", self.world.cubesize
		);
		Ok(())
	}

	pub fn eye_height(&self) -> f32 {
		self.render.eye_height.unwrap_or(self.world.cubesize / 2.0)
	}
}


#[test]
fn empty_file_gives_defaults() {
	let config = Config::parse("").unwrap();
	assert_eq!(config.view.width, 400);
	assert_eq!(config.view.height, 300);
	assert_eq!(config.movement.move_speed, 15.0);
	assert_eq!(config.movement.clip_distance, 50.0);
	assert_eq!(config.render.max_distance, 9999.0);
	assert_eq!(config.eye_height(), 32.0);
	assert_eq!(config.logging.level, log::LevelFilter::Info);
}

#[test]
fn partial_sections_keep_other_defaults() {
	let config = Config::parse(r#"
		[view]
		width = 320
		[world]
		map = "content/map1.png"
		[render]
		eye_height = 40.0
		wall_textures = ["a.png", "b.png"]
		[logging]
		level = "debug"
	"#).unwrap();
	assert_eq!(config.view.width, 320);
	assert_eq!(config.view.height, 300);
	assert_eq!(config.world.map, Some(PathBuf::from("content/map1.png")));
	assert_eq!(config.world.cubesize, 64.0);
	assert_eq!(config.eye_height(), 40.0);
	assert_eq!(config.render.wall_textures.len(), 2);
	assert_eq!(config.render.ray_step, 1.0);
	assert_eq!(config.logging.level, log::LevelFilter::Debug);
}

#[test]
fn rejects_degenerate_fov() {
	assert!(Config::parse("[view]\nfov = 180.0").is_err());
	assert!(Config::parse("[view]\nwidth = 0").is_err());
}

#[test]
fn rejects_degenerate_eye_height() {
	assert!(Config::parse("[render]\neye_height = -10.0").is_err());
	assert!(Config::parse("[render]\neye_height = 0.0").is_err());
	assert!(Config::parse("[render]\neye_height = 64.0").is_err());
	assert!(Config::parse("[world]\ncubesize = 16.0\n[render]\neye_height = 20.0").is_err());
	assert!(Config::parse("[render]\neye_height = 10.0").is_ok());
	// default follows the cube size
	assert!(Config::parse("[world]\ncubesize = 16.0").is_ok());
}

#[test]
fn rejects_ray_step_below_minimum() {
	assert!(Config::parse("[render]\nray_step = 1e-9").is_err());
	assert!(Config::parse("[render]\nray_step = 0.0").is_err());
	assert!(Config::parse("[render]\nray_step = 0.5").is_ok());
}

#[test]
fn missing_file_uses_defaults() {
	let config = Config::load("definitely/not/here.toml").unwrap();
	assert_eq!(config.world.grid_size, 32);
}
