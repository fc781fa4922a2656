use std::{sync::Arc, time::{Duration, Instant}};

use winit::{
	event::{Event, StartCause, WindowEvent},
	event_loop::{ControlFlow, EventLoop},
	window::WindowBuilder,
};

/*

Grid ray caster.

trig, angle:       build-once lookup table and the wrapped heading type
grid, camera:      world cells and the pose moving through them
raycasting:        one wall ray per screen column
firstperson:       floor/ceiling background and the composed frame
game:              Session ties them together behind a dirty flag

Everything below `game` is plain CPU code. The window (winit) and the
presenter (wgpu) only show the finished frame.

*/

pub mod angle;
pub mod asset;
pub mod camera;
pub mod config;
pub mod firstperson;
pub mod game;
pub mod grid;
pub mod input;
pub mod raycasting;
pub mod rendering;
pub mod texture;
pub mod trig;
pub mod webgpu;

use config::Config;
use game::{Session, Textures};
use grid::WorldGrid;
use trig::AngleTable;

/// Builds the session described by `config`: map (or the demo map),
/// textures and the shared lookup tables.
pub fn build_session(config: &Config) -> anyhow::Result<Session> {
	let table = Arc::new(AngleTable::new());
	let cubesize = config.world.cubesize;

	let (grid, start) = match &config.world.map {
		Some(path) => {
			let mut grid = WorldGrid::new(config.world.grid_size, cubesize);
			let start = asset::load_map(path, &mut grid)?;
			let start = start.unwrap_or_else(|| {
				log::warn!("map {} has no start marker, starting in cell (1, 1)", path.display());
				grid.cell_center(1, 1)
			});
			(grid, start)
		},
		None => {
			log::info!("no map configured, using the demo map");
			let grid = WorldGrid::from_rows(&asset::DEMO_MAP, cubesize);
			let start = grid.cell_center(asset::DEMO_START.0, asset::DEMO_START.1);
			(grid, start)
		}
	};
	log::debug!("grid:\n{}", grid);

	Ok(Session::new(config, table, grid, start, Textures::from_config(config)))
}

/// Counts presented frames and reports a rate once per interval.
pub struct FrameRate {
	interval: Duration,
	since: Instant,
	frames: u32
}

impl FrameRate {
	pub fn new(interval: Duration, now: Instant) -> Self {
		Self { interval, since: now, frames: 0 }
	}

	pub fn record_frame(&mut self) {
		self.frames += 1;
	}

	/// Frames per second over the last interval, once it has elapsed.
	pub fn poll(&mut self, now: Instant) -> Option<f32> {
		let elapsed = now.duration_since(self.since);
		if elapsed < self.interval {
			return None;
		}
		let fps = self.frames as f32 / elapsed.as_secs_f32();
		self.since = now;
		self.frames = 0;
		Some(fps)
	}
}

/// Opens the window and runs the command/redraw loop until quit.
pub fn run(config: Config) -> anyhow::Result<()> {
	let mut session = build_session(&config)?;

	let event_loop = EventLoop::new()
		.map_err(|e| anyhow::anyhow!("failed to create event loop: {}", e))?;
	let window = Arc::new(WindowBuilder::new()
		.with_title(config.view.title.as_str())
		.with_inner_size(winit::dpi::LogicalSize::new(config.view.width, config.view.height))
		.build(&event_loop)
		.map_err(|e| anyhow::anyhow!("failed to create window: {}", e))?);
	let mut webgpu = webgpu::WebGPU::new(window.clone())?;
	let presenter = rendering::FramePresenter::new(&webgpu, config.view.width, config.view.height);
	let mut input_state = input::InputState::default();

	let command_interval = Duration::from_millis(config.movement.command_interval_ms.max(1));
	let mut last_command_tick = Instant::now();
	let mut frame_rate = FrameRate::new(Duration::from_secs(1), last_command_tick);
	let title = config.view.title.clone();

	event_loop.run(
		move |event, elwt|
		match event
		{
			Event::WindowEvent { event, window_id } if window_id == window.id() =>
			match event
			{
				WindowEvent::KeyboardInput { event: winit::event::KeyEvent {
					physical_key: winit::keyboard::PhysicalKey::Code(keycode),
					state, repeat: false, ..
				}, .. } => input_state.set_key_state(keycode, state.is_pressed()),
				WindowEvent::RedrawRequested => match presenter.render(&webgpu) {
					Ok(()) => frame_rate.record_frame(),
					Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => webgpu.reconfigure(),
					Err(wgpu::SurfaceError::OutOfMemory) => {
						log::error!("out of GPU memory");
						elwt.exit();
					},
					Err(e) => log::warn!("frame skipped: {:?}", e)
				},
				WindowEvent::CloseRequested => elwt.exit(),
				WindowEvent::Resized(physical_size) if physical_size.width > 0 && physical_size.height > 0 => {
					webgpu.reconfigure_surface_size(physical_size.width, physical_size.height);
					window.request_redraw();
				},
				_ => ()
			},
			Event::NewEvents(StartCause::Init) => {
				if let Some(frame) = session.redraw() {
					presenter.upload(&webgpu, frame);
				}
				window.request_redraw();
			},
			Event::NewEvents(StartCause::Poll | StartCause::ResumeTimeReached { .. } | StartCause::WaitCancelled { .. }) =>
			{
				if Instant::now().duration_since(last_command_tick) < command_interval {
					return;
				}
				last_command_tick = Instant::now();

				if let Some(fps) = frame_rate.poll(last_command_tick) {
					window.set_title(&format!("{} - {:.0} fps", title, fps));
				}

				let commands = input_state.commands();
				input_state.end_frame();
				for command in commands {
					if !session.apply(command) {
						log::info!("quit");
						elwt.exit();
						return;
					}
				}

				if let Some(frame) = session.redraw() {
					presenter.upload(&webgpu, frame);
					window.request_redraw();
				}
			},
			Event::AboutToWait =>
			{
				let since_tick = Instant::now().duration_since(last_command_tick);
				if since_tick >= command_interval {
					elwt.set_control_flow(ControlFlow::Poll);
				}
				else {
					elwt.set_control_flow(ControlFlow::WaitUntil(Instant::now() + command_interval - since_tick));
				}
			},
			_ => ()
		}
	).map_err(|e| anyhow::anyhow!("event loop failed: {}", e))
}


#[test]
fn frame_rate_reports_once_per_interval() {
	let start = Instant::now();
	let mut frame_rate = FrameRate::new(Duration::from_secs(1), start);
	for _ in 0..30 {
		frame_rate.record_frame();
	}
	assert_eq!(frame_rate.poll(start + Duration::from_millis(500)), None);

	let fps = frame_rate.poll(start + Duration::from_secs(2)).unwrap();
	assert!((fps - 15.0).abs() < 0.01);

	// counter restarts, an idle second reads zero
	assert_eq!(frame_rate.poll(start + Duration::from_secs(3)), Some(0.0));
}
