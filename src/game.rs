use std::{sync::Arc, time::Instant};

use crate::{
	angle::Angle,
	camera::Camera,
	config::Config,
	firstperson::{floorceil::{FloorCeilingCaster, FloorDistances}, Frame, ProjectionPlane},
	grid::WorldGrid,
	input::Command,
	raycasting::WallCaster,
	texture::Texture,
	trig::AngleTable
};

pub struct Textures {
	pub walls: Vec<Texture>,
	pub floor: Texture,
	pub ceiling: Texture
}

impl Textures {
	pub const SIZE: u32 = 64;

	/// Configured textures, generated checkers for anything missing.
	pub fn from_config(config: &Config) -> Self {
		let render = &config.render;
		let mut walls: Vec<Texture> = render.wall_textures.iter()
			.map(|path| Texture::load_or_checker(Some(path), Self::SIZE, [150, 40, 40, 255], [110, 25, 25, 255]))
			.collect();
		if walls.is_empty() {
			walls.push(Texture::checker(Self::SIZE, [150, 40, 40, 255], [110, 25, 25, 255]));
		}
		Self {
			walls,
			floor: Texture::load_or_checker(render.floor_texture.as_deref(), Self::SIZE, [90, 90, 90, 255], [70, 70, 70, 255]),
			ceiling: Texture::load_or_checker(render.ceiling_texture.as_deref(), Self::SIZE, [120, 90, 60, 255], [100, 75, 50, 255])
		}
	}
}

#[derive(Clone, Copy, Debug)]
pub struct Movement {
	pub move_speed: f32,
	pub turn_speed: f32,
	pub clip_distance: f32
}

/// Everything one running view needs: world, camera, casters and the
/// frame they produce. Redraws only after the pose changed.
pub struct Session {
	grid: WorldGrid,
	camera: Camera,
	movement: Movement,
	wall_caster: WallCaster,
	floorceil_caster: FloorCeilingCaster,
	plane: ProjectionPlane,
	background: Frame,
	textures: Textures,
	dirty: bool
}

impl Session {
	pub fn new(config: &Config, table: Arc<AngleTable>, grid: WorldGrid, start: glam::Vec2, textures: Textures) -> Self {
		let view = &config.view;
		let render = &config.render;
		let cubesize = grid.cell_edge_length();

		let camera = Camera::new(table.clone(), start, Angle::new(0.0), view.fov, cubesize);
		let texture_width = textures.walls.first().map_or(Textures::SIZE, Texture::width);
		let wall_caster = WallCaster::new(
			table.clone(), view.width, view.height, view.fov,
			render.ray_step, render.max_distance, texture_width
		);

		let distances = Arc::new(FloorDistances::new(
			wall_caster.projection_distance(),
			view.height, config.eye_height(), render.max_distance
		));
		let floorceil_caster = FloorCeilingCaster::new(table, distances, view.width, view.height);

		log::info!("session {}x{} fov {} grid {}x{} start ({:.1}, {:.1})",
			view.width, view.height, view.fov, grid.size(), grid.size(), start.x, start.y);

		Self {
			grid, camera,
			movement: Movement {
				move_speed: config.movement.move_speed,
				turn_speed: config.movement.turn_speed,
				clip_distance: config.movement.clip_distance
			},
			wall_caster, floorceil_caster,
			plane: ProjectionPlane::new(view.width, view.height),
			background: Frame::new(view.width, view.height),
			textures,
			dirty: true
		}
	}

	/// Runs one command. Returns false once the session should end.
	pub fn apply(&mut self, command: Command) -> bool {
		let Movement { move_speed, turn_speed, clip_distance } = self.movement;
		match command {
			Command::MoveForward => self.try_walk(clip_distance, move_speed),
			Command::MoveBackward => self.try_walk(-clip_distance, -move_speed),
			Command::TurnLeft => {
				self.camera.rotate(-turn_speed);
				self.dirty = true;
			},
			Command::TurnRight => {
				self.camera.rotate(turn_speed);
				self.dirty = true;
			},
			Command::Quit => return false
		}
		log::trace!("{:?} -> pos ({:.1}, {:.1}) heading {}",
			command, self.camera.position.x, self.camera.position.y, self.camera.heading);
		true
	}

	fn try_walk(&mut self, range: f32, speed: f32) {
		if self.camera.cast_collision_ray(&self.grid, range) {
			self.camera.walk(speed);
			self.dirty = true;
		} else {
			log::debug!("blocked at ({:.1}, {:.1})", self.camera.position.x, self.camera.position.y);
		}
	}

	pub fn is_dirty(&self) -> bool {
		self.dirty
	}

	/// Recomputes the frame if the pose changed since the last redraw.
	pub fn redraw(&mut self) -> Option<&Frame> {
		if !self.dirty {
			return None;
		}
		let started = Instant::now();

		let walls = self.wall_caster.cast(&self.grid, &self.camera);
		self.floorceil_caster.render(&self.camera, &self.textures.floor, &self.textures.ceiling, &mut self.background);
		self.plane.compose(&walls, &self.background, &self.textures.walls);
		self.dirty = false;

		log::debug!("redraw in {:.2?}", started.elapsed());
		Some(self.plane.frame())
	}

	pub fn camera(&self) -> &Camera {
		&self.camera
	}

	pub fn grid(&self) -> &WorldGrid {
		&self.grid
	}

	pub fn wall_caster(&self) -> &WallCaster {
		&self.wall_caster
	}
}


#[cfg(test)]
fn test_session() -> Session {
	let mut config = Config::default();
	config.view.width = 41;
	config.view.height = 30;
	let grid = WorldGrid::from_rows(&[
		"#####",
		"#...#",
		"#...#",
		"#...#",
		"#####"
	], 64.0);
	let start = grid.cell_center(2, 2);
	let textures = Textures {
		walls: vec![Texture::solid(64, [200, 0, 0, 255])],
		floor: Texture::solid(64, [0, 200, 0, 255]),
		ceiling: Texture::solid(64, [0, 0, 200, 255])
	};
	Session::new(&config, Arc::new(AngleTable::new()), grid, start, textures)
}

#[test]
fn redraw_only_when_dirty() {
	let mut session = test_session();
	assert!(session.redraw().is_some());
	assert!(session.redraw().is_none());

	session.apply(Command::TurnRight);
	assert!(session.redraw().is_some());
	assert!(!session.is_dirty());
}

#[test]
fn blocked_move_leaves_frame_clean() {
	let mut session = test_session();
	session.redraw();
	assert!(session.apply(Command::MoveForward));
	assert!(session.is_dirty());
	session.redraw();

	// walk until the probe reaches the wall at y = 256
	for _ in 0..10 {
		session.apply(Command::MoveForward);
		session.redraw();
	}
	let before = session.camera().position;
	assert!(before.y + 50.0 >= 256.0 && before.y < 256.0);
	session.apply(Command::MoveForward);
	assert_eq!(session.camera().position, before);
	assert!(!session.is_dirty());
}

#[test]
fn quit_ends_session() {
	let mut session = test_session();
	assert!(!session.apply(Command::Quit));
}

#[test]
fn frame_has_ceiling_wall_and_floor() {
	let mut session = test_session();
	let frame = session.redraw().unwrap();
	assert_eq!((frame.width(), frame.height()), (41, 30));
	assert_eq!(frame.pixel(20, 0), [0, 0, 200, 255]);
	assert_eq!(frame.pixel(20, 15), [200, 0, 0, 255]);
	assert_eq!(frame.pixel(20, 29), [0, 200, 0, 255]);
}
