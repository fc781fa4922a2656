use std::sync::Arc;

use gridcast_3d::{
	asset,
	config::Config,
	game::{Session, Textures},
	grid::{WorldGrid, EMPTY},
	input::Command,
	texture::Texture,
	trig::AngleTable
};

fn one_cell_room() -> (Config, WorldGrid) {
	let mut config = Config::default();
	config.view.width = 41;
	config.view.height = 300;
	config.movement.move_speed = 10.0;
	config.movement.clip_distance = 20.0;
	let grid = WorldGrid::from_rows(&[
		"###",
		"#.#",
		"###"
	], 64.0);
	(config, grid)
}

fn solid_textures() -> Textures {
	Textures {
		walls: vec![Texture::solid(64, [200, 0, 0, 255])],
		floor: Texture::solid(64, [0, 200, 0, 255]),
		ceiling: Texture::solid(64, [0, 0, 200, 255])
	}
}

fn central_height(session: &Session) -> u32 {
	session.wall_caster().cast(session.grid(), session.camera()).heights[20]
}

#[test]
fn walk_up_to_the_wall() {
	let (config, grid) = one_cell_room();
	let start = grid.cell_center(1, 1);
	let mut session = Session::new(&config, Arc::new(AngleTable::new()), grid, start, solid_textures());
	assert!(session.redraw().is_some());
	let first_height = central_height(&session);

	// probe at 116 is open, step to 106
	session.apply(Command::MoveForward);
	let moved = session.camera().position;
	assert!((moved.y - 106.0).abs() < 0.01);
	assert!(session.redraw().is_some());
	let second_height = central_height(&session);
	assert!(second_height > first_height);

	// probe at 126 is still open, step to 116
	session.apply(Command::MoveForward);
	session.redraw();
	let third_height = central_height(&session);
	assert!(third_height > second_height);

	// probe at 136 lands in the wall: no movement, nothing to redraw
	let before = session.camera().position;
	session.apply(Command::MoveForward);
	assert_eq!(session.camera().position, before);
	assert!(session.redraw().is_none());
	assert_eq!(central_height(&session), third_height);
}

#[test]
fn backpedal_is_probed_behind() {
	let (config, grid) = one_cell_room();
	let start = grid.cell_center(1, 1);
	let mut session = Session::new(&config, Arc::new(AngleTable::new()), grid, start, solid_textures());

	session.apply(Command::MoveBackward);
	assert!((session.camera().position.y - 86.0).abs() < 0.01);
	session.apply(Command::MoveBackward);
	session.apply(Command::MoveBackward);
	// probe at 56 is in the wall row
	assert!((session.camera().position.y - 76.0).abs() < 0.01);
}

#[test]
fn collision_probe_agrees_with_grid() {
	let (config, grid) = one_cell_room();
	let start = grid.cell_center(1, 1);
	let mut session = Session::new(&config, Arc::new(AngleTable::new()), grid, start, solid_textures());

	for heading_step in 0..36 {
		session.apply(Command::TurnRight);
		let camera = session.camera();
		for range in [-60.0f32, -35.0, -10.0, 0.0, 10.0, 31.0, 33.0, 45.0, 90.0] {
			let probe = camera.position + camera.forward() * range;
			let open = session.grid().cell_at_point(probe) == EMPTY;
			assert_eq!(camera.cast_collision_ray(session.grid(), range), open,
				"turn {} range {}", heading_step, range);
		}
	}
}

#[test]
fn map_image_drives_session() {
	let mut image = image::RgbImage::new(5, 5);
	for i in 0..5 {
		for (x, y) in [(i, 0), (i, 4), (0, i), (4, i)] {
			image.put_pixel(x, y, image::Rgb(asset::WALL_COLOR));
		}
	}
	image.put_pixel(2, 1, image::Rgb(asset::START_COLOR));

	let config = Config::default();
	let mut grid = WorldGrid::new(config.world.grid_size, config.world.cubesize);
	let start = asset::decode_map(&image, &mut grid).unwrap().unwrap();
	assert_eq!(start, glam::vec2(160.0, 96.0));

	// far wall row is 160 units ahead, its strip leaves ceiling and floor visible
	let mut session = Session::new(&config, Arc::new(AngleTable::new()), grid, start, solid_textures());
	let frame = session.redraw().unwrap();
	assert_eq!((frame.width(), frame.height()), (400, 300));
	assert_eq!(frame.pixel(200, 0), [0, 0, 200, 255]);
	assert_eq!(frame.pixel(200, 150), [200, 0, 0, 255]);
	assert_eq!(frame.pixel(200, 299), [0, 200, 0, 255]);
}

#[test]
fn demo_session_builds_without_assets() {
	let mut config = Config::default();
	config.view.width = 80;
	config.view.height = 60;
	let mut session = gridcast_3d::build_session(&config).unwrap();
	assert!(session.redraw().is_some());
	assert!(session.redraw().is_none());
}
