use std::sync::Arc;

use crate::{angle::Angle, grid::WorldGrid, trig::AngleTable};

pub struct Camera {
	pub position: glam::Vec2,
	pub heading: Angle,
	pub fov: f32,
	pub cubesize: f32,
	table: Arc<AngleTable>
}

impl Camera {
	pub fn new(table: Arc<AngleTable>, position: glam::Vec2, heading: Angle, fov: f32, cubesize: f32) -> Self {
		Self { position, heading, fov, cubesize, table }
	}

	pub fn forward(&self) -> glam::Vec2 {
		self.table.direction(self.heading.tenths())
	}

	/// Moves along the heading. Negative speed backpedals.
	pub fn walk(&mut self, speed: f32) {
		self.position += self.forward() * speed;
	}

	pub fn rotate(&mut self, delta: f32) {
		self.heading = if delta > 0.0 {
			self.heading.add(delta)
		} else {
			self.heading.subtract(-delta)
		};
	}

	/// Single-point probe `range` units along the heading (negative = behind).
	/// True when that cell is empty. Only sound while `range` is smaller than
	/// the narrowest gap in the map.
	pub fn cast_collision_ray(&self, grid: &WorldGrid, range: f32) -> bool {
		grid.is_empty_at(self.position + self.forward() * range)
	}

	/// Offset of a screen column from the heading, -fov/2 at column 0 and
	/// +fov/2 at the last column.
	pub fn column_offset(&self, column: u32, width: u32) -> f32 {
		if width <= 1 {
			return 0.0;
		}
		-self.fov / 2.0 + self.fov * column as f32 / (width - 1) as f32
	}

	pub fn column_angle(&self, column: u32, width: u32) -> Angle {
		self.heading.add(self.column_offset(column, width))
	}

	pub fn table(&self) -> &Arc<AngleTable> {
		&self.table
	}
}


#[cfg(test)]
fn test_camera(position: glam::Vec2, heading: f32) -> Camera {
	Camera::new(Arc::new(AngleTable::new()), position, Angle::new(heading), 60.0, 64.0)
}

#[test]
fn walk_follows_heading() {
	let mut camera = test_camera(glam::vec2(100.0, 100.0), 0.0);
	camera.walk(10.0);
	assert!((camera.position - glam::vec2(100.0, 110.0)).length() < 0.01);

	camera.rotate(90.0);
	camera.walk(-10.0);
	assert!((camera.position - glam::vec2(90.0, 110.0)).length() < 0.01);
}

#[test]
fn rotate_both_ways() {
	let mut camera = test_camera(glam::Vec2::ZERO, 5.0);
	camera.rotate(10.0);
	assert_eq!(camera.heading, Angle::new(15.0));
	camera.rotate(-20.0);
	assert_eq!(camera.heading, Angle::new(355.0));
}

#[test]
fn collision_probe_reads_single_cell() {
	let grid = WorldGrid::from_rows(&[
		"###",
		"#.#",
		"###"
	], 64.0);
	let camera = test_camera(grid.cell_center(1, 1), 0.0);
	assert!(camera.cast_collision_ray(&grid, 20.0));
	assert!(!camera.cast_collision_ray(&grid, 40.0));
	assert!(!camera.cast_collision_ray(&grid, -40.0));
	// far beyond the grid edge still reads as blocked
	assert!(!camera.cast_collision_ray(&grid, 10_000.0));
}

#[test]
fn column_offsets_span_fov() {
	let camera = test_camera(glam::Vec2::ZERO, 0.0);
	assert_eq!(camera.column_offset(0, 401), -30.0);
	assert_eq!(camera.column_offset(400, 401), 30.0);
	assert_eq!(camera.column_offset(200, 401), 0.0);
	assert_eq!(camera.column_angle(0, 401), Angle::new(330.0));
}
