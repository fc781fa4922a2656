use std::sync::Arc;

use crate::{
	angle::Angle,
	camera::Camera,
	texture::Texture,
	trig::AngleTable
};
use super::Frame;

/// Distance to the floor (or ceiling) plane for every screen row.
///
/// Built once per session. Depends only on the projection distance, the
/// viewport height and the eye height, never on the camera pose.
#[derive(Clone, Debug)]
pub struct FloorDistances {
	rows: Vec<f32>,
	midline: usize
}

impl FloorDistances {
	/// Marches one vertical ray per scanline below the midline. Scanline `i`
	/// passes through the projection plane `i + 0.5` pixels under the
	/// horizon, which keeps row distances in step with projected wall heights.
	pub fn new(projection_distance: f32, height: u32, eye_height: f32, max_distance: f32) -> Self {
		let half = (height / 2) as usize;
		let mut floor = Vec::with_capacity(half);

		for i in 0..half {
			let dir = glam::vec2(projection_distance, i as f32 + 0.5).normalize();
			let (mut x, mut y) = (0.0f32, eye_height);

			let distance = loop {
				if y <= 0.0 {
					// back up to the exact plane crossing
					break x - dir.x * (-y / dir.y);
				}
				if x > max_distance {
					break max_distance;
				}
				x += dir.x;
				y -= dir.y;
			};
			floor.push(distance.min(max_distance));
		}

		let mut rows = Vec::with_capacity(height as usize);
		rows.extend(floor.iter().rev());
		if height % 2 == 1 {
			rows.push(floor.first().copied().unwrap_or(max_distance));
		}
		rows.extend(floor.iter());

		Self { rows, midline: (height / 2) as usize }
	}

	pub fn distance(&self, row: usize) -> f32 {
		self.rows[row]
	}

	pub fn rows(&self) -> &[f32] {
		&self.rows
	}

	/// First row that belongs to the floor half.
	pub fn midline(&self) -> usize {
		self.midline
	}
}

pub struct FloorCeilingCaster {
	table: Arc<AngleTable>,
	distances: Arc<FloorDistances>,
	width: u32,
	height: u32,
	column_rays: Vec<glam::Vec2>
}

impl FloorCeilingCaster {
	pub fn new(table: Arc<AngleTable>, distances: Arc<FloorDistances>, width: u32, height: u32) -> Self {
		Self {
			table, distances, width, height,
			column_rays: vec![glam::Vec2::ZERO; width as usize]
		}
	}

	pub fn distances(&self) -> &FloorDistances {
		&self.distances
	}

	/// Fills `out` with floor and ceiling texels for the current pose.
	///
	/// Each column ray is pre-divided by cos of its offset from the heading,
	/// so a row distance times the ray lands on the plane point. Per pixel work
	/// is a multiply-add and a texture fetch.
	pub fn render(&mut self, camera: &Camera, floor: &Texture, ceiling: &Texture, out: &mut Frame) {
		for (column, ray) in self.column_rays.iter_mut().enumerate() {
			let offset = camera.column_offset(column as u32, self.width);
			let dir = self.table.direction(camera.heading.add(offset).tenths());
			*ray = dir / self.table.cos(Angle::new(offset).tenths());
		}

		let cubesize = camera.cubesize;
		let midline = self.distances.midline();

		for row in 0..self.height as usize {
			let distance = self.distances.distance(row);
			let texture = if row < midline { ceiling } else { floor };
			let scale = glam::vec2(texture.width() as f32, texture.height() as f32) / cubesize;

			for (column, ray) in self.column_rays.iter().enumerate() {
				let point = camera.position + *ray * distance;
				let local = glam::vec2(point.x.rem_euclid(cubesize), point.y.rem_euclid(cubesize)) * scale;
				out.set_pixel(column as u32, row as u32, texture.pixel(local.x as u32, local.y as u32));
			}
		}
	}
}


#[test]
fn table_mirrors_around_midline() {
	let distances = FloorDistances::new(346.4, 300, 32.0, 9999.0);
	let rows = distances.rows();
	assert_eq!(rows.len(), 300);
	assert_eq!(distances.midline(), 150);
	for i in 0..150 {
		assert_eq!(rows[149 - i], rows[150 + i]);
	}
}

#[test]
fn horizon_is_farthest_and_capped() {
	let distances = FloorDistances::new(346.4, 300, 32.0, 9999.0);
	let rows = distances.rows();
	assert_eq!(rows[150], 9999.0);
	assert_eq!(rows[149], 9999.0);
	assert!(rows.iter().all(|&d| d <= 9999.0 && d > 0.0));
}

#[test]
fn distances_shrink_away_from_horizon() {
	let distances = FloorDistances::new(346.4, 300, 32.0, 9999.0);
	let rows = distances.rows();
	for row in 150..299 {
		assert!(rows[row] >= rows[row + 1], "row {} nearer than row {}", row, row + 1);
	}
	for row in 1..150 {
		assert!(rows[row] >= rows[row - 1]);
	}
}

#[test]
fn row_distance_matches_wall_projection() {
	// a wall of height `cubesize` at distance d ends eye * proj / d pixels below the midline
	let proj = 346.4;
	let eye = 32.0;
	let distances = FloorDistances::new(proj, 300, eye, 9999.0);
	for i in [10usize, 40, 100, 149] {
		let expected = eye * proj / (i as f32 + 0.5);
		let got = distances.distance(150 + i);
		assert!((got - expected).abs() < expected * 0.01, "row {}: {} vs {}", i, got, expected);
	}
}

#[test]
fn odd_height_repeats_horizon() {
	let distances = FloorDistances::new(346.4, 301, 32.0, 9999.0);
	let rows = distances.rows();
	assert_eq!(rows.len(), 301);
	assert_eq!(rows[150], rows[151]);
	assert_eq!(rows[0], rows[300]);
}

#[test]
fn ceiling_above_floor_below() {
	let table = Arc::new(AngleTable::new());
	let distances = Arc::new(FloorDistances::new(34.6, 30, 32.0, 9999.0));
	let camera = Camera::new(table.clone(), glam::vec2(100.0, 100.0), Angle::new(45.0), 60.0, 64.0);
	let mut caster = FloorCeilingCaster::new(table, distances, 40, 30);
	let mut frame = Frame::new(40, 30);

	let red = [255, 0, 0, 255];
	let blue = [0, 0, 255, 255];
	caster.render(&camera, &Texture::solid(64, red), &Texture::solid(64, blue), &mut frame);

	for y in 0..30 {
		let expected = if y < 15 { blue } else { red };
		assert!((0..40).all(|x| frame.pixel(x, y) == expected), "row {}", y);
	}
}

#[test]
fn floor_sample_lands_on_world_point() {
	let table = Arc::new(AngleTable::new());
	let distances = Arc::new(FloorDistances::new(34.6, 30, 32.0, 9999.0));
	let camera = Camera::new(table.clone(), glam::vec2(10.0, 20.0), Angle::new(0.0), 60.0, 64.0);
	let mut caster = FloorCeilingCaster::new(table, distances, 41, 30);
	let mut frame = Frame::new(41, 30);

	let mut image = image::RgbaImage::new(64, 64);
	for (x, y, p) in image.enumerate_pixels_mut() {
		*p = image::Rgba([x as u8, y as u8, 0, 255]);
	}
	let floor = Texture::from_image(&image);
	caster.render(&camera, &floor, &floor, &mut frame);

	// central column looks straight down +y
	let d = caster.distances().distance(29);
	let [tx, ty, _, _] = frame.pixel(20, 29);
	assert!((tx as f32 - 10.0).abs() <= 1.0);
	assert!((ty as f32 - (20.0 + d).rem_euclid(64.0)).abs() <= 1.0);
}
