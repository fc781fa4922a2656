
/*

Wall casting. One ray per screen column, marched through the grid in fixed
steps until it samples a wall cell.

ray angle:   heading + column offset (-fov/2 .. +fov/2)
ray dir:     (sin, cos) from the AngleTable
hit:         refined by bisection between the last empty and first wall sample
distance:    raw * cos(offset)  (perpendicular distance, no fish-eye)
height:      cubesize * projection_distance / distance

*/

use std::sync::Arc;

use crate::{angle::Angle, camera::Camera, grid::{WorldGrid, EMPTY}, trig::AngleTable};

const REFINE_ITERATIONS: u32 = 12;

/// Smallest march step. Finer steps are raised to this.
pub const MIN_RAY_STEP: f32 = 0.001;

/// Per-column results of one wall pass.
#[derive(Clone, Debug, Default)]
pub struct WallCast {
	pub heights: Vec<u32>,
	pub offsets: Vec<u32>,
	/// Hit position along the wall face in [0, 1], for textures of any width.
	pub faces: Vec<f32>,
	pub distances: Vec<f32>,
	pub codes: Vec<u32>
}

#[derive(Clone, Copy, Debug)]
struct RayHit {
	distance: f32,
	code: u32,
	u_offset: f32
}

/// (width / 2) / tan(fov / 2)
pub fn projection_distance(table: &AngleTable, width: u32, fov: f32) -> f32 {
	(width as f32 / 2.0) / table.tan(Angle::new(fov / 2.0).tenths())
}

pub struct WallCaster {
	table: Arc<AngleTable>,
	width: u32,
	height: u32,
	projection_distance: f32,
	step: f32,
	max_distance: f32,
	texture_width: u32
}

impl WallCaster {
	pub fn new(
		table: Arc<AngleTable>, width: u32, height: u32, fov: f32,
		step: f32, max_distance: f32, texture_width: u32
	) -> Self {
		let projection_distance = projection_distance(&table, width, fov);
		Self {
			table, width, height, projection_distance,
			step: step.max(MIN_RAY_STEP),
			max_distance,
			texture_width: texture_width.max(1)
		}
	}

	pub fn projection_distance(&self) -> f32 {
		self.projection_distance
	}

	/// Wall height on screen for a corrected distance, clamped to the viewport.
	pub fn projected_height(&self, cubesize: f32, distance: f32) -> u32 {
		if distance <= 0.0 {
			return self.height;
		}
		(cubesize * self.projection_distance / distance).min(self.height as f32) as u32
	}

	pub fn cast(&self, grid: &WorldGrid, camera: &Camera) -> WallCast {
		let width = self.width as usize;
		let mut cast = WallCast {
			heights: Vec::with_capacity(width),
			offsets: Vec::with_capacity(width),
			faces: Vec::with_capacity(width),
			distances: Vec::with_capacity(width),
			codes: Vec::with_capacity(width)
		};

		for column in 0..self.width {
			let offset = camera.column_offset(column, self.width);
			let dir = self.table.direction(camera.heading.add(offset).tenths());

			match self.single_raycast(grid, camera.position, dir) {
				Some(hit) => {
					let corrected = hit.distance * self.table.cos(Angle::new(offset).tenths());
					let texcol = (hit.u_offset * self.texture_width as f32) as u32;
					cast.heights.push(self.projected_height(camera.cubesize, corrected));
					cast.offsets.push(texcol.min(self.texture_width - 1));
					cast.faces.push(hit.u_offset);
					cast.distances.push(corrected);
					cast.codes.push(hit.code);
				},
				None => {
					cast.heights.push(self.projected_height(camera.cubesize, self.max_distance).max(1));
					cast.offsets.push(0);
					cast.faces.push(0.0);
					cast.distances.push(self.max_distance);
					cast.codes.push(EMPTY);
				}
			}
		}

		cast
	}

	fn single_raycast(&self, grid: &WorldGrid, from: glam::Vec2, dir: glam::Vec2) -> Option<RayHit> {
		// sample positions come from an integer count so they always advance
		let samples = (self.max_distance / self.step).ceil() as u64;
		let mut travelled = 0.0f32;

		for n in 1..=samples {
			let next = (n as f32 * self.step).min(self.max_distance);
			if grid.is_empty_at(from + dir * next) {
				travelled = next;
				continue;
			}

			// the boundary lies between `lo` (empty) and `hi` (wall)
			let (mut lo, mut hi) = (travelled, next);
			for _ in 0..REFINE_ITERATIONS {
				let mid = (lo + hi) * 0.5;
				if grid.is_empty_at(from + dir * mid) { lo = mid; } else { hi = mid; }
			}

			let point = from + dir * hi;
			let before = grid.cell_coord(from + dir * lo);
			let after = grid.cell_coord(point);
			let cubesize = grid.cell_edge_length();

			// crossed an x boundary when x changed, unless a corner hit came through y first
			let crossed_x = before.x != after.x
				&& (before.y == after.y || grid.cell_at(after.x, before.y) != EMPTY);

			let u_offset = if crossed_x {
				let frac = point.y.rem_euclid(cubesize) / cubesize;
				if dir.x > 0.0 { 1.0 - frac } else { frac }
			} else {
				let frac = point.x.rem_euclid(cubesize) / cubesize;
				if dir.y > 0.0 { frac } else { 1.0 - frac }
			};

			return Some(RayHit {
				distance: hi,
				code: grid.cell_at(after.x, after.y),
				u_offset: u_offset.clamp(0.0, 1.0)
			});
		}

		None
	}
}


#[cfg(test)]
fn test_setup(rows: &[&str], cell: (i64, i64), heading: f32, width: u32, height: u32) -> (WorldGrid, Camera, WallCaster) {
	let table = Arc::new(AngleTable::new());
	let grid = WorldGrid::from_rows(rows, 64.0);
	let camera = Camera::new(table.clone(), grid.cell_center(cell.0, cell.1), Angle::new(heading), 60.0, 64.0);
	let caster = WallCaster::new(table, width, height, 60.0, 1.0, 9999.0, 64);
	(grid, camera, caster)
}

#[cfg(test)]
const CORRIDOR: [&str; 7] = [
	"#####",
	"#...#",
	"#...#",
	"#...#",
	"#...#",
	"#...#",
	"#####"
];

#[test]
fn central_column_distance_matches_wall_ahead() {
	let (grid, camera, caster) = test_setup(&CORRIDOR, (2, 1), 0.0, 401, 300);
	let cast = caster.cast(&grid, &camera);
	// camera y = 96, wall face at y = 6 * 64
	assert!((cast.distances[200] - 288.0).abs() < 0.5, "got {}", cast.distances[200]);
	assert_eq!(cast.codes[200], 1);
}

#[test]
fn height_inversely_proportional_to_distance() {
	let (grid, mut camera, caster) = test_setup(&CORRIDOR, (2, 1), 0.0, 401, 300);
	let far = caster.cast(&grid, &camera);
	camera.position = grid.cell_center(2, 4);
	let near = caster.cast(&grid, &camera);

	assert!((near.distances[200] - 96.0).abs() < 0.5);
	let far_product = far.heights[200] as f32 * far.distances[200];
	let near_product = near.heights[200] as f32 * near.distances[200];
	assert!((far_product - near_product).abs() / near_product < 0.02);
	assert!(near.heights[200] > far.heights[200]);
}

#[test]
fn flat_wall_has_flat_distances() {
	let rows = [
		"#########",
		"#.......#",
		"#.......#",
		"#.......#",
		"#.......#",
		"#.......#",
		"#.......#",
		"#.......#",
		"#########"
	];
	let (grid, camera, caster) = test_setup(&rows, (4, 4), 0.0, 401, 300);
	let cast = caster.cast(&grid, &camera);
	for (column, distance) in cast.distances.iter().enumerate() {
		assert!((distance - 224.0).abs() < 224.0 * 0.005, "column {} at {}", column, distance);
	}
	let (min, max) = (cast.heights.iter().min().unwrap(), cast.heights.iter().max().unwrap());
	assert!(max - min <= 1);
}

#[test]
fn texture_offset_tracks_hit_position() {
	let (grid, camera, caster) = test_setup(&CORRIDOR, (2, 1), 0.0, 401, 300);
	let cast = caster.cast(&grid, &camera);
	// central ray hits the middle of the face
	assert!((31..=32).contains(&cast.offsets[200]));
	assert!(cast.offsets.iter().all(|&o| o < 64));
}

#[test]
fn faces_agree_with_offsets() {
	let (grid, camera, caster) = test_setup(&CORRIDOR, (2, 1), 30.0, 401, 300);
	let cast = caster.cast(&grid, &camera);
	for (face, offset) in cast.faces.iter().zip(&cast.offsets) {
		assert!((0.0..=1.0).contains(face));
		assert_eq!(((face * 64.0) as u32).min(63), *offset);
	}
}

#[test]
fn tiny_step_is_raised_and_still_terminates() {
	let table = Arc::new(AngleTable::new());
	let grid = WorldGrid::from_rows(&CORRIDOR, 64.0);
	let camera = Camera::new(table.clone(), grid.cell_center(2, 1), Angle::new(0.0), 60.0, 64.0);
	let caster = WallCaster::new(table.clone(), 9, 30, 60.0, 1e-9, 9999.0, 64);
	let cast = caster.cast(&grid, &camera);
	assert!((cast.distances[4] - 288.0).abs() < 0.5, "got {}", cast.distances[4]);

	// nothing within reach: every column runs to the bound
	let open = WorldGrid::new(64, 64.0);
	let camera = Camera::new(table.clone(), open.cell_center(32, 32), Angle::new(0.0), 60.0, 64.0);
	let caster = WallCaster::new(table, 9, 30, 60.0, 1e-9, 50.0, 64);
	let cast = caster.cast(&open, &camera);
	assert!(cast.distances.iter().all(|&d| d == 50.0));
}

#[test]
fn heights_clamp_to_viewport() {
	let (grid, camera, caster) = test_setup(&["###", "#.#", "###"], (1, 1), 0.0, 401, 300);
	let cast = caster.cast(&grid, &camera);
	assert!(cast.heights.iter().all(|&h| h <= 300));
	assert_eq!(cast.heights[200], 300);
}

#[test]
fn unbounded_search_yields_far_wall_sentinel() {
	let table = Arc::new(AngleTable::new());
	let grid = WorldGrid::new(64, 64.0);
	let camera = Camera::new(table.clone(), grid.cell_center(32, 32), Angle::new(0.0), 60.0, 64.0);
	let caster = WallCaster::new(table, 40, 30, 60.0, 1.0, 50.0, 64);
	let cast = caster.cast(&grid, &camera);

	assert_eq!(cast.heights.len(), 40);
	assert!(cast.codes.iter().all(|&c| c == EMPTY));
	assert!(cast.distances.iter().all(|&d| d == 50.0));
	assert!(cast.heights.iter().all(|&h| h >= 1));
	assert!(cast.offsets.iter().all(|&o| o == 0));
}
