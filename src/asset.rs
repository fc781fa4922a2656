use std::path::Path;

use anyhow::Context;

use crate::grid::{WorldGrid, EMPTY, WALL};

pub struct ShaderSource;

impl ShaderSource {
	pub const PRESENT: &'static str = include_str!("asset/present.wgsl");
}

pub const WALL_COLOR: [u8; 3] = [255, 255, 255];
pub const START_COLOR: [u8; 3] = [255, 0, 0];

/// Writes a square map image into `grid`.
///
/// White pixels become walls, the red pixel marks the camera start (returned
/// as the centre of its cell) and anything else is empty. Cells the image does
/// not cover end up empty. Non-square images are rejected before the grid is
/// touched.
pub fn decode_map(image: &image::RgbImage, grid: &mut WorldGrid) -> anyhow::Result<Option<glam::Vec2>> {
	anyhow::ensure!(
		image.width() == image.height(),
		"map image must be square, got {}x{}", image.width(), image.height()
	);
	if image.width() > grid.size() {
		log::warn!("map is {0}x{0} but the grid holds {1}x{1}, extra cells are dropped", image.width(), grid.size());
	}

	grid.clear();
	let mut start = None;
	for (x, y, pixel) in image.enumerate_pixels() {
		let (x, y) = (x as i64, y as i64);
		if pixel.0 == WALL_COLOR {
			grid.set_cell(x, y, WALL);
		} else {
			grid.set_cell(x, y, EMPTY);
			if pixel.0 == START_COLOR {
				start = Some(grid.cell_center(x, y));
			}
		}
	}

	Ok(start)
}

pub fn load_map(path: impl AsRef<Path>, grid: &mut WorldGrid) -> anyhow::Result<Option<glam::Vec2>> {
	let path = path.as_ref();
	let image = image::open(path)
		.with_context(|| format!("failed to open map {}", path.display()))?
		.to_rgb8();
	let start = decode_map(&image, grid)
		.with_context(|| format!("failed to load map {}", path.display()))?;
	log::info!("loaded map {} ({} walls)", path.display(), grid.wall_count());
	Ok(start)
}

/// Map used when no map image is configured.
pub const DEMO_MAP: [&str; 12] = [
	"############",
	"#..........#",
	"#..##..##..#",
	"#..#....#..#",
	"#..........#",
	"#....##....#",
	"#....##....#",
	"#..........#",
	"#..#....#..#",
	"#..##..##..#",
	"#..........#",
	"############"
];
pub const DEMO_START: (i64, i64) = (1, 1);


#[test]
fn decodes_walls_and_start() {
	let mut image = image::RgbImage::new(3, 3);
	image.put_pixel(0, 0, image::Rgb(WALL_COLOR));
	image.put_pixel(2, 1, image::Rgb(WALL_COLOR));
	image.put_pixel(1, 2, image::Rgb(START_COLOR));
	image.put_pixel(1, 1, image::Rgb([10, 200, 10]));

	let mut grid = WorldGrid::new(8, 64.0);
	let start = decode_map(&image, &mut grid).unwrap();

	assert_eq!(start, Some(glam::vec2(96.0, 160.0)));
	assert_eq!(grid.cell_at(0, 0), WALL);
	assert_eq!(grid.cell_at(2, 1), WALL);
	assert_eq!(grid.cell_at(1, 2), EMPTY);
	assert_eq!(grid.cell_at(1, 1), EMPTY);
	assert_eq!(grid.wall_count(), 2);
}

#[test]
fn non_square_map_leaves_grid_untouched() {
	let image = image::RgbImage::from_pixel(4, 3, image::Rgb(WALL_COLOR));
	let mut grid = WorldGrid::new(8, 64.0);
	grid.set_cell(6, 6, WALL);
	assert!(decode_map(&image, &mut grid).is_err());
	assert_eq!(grid.wall_count(), 1);
	assert_eq!(grid.cell_at(6, 6), WALL);
}

#[test]
fn smaller_map_replaces_previous_walls() {
	let mut grid = WorldGrid::new(8, 64.0);
	decode_map(&image::RgbImage::from_pixel(8, 8, image::Rgb(WALL_COLOR)), &mut grid).unwrap();
	assert_eq!(grid.wall_count(), 64);

	let mut small = image::RgbImage::new(2, 2);
	small.put_pixel(1, 1, image::Rgb(WALL_COLOR));
	decode_map(&small, &mut grid).unwrap();
	assert_eq!(grid.wall_count(), 1);
	assert_eq!(grid.cell_at(5, 5), EMPTY);
}

#[test]
fn oversized_map_is_clipped_to_grid() {
	let image = image::RgbImage::from_pixel(5, 5, image::Rgb(WALL_COLOR));
	let mut grid = WorldGrid::new(3, 64.0);
	assert!(decode_map(&image, &mut grid).unwrap().is_none());
	assert_eq!(grid.wall_count(), 9);
}
