use crate::{raycasting::WallCast, texture::{Rgba, Texture}};

pub mod floorceil;
pub mod wall;

/// Final RGBA pixel buffer, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
	width: u32,
	height: u32,
	pixels: Vec<Rgba>
}

impl Frame {
	pub fn new(width: u32, height: u32) -> Self {
		Self { width, height, pixels: vec![[0, 0, 0, 0]; (width * height) as usize] }
	}

	pub fn width(&self) -> u32 {
		self.width
	}

	pub fn height(&self) -> u32 {
		self.height
	}

	#[inline]
	pub fn pixel(&self, x: u32, y: u32) -> Rgba {
		self.pixels[(y * self.width + x) as usize]
	}

	#[inline]
	pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgba) {
		self.pixels[(y * self.width + x) as usize] = color;
	}

	pub fn as_bytes(&self) -> &[u8] {
		bytemuck::cast_slice(&self.pixels)
	}
}

/// Composes walls over the floor/ceiling background.
pub struct ProjectionPlane {
	frame: Frame
}

impl ProjectionPlane {
	pub fn new(width: u32, height: u32) -> Self {
		Self { frame: Frame::new(width, height) }
	}

	pub fn frame(&self) -> &Frame {
		&self.frame
	}

	/// Starts from `background`, then paints one wall strip per column.
	/// Strips overwrite whatever background they cover.
	pub fn compose(&mut self, walls: &WallCast, background: &Frame, wall_textures: &[Texture]) -> &Frame {
		self.frame.pixels.copy_from_slice(&background.pixels);

		let columns = walls.heights.len().min(self.frame.width as usize);
		for x in 0..columns {
			if let Some(texture) = wall::select_texture(wall_textures, walls.codes[x]) {
				let texcol = wall::texture_column(texture, walls.faces[x]);
				wall::paint_strip(&mut self.frame, x as u32, texture, texcol, walls.heights[x]);
			}
		}

		&self.frame
	}
}


#[test]
fn compose_overwrites_background_with_strips() {
	let mut background = Frame::new(3, 10);
	for y in 0..10 {
		for x in 0..3 {
			background.set_pixel(x, y, [9, 9, 9, 255]);
		}
	}
	let walls = WallCast {
		heights: vec![0, 4, 10],
		offsets: vec![0, 0, 0],
		faces: vec![0.0, 0.0, 0.0],
		distances: vec![100.0, 50.0, 10.0],
		codes: vec![1, 1, 1]
	};
	let textures = [Texture::solid(8, [1, 2, 3, 255])];
	let mut plane = ProjectionPlane::new(3, 10);
	let frame = plane.compose(&walls, &background, &textures);

	let painted = |x: u32| (0..10).filter(|&y| frame.pixel(x, y) == [1, 2, 3, 255]).collect::<Vec<_>>();
	assert!(painted(0).is_empty());
	assert_eq!(painted(1), vec![3, 4, 5, 6]);
	assert_eq!(painted(2), (0..10).collect::<Vec<_>>());
	assert_eq!(frame.pixel(1, 0), [9, 9, 9, 255]);
}

#[test]
fn wall_variants_of_different_widths_sample_the_same_spot() {
	let striped = |width: u32| {
		let mut image = image::RgbaImage::new(width, 1);
		for (x, _, p) in image.enumerate_pixels_mut() {
			let shade = if x < width * 3 / 4 { 10 } else { 200 };
			*p = image::Rgba([shade, shade, shade, 255]);
		}
		Texture::from_image(&image)
	};
	let textures = [striped(64), striped(16)];
	let walls = WallCast {
		heights: vec![4, 4],
		offsets: vec![51, 51],
		faces: vec![0.8, 0.8],
		distances: vec![50.0, 50.0],
		codes: vec![1, 2]
	};
	let background = Frame::new(2, 4);
	let mut plane = ProjectionPlane::new(2, 4);
	let frame = plane.compose(&walls, &background, &textures);

	assert_eq!(frame.pixel(0, 1), [200, 200, 200, 255]);
	assert_eq!(frame.pixel(1, 1), [200, 200, 200, 255]);
}

#[test]
fn frame_bytes_are_rgba() {
	let mut frame = Frame::new(2, 1);
	frame.set_pixel(1, 0, [1, 2, 3, 4]);
	assert_eq!(frame.as_bytes(), &[0, 0, 0, 0, 1, 2, 3, 4]);
}
