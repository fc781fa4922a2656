use std::path::Path;

use anyhow::Context;

pub type Rgba = [u8; 4];

/// RGBA pixels, row-major.
#[derive(Clone, Debug)]
pub struct Texture {
	width: u32,
	height: u32,
	pixels: Vec<Rgba>
}

impl Texture {
	pub fn from_image(image: &image::RgbaImage) -> Self {
		let pixels = image.pixels().map(|p| p.0).collect();
		Self { width: image.width(), height: image.height(), pixels }
	}

	pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
		let path = path.as_ref();
		let image = image::open(path)
			.with_context(|| format!("failed to load texture {}", path.display()))?;
		Ok(Self::from_image(&image.to_rgba8()))
	}

	/// Loads `path`, or falls back to a generated checker when the path is
	/// missing or unreadable.
	pub fn load_or_checker(path: Option<&Path>, size: u32, a: Rgba, b: Rgba) -> Self {
		match path.map(|p| Self::load(p)) {
			Some(Ok(texture)) => texture,
			Some(Err(e)) => {
				log::warn!("{:#}, using generated texture", e);
				Self::checker(size, a, b)
			},
			None => Self::checker(size, a, b)
		}
	}

	pub fn solid(size: u32, color: Rgba) -> Self {
		let size = size.max(1);
		Self { width: size, height: size, pixels: vec![color; (size * size) as usize] }
	}

	/// Two-colour checker with 8 squares per side.
	pub fn checker(size: u32, a: Rgba, b: Rgba) -> Self {
		let size = size.max(8);
		let square = size / 8;
		let pixels = (0..size * size).map(|i| {
			let (x, y) = (i % size, i / size);
			if (x / square + y / square) % 2 == 0 { a } else { b }
		}).collect();
		Self { width: size, height: size, pixels }
	}

	pub fn width(&self) -> u32 {
		self.width
	}

	pub fn height(&self) -> u32 {
		self.height
	}

	/// Coordinates wrap on the texture bounds.
	#[inline]
	pub fn pixel(&self, x: u32, y: u32) -> Rgba {
		self.pixels[((y % self.height) * self.width + (x % self.width)) as usize]
	}
}


#[test]
fn pixel_wraps() {
	let mut image = image::RgbaImage::new(2, 2);
	image.put_pixel(1, 0, image::Rgba([9, 8, 7, 255]));
	let texture = Texture::from_image(&image);
	assert_eq!(texture.pixel(1, 0), [9, 8, 7, 255]);
	assert_eq!(texture.pixel(3, 2), [9, 8, 7, 255]);
	assert_eq!(texture.pixel(0, 0), [0, 0, 0, 0]);
}

#[test]
fn missing_file_falls_back_to_checker() {
	let a = [255, 255, 255, 255];
	let b = [0, 0, 0, 255];
	let texture = Texture::load_or_checker(Some(Path::new("does/not/exist.png")), 64, a, b);
	assert_eq!((texture.width(), texture.height()), (64, 64));
	assert_eq!(texture.pixel(0, 0), a);
	assert_eq!(texture.pixel(8, 0), b);
	assert_eq!(texture.pixel(8, 8), a);
}
