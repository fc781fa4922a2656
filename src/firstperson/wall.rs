use crate::texture::Texture;
use super::Frame;

/// Paints column `texcol` of `texture`, stretched to `height` pixels and
/// centred on the frame's midline, into column `x`. Nearest-neighbour, no
/// blending. Rows falling outside the frame are skipped.
pub fn paint_strip(frame: &mut Frame, x: u32, texture: &Texture, texcol: u32, height: u32) {
	if height == 0 {
		return;
	}
	let top = frame.height() as i64 / 2 - height as i64 / 2;
	let first = top.max(0);
	let last = (top + height as i64).min(frame.height() as i64);

	for y in first..last {
		let texrow = ((y - top) as u64 * texture.height() as u64 / height as u64) as u32;
		frame.set_pixel(x, y as u32, texture.pixel(texcol, texrow));
	}
}

/// Column of `texture` at fraction `face` along a wall face.
pub fn texture_column(texture: &Texture, face: f32) -> u32 {
	let width = texture.width().max(1);
	((face.clamp(0.0, 1.0) * width as f32) as u32).min(width - 1)
}

/// Wall code to texture. Code 0 (far-wall sentinel) uses the first texture.
pub fn select_texture(textures: &[Texture], code: u32) -> Option<&Texture> {
	if textures.is_empty() {
		return None;
	}
	let index = code.saturating_sub(1) as usize % textures.len();
	textures.get(index)
}


#[test]
fn strip_is_centred_and_scaled() {
	let mut frame = Frame::new(4, 20);
	let mut image = image::RgbaImage::new(2, 2);
	image.put_pixel(1, 0, image::Rgba([1, 1, 1, 255]));
	image.put_pixel(1, 1, image::Rgba([2, 2, 2, 255]));
	let texture = Texture::from_image(&image);

	paint_strip(&mut frame, 3, &texture, 1, 8);

	// rows 6..14, top half from texel row 0, bottom half from texel row 1
	for y in 0..20 {
		let expected = match y {
			6..=9 => [1, 1, 1, 255],
			10..=13 => [2, 2, 2, 255],
			_ => [0, 0, 0, 0]
		};
		assert_eq!(frame.pixel(3, y), expected, "row {}", y);
	}
	assert!((0..20).all(|y| frame.pixel(2, y) == [0, 0, 0, 0]));
}

#[test]
fn texture_selection_by_code() {
	let textures = [Texture::solid(4, [1, 0, 0, 255]), Texture::solid(4, [2, 0, 0, 255])];
	assert_eq!(select_texture(&textures, 0).map(|t| t.pixel(0, 0)), Some([1, 0, 0, 255]));
	assert_eq!(select_texture(&textures, 1).map(|t| t.pixel(0, 0)), Some([1, 0, 0, 255]));
	assert_eq!(select_texture(&textures, 2).map(|t| t.pixel(0, 0)), Some([2, 0, 0, 255]));
	assert_eq!(select_texture(&textures, 3).map(|t| t.pixel(0, 0)), Some([1, 0, 0, 255]));
	assert!(select_texture(&[], 1).is_none());
}
