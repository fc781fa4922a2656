
/*

Angle lookup table. Index is tenths of a degree (0..3600).

Every entry is taken at radians(i / 10) + EPSILON so tan() never lands
exactly on a pole and nothing downstream divides by an exact zero.

*/

pub const TABLE_SIZE: usize = 3600;
pub const EPSILON: f64 = 0.0001;

pub struct AngleTable {
	sin: Vec<f32>,
	cos: Vec<f32>,
	tan: Vec<f32>
}

impl AngleTable {
	pub fn new() -> Self {
		let mut sin = Vec::with_capacity(TABLE_SIZE);
		let mut cos = Vec::with_capacity(TABLE_SIZE);
		let mut tan = Vec::with_capacity(TABLE_SIZE);

		for i in 0..TABLE_SIZE {
			let rad = (i as f64 / 10.0).to_radians() + EPSILON;
			sin.push(rad.sin() as f32);
			cos.push(rad.cos() as f32);
			tan.push(rad.tan() as f32);
		}

		Self { sin, cos, tan }
	}

	/// (sin, cos, tan) at `tenths` of a degree.
	#[inline]
	pub fn lookup(&self, tenths: usize) -> (f32, f32, f32) {
		let i = tenths % TABLE_SIZE;
		(self.sin[i], self.cos[i], self.tan[i])
	}

	#[inline]
	pub fn sin(&self, tenths: usize) -> f32 {
		self.sin[tenths % TABLE_SIZE]
	}

	#[inline]
	pub fn cos(&self, tenths: usize) -> f32 {
		self.cos[tenths % TABLE_SIZE]
	}

	#[inline]
	pub fn tan(&self, tenths: usize) -> f32 {
		self.tan[tenths % TABLE_SIZE]
	}

	/// Unit direction for a heading. Heading 0 looks down +y, 90 down +x.
	#[inline]
	pub fn direction(&self, tenths: usize) -> glam::Vec2 {
		glam::vec2(self.sin(tenths), self.cos(tenths))
	}
}

impl Default for AngleTable {
	fn default() -> Self {
		Self::new()
	}
}


#[test]
fn table_matches_direct_trig() {
	let table = AngleTable::new();
	for i in 0..TABLE_SIZE {
		let rad = (i as f64 / 10.0).to_radians();
		let (s, c, _) = table.lookup(i);
		assert!((s as f64 - rad.sin()).abs() < 1e-3, "sin mismatch at {}", i);
		assert!((c as f64 - rad.cos()).abs() < 1e-3, "cos mismatch at {}", i);
	}
}

#[test]
fn tangent_is_finite_everywhere() {
	let table = AngleTable::new();
	assert!((0..TABLE_SIZE).all(|i| table.tan(i).is_finite()));

	// away from the poles tan agrees with sin / cos
	for i in (0..TABLE_SIZE).filter(|i| (i % 1800) < 850 || (i % 1800) > 950) {
		let (s, c, t) = table.lookup(i);
		assert!((t - s / c).abs() < 1e-2 * t.abs().max(1.0), "tan mismatch at {}", i);
	}
}

#[test]
fn lookup_wraps_out_of_range_index() {
	let table = AngleTable::new();
	assert_eq!(table.lookup(3600 + 450), table.lookup(450));
}
