use std::cmp::Ordering;

use crate::trig::TABLE_SIZE;

/// Heading in degrees, always kept in [0, 360).
///
/// Ordering is plain numeric ordering of the degree value. 359 is greater
/// than 1, there is no shortest-arc comparison.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Angle {
	degrees: f32
}

impl Angle {
	pub fn new(degrees: f32) -> Self {
		Self { degrees: Self::wrap(degrees) }
	}

	fn wrap(degrees: f32) -> f32 {
		let wrapped = degrees.rem_euclid(360.0);
		// rem_euclid rounds tiny negatives up to exactly 360.0 in f32
		if wrapped >= 360.0 { 0.0 } else { wrapped }
	}

	pub fn add(self, delta: f32) -> Self {
		Self::new(self.degrees + delta)
	}

	pub fn subtract(self, delta: f32) -> Self {
		Self::new(self.degrees - delta)
	}

	pub fn degrees(&self) -> f32 {
		self.degrees
	}

	/// AngleTable index, tenths of a degree.
	pub fn tenths(&self) -> usize {
		(self.degrees * 10.0) as usize % TABLE_SIZE
	}

	pub fn lt_degrees(&self, degrees: f32) -> bool {
		self.degrees < degrees
	}
}

impl PartialOrd for Angle {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		self.degrees.partial_cmp(&other.degrees)
	}
}

impl std::fmt::Display for Angle {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{:.1}°", self.degrees)
	}
}


#[test]
fn add_wraps_past_full_turn() {
	assert_eq!(Angle::new(359.0).add(2.0), Angle::new(1.0));
	assert_eq!(Angle::new(10.0).add(720.0), Angle::new(10.0));
}

#[test]
fn subtract_wraps_below_zero() {
	assert_eq!(Angle::new(1.0).subtract(2.0), Angle::new(359.0));
	assert_eq!(Angle::new(0.0).subtract(10.0).degrees(), 350.0);
}

#[test]
fn construction_normalizes() {
	assert_eq!(Angle::new(-90.0).degrees(), 270.0);
	assert_eq!(Angle::new(360.0).degrees(), 0.0);
	assert_eq!(Angle::new(-1e-9).degrees(), 0.0);
}

#[test]
fn results_stay_in_range() {
	let mut angle = Angle::new(0.0);
	for delta in [-725.5f32, -360.0, -10.0, -0.1, 0.0, 0.1, 10.0, 359.9, 360.0, 1000.25] {
		for a in [angle.add(delta), angle.subtract(delta)] {
			assert!(a.degrees() >= 0.0 && a.degrees() < 360.0, "{} out of range", a);
			assert!(a.tenths() < TABLE_SIZE);
		}
		angle = angle.add(delta);
	}
}

#[test]
fn ordering_is_numeric_not_circular() {
	assert!(Angle::new(1.0) < Angle::new(359.0));
	assert!(Angle::new(359.0).add(2.0) < Angle::new(2.0));
	assert!(Angle::new(45.0).lt_degrees(46.0));
	assert!(!Angle::new(45.0).lt_degrees(45.0));
}

#[test]
fn tenths_indexes_table() {
	assert_eq!(Angle::new(0.0).tenths(), 0);
	assert_eq!(Angle::new(90.0).tenths(), 900);
	assert_eq!(Angle::new(359.95).tenths(), 3599);
}
