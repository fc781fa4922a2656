
pub const EMPTY: u32 = 0;
/// Code returned for any read outside the grid. Keeps ray marches bounded.
pub const WALL: u32 = 1;

/// Square world made of `size * size` cells, each `cubesize` world units wide.
///
/// Each grid owns its own cell storage, indexed `y * size + x`.
#[derive(Clone, Debug)]
pub struct WorldGrid {
	cells: Vec<u32>,
	size: u32,
	cubesize: f32
}

impl WorldGrid {
	pub fn new(size: u32, cubesize: f32) -> Self {
		Self {
			cells: vec![EMPTY; (size * size) as usize],
			size,
			cubesize
		}
	}

	/// Builds a grid from text rows. `.` and ` ` are empty, digits are that
	/// wall code, anything else is wall code 1. Rows are y, columns are x.
	pub fn from_rows(rows: &[&str], cubesize: f32) -> Self {
		let size = rows.iter()
			.map(|r| r.chars().count())
			.max().unwrap_or(0)
			.max(rows.len()) as u32;
		let mut grid = Self::new(size, cubesize);

		for (y, row) in rows.iter().enumerate() {
			for (x, ch) in row.chars().enumerate() {
				let code = match ch {
					'.' | ' ' => EMPTY,
					'0'..='9' => ch as u32 - '0' as u32,
					_ => WALL
				};
				grid.set_cell(x as i64, y as i64, code);
			}
		}
		grid
	}

	fn index(&self, x: i64, y: i64) -> Option<usize> {
		let size = self.size as i64;
		if x < 0 || y < 0 || x >= size || y >= size {
			return None;
		}
		Some((y * size + x) as usize)
	}

	/// Out-of-range writes are ignored.
	pub fn set_cell(&mut self, x: i64, y: i64, code: u32) {
		if let Some(i) = self.index(x, y) {
			self.cells[i] = code;
		}
	}

	/// Out-of-range reads return `WALL`.
	pub fn cell_at(&self, x: i64, y: i64) -> u32 {
		self.index(x, y).map_or(WALL, |i| self.cells[i])
	}

	pub fn cell_coord(&self, point: glam::Vec2) -> glam::I64Vec2 {
		(point / self.cubesize).floor().as_i64vec2()
	}

	pub fn cell_at_point(&self, point: glam::Vec2) -> u32 {
		let coord = self.cell_coord(point);
		self.cell_at(coord.x, coord.y)
	}

	pub fn is_empty_at(&self, point: glam::Vec2) -> bool {
		self.cell_at_point(point) == EMPTY
	}

	/// World-space centre of a cell.
	pub fn cell_center(&self, x: i64, y: i64) -> glam::Vec2 {
		glam::vec2(x as f32 + 0.5, y as f32 + 0.5) * self.cubesize
	}

	pub fn size(&self) -> u32 {
		self.size
	}

	pub fn cell_edge_length(&self) -> f32 {
		self.cubesize
	}

	pub fn clear(&mut self) {
		self.cells.fill(EMPTY);
	}

	pub fn wall_count(&self) -> usize {
		self.cells.iter().filter(|&&c| c != EMPTY).count()
	}
}

impl std::fmt::Display for WorldGrid {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		for y in 0..self.size as i64 {
			for x in 0..self.size as i64 {
				match self.cell_at(x, y) {
					EMPTY => write!(f, ".")?,
					code if code < 10 => write!(f, "{}", code)?,
					_ => write!(f, "#")?
				}
			}
			writeln!(f)?;
		}
		Ok(())
	}
}


#[test]
fn out_of_range_write_is_ignored() {
	let mut grid = WorldGrid::new(4, 64.0);
	grid.set_cell(4, 0, 7);
	grid.set_cell(0, 4, 7);
	grid.set_cell(-1, 2, 7);
	assert_eq!(grid.wall_count(), 0);
	assert_eq!(grid.cell_at(4, 0), WALL);
	assert_eq!(grid.cell_at(0, 4), WALL);
	assert_eq!(grid.cell_at(-1, 2), WALL);
}

#[test]
fn in_range_write_and_read() {
	let mut grid = WorldGrid::new(4, 64.0);
	grid.set_cell(2, 3, 5);
	assert_eq!(grid.cell_at(2, 3), 5);
	assert_eq!(grid.cell_at(3, 2), EMPTY);
	assert_eq!(grid.cell_at_point(glam::vec2(2.0 * 64.0 + 10.0, 3.0 * 64.0 + 63.0)), 5);
	assert!(!grid.is_empty_at(glam::vec2(-0.5, 10.0)));
}

#[test]
fn grids_do_not_share_storage() {
	let mut a = WorldGrid::new(3, 64.0);
	let b = WorldGrid::new(3, 64.0);
	a.set_cell(1, 1, 2);
	assert_eq!(a.cell_at(1, 1), 2);
	assert_eq!(b.cell_at(1, 1), EMPTY);
}

#[test]
fn from_rows_layout() {
	let grid = WorldGrid::from_rows(&[
		"###",
		"#.2",
		"###"
	], 64.0);
	assert_eq!(grid.size(), 3);
	assert_eq!(grid.cell_at(1, 1), EMPTY);
	assert_eq!(grid.cell_at(2, 1), 2);
	assert_eq!(grid.cell_at(0, 0), WALL);
	assert_eq!(grid.to_string(), "111\n1.2\n111\n");
	assert_eq!(grid.cell_center(1, 1), glam::vec2(96.0, 96.0));
}
