use std::{
	fmt,
	fs::File,
	path::Path,
};

use super::*;

/// Grain count of a cell in a stable grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
	Empty,
	One,
	Two,
	Three,
}

impl CellState {
	/// Panics if `grains` is not a stable count, which only a relaxation bug can produce.
	pub fn from_grains(grains: Cell) -> CellState {
		match grains {
			0 => CellState::Empty,
			1 => CellState::One,
			2 => CellState::Two,
			3 => CellState::Three,
			g => panic!("cell with {} grains in a stable grid", g),
		}
	}

	fn ascii(self) -> char {
		match self {
			CellState::Empty => ' ',
			CellState::One => '.',
			CellState::Two => ':',
			CellState::Three => '&',
		}
	}
}

/// RGBA color for each stable cell state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
	pub empty: [u8; 4],
	pub one: [u8; 4],
	pub two: [u8; 4],
	pub three: [u8; 4],
}

impl Palette {
	pub fn color(&self, state: CellState) -> [u8; 4] {
		match state {
			CellState::Empty => self.empty,
			CellState::One => self.one,
			CellState::Two => self.two,
			CellState::Three => self.three,
		}
	}
}

impl Default for Palette {
	fn default() -> Self {
		Palette {
			empty: [0, 0, 0, 255],
			one: [10, 180, 180, 255],
			two: [255, 0, 255, 255],
			three: [255, 255, 255, 255],
		}
	}
}

fn pixels(grid: &Grid, palette: &Palette) -> Vec<u8> {
	let mut pixels = Vec::with_capacity(grid.side() * grid.side() * 4);
	for row in grid.rows() {
		for &el in row {
			pixels.extend_from_slice(&palette.color(CellState::from_grains(el)));
		}
	}
	pixels
}

/// Encodes the grid as a png at `path`. A failure leaves the grid untouched.
pub fn png<P: AsRef<Path>>(grid: &Grid, palette: &Palette, path: P) -> Result<()> {
	let pixels = pixels(grid, palette);
	let side = grid.side() as u32;
	repng::encode(File::create(path)?, side, side, &pixels)?;
	Ok(())
}

impl fmt::Display for Grid {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		let mut s = String::with_capacity((self.side() + 1) * self.side());
		for row in self.rows() {
			for &el in row {
				s.push(CellState::from_grains(el).ascii());
			}
			s.push('\n');
		}
		write!(f, "{}", s)
	}
}
