use std::collections::VecDeque;

mod cache;
mod render;

pub use cache::{CacheConfig, WorldCache};
pub use render::{png, CellState, Palette};

pub type Cell = u64;

/// A cell topples once it holds this many grains, one for each neighbour.
pub const TOPPLE_THRESHOLD: Cell = 4;

/// Empty cells added around `sqrt(amount)` so that toppling never reaches the border.
pub const MARGIN: usize = 10;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("invalid world cache: {0}")]
	InvalidCache(&'static str),
	#[error("{0}")]
	Config(String),
	#[error(transparent)]
	Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Order in which pending topples are taken off the queue.
///
/// The final stable grid does not depend on it; only the intermediate
/// states and the queue growth do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToppleOrder {
	#[default]
	Fifo,
	Lifo,
}

/// A stable sandpile grown from `amount` grains dropped at the center.
#[derive(Debug, Clone)]
pub struct Grid {
	grid: Vec<Vec<Cell>>,
	amount: u64,
	center: (usize, usize),
	pending: VecDeque<(usize, usize)>,
	topplings: u64,
}

/// Side length of the square grid used for a pile of `amount` grains.
pub fn side_for(amount: u64) -> usize {
	(amount as f64).sqrt() as usize + MARGIN
}

impl Grid {
	/// Builds the stable pile of `amount` grains, seeding it from `cache`.
	pub fn new(amount: u64, cache: &WorldCache) -> Grid {
		Grid::with_options(amount, Some(cache), ToppleOrder::Fifo)
	}

	/// Builds the stable pile of `amount` grains by dropping them all on the center cell.
	pub fn uncached(amount: u64) -> Grid {
		Grid::with_options(amount, None, ToppleOrder::Fifo)
	}

	pub fn with_options(amount: u64, cache: Option<&WorldCache>, order: ToppleOrder) -> Grid {
		let mut g = Grid::blank(side_for(amount), amount);
		let (x, y) = g.center;
		g.deposit(x, y, amount, cache);
		g.relax(order);
		log::trace!("grid of {} grains stable after {} topplings", amount, g.topplings);
		g
	}

	fn blank(side: usize, amount: u64) -> Grid {
		Grid {
			grid: vec![vec![0; side]; side],
			amount,
			center: (side / 2, side / 2),
			pending: VecDeque::new(),
			topplings: 0,
		}
	}

	fn add_grains(&mut self, x: usize, y: usize, amount: Cell) {
		let cell = &mut self.grid[y][x];
		let was_excessive = *cell >= TOPPLE_THRESHOLD;
		*cell = cell.checked_add(amount).expect("grain count overflow");
		if !was_excessive && *cell >= TOPPLE_THRESHOLD {
			self.pending.push_back((x, y));
		}
	}

	fn relax(&mut self, order: ToppleOrder) {
		while self.step(order) {}
	}

	fn step(&mut self, order: ToppleOrder) -> bool {
		let next = match order {
			ToppleOrder::Fifo => self.pending.pop_front(),
			ToppleOrder::Lifo => self.pending.pop_back(),
		};
		match next {
			Some((x, y)) => {
				self.topple_at(x, y);
				true
			}
			None => false,
		}
	}

	fn topple_at(&mut self, x: usize, y: usize) {
		let cell = self.grid[y][x];
		if cell < TOPPLE_THRESHOLD {
			return;
		}
		let last = self.side() - 1;
		if x == 0 || y == 0 || x == last || y == last {
			panic!("toppling reached the border of a {0}x{0} grid at ({1}, {2})", self.side(), x, y);
		}
		let d = cell / TOPPLE_THRESHOLD;
		self.grid[y][x] = cell % TOPPLE_THRESHOLD;
		self.topplings += d;
		self.add_grains(x - 1, y, d);
		self.add_grains(x + 1, y, d);
		self.add_grains(x, y - 1, d);
		self.add_grains(x, y + 1, d);
	}

	pub fn side(&self) -> usize {
		self.grid.len()
	}

	pub fn center(&self) -> (usize, usize) {
		self.center
	}

	/// Grain count at column `x`, row `y`. Panics outside the grid.
	pub fn grains_at(&self, x: usize, y: usize) -> Cell {
		self.grid[y][x]
	}

	/// The amount the grid was built for, not a recount of its cells.
	pub fn amount(&self) -> u64 {
		self.amount
	}

	/// Number of topple events it took to stabilise the grid.
	pub fn topplings(&self) -> u64 {
		self.topplings
	}

	pub fn total_grains(&self) -> u64 {
		self.grid.iter().flatten().sum()
	}

	pub fn is_stable(&self) -> bool {
		self.grid.iter().flatten().all(|&c| c < TOPPLE_THRESHOLD)
	}

	pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
		self.grid.iter().map(|row| row.as_slice())
	}
}
