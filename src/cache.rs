use super::*;

/// Shape of the cache table: `size` worlds of `smallest * factor^i` grains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
	pub size: usize,
	pub smallest: u64,
	pub factor: u64,
}

impl Default for CacheConfig {
	fn default() -> Self {
		CacheConfig {
			size: 15,
			smallest: 20,
			factor: 2,
		}
	}
}

/// Stable piles of increasing size, reused to seed larger ones.
///
/// Built once up front and lent to every `Grid` construction; never
/// modified afterwards.
#[derive(Debug, Clone)]
pub struct WorldCache {
	worlds: Vec<Grid>,
}

impl WorldCache {
	pub fn new(config: CacheConfig) -> Result<WorldCache> {
		if config.smallest == 0 {
			return Err(Error::InvalidCache("smallest cached amount must be positive"));
		}
		if config.factor == 0 {
			return Err(Error::InvalidCache("amount factor must be positive"));
		}
		let mut amounts = Vec::with_capacity(config.size);
		let mut amount = config.smallest;
		for i in 0..config.size {
			amounts.push(amount);
			if i + 1 < config.size {
				amount = amount.checked_mul(config.factor)
					.ok_or(Error::InvalidCache("cached amount overflows u64"))?;
			}
		}
		let mut cache = WorldCache {
			worlds: Vec::with_capacity(config.size),
		};
		for amount in amounts {
			let world = Grid::new(amount, &cache);
			log::debug!("cached world of {} grains, {}x{}", amount, world.side(), world.side());
			cache.worlds.push(world);
		}
		Ok(cache)
	}

	/// The cache with no worlds in it; every deposit falls back to a single cell.
	pub fn empty() -> WorldCache {
		WorldCache {
			worlds: Vec::new(),
		}
	}

	/// The largest cached world of at most `amount` grains.
	pub fn lookup(&self, amount: u64) -> Option<&Grid> {
		self.worlds.iter().rev().find(|w| w.amount() <= amount)
	}

	pub fn worlds(&self) -> &[Grid] {
		&self.worlds
	}

	pub fn len(&self) -> usize {
		self.worlds.len()
	}

	pub fn is_empty(&self) -> bool {
		self.worlds.is_empty()
	}
}

impl Default for WorldCache {
	fn default() -> Self {
		WorldCache::new(CacheConfig::default()).expect("default cache config is valid")
	}
}

impl Grid {
	/// Drops `amount` grains at `(x, y)`, stamping cached stable piles
	/// centered there for as long as one fits, then the rest on `(x, y)`.
	///
	/// Leaves the grid unrelaxed.
	pub(super) fn deposit(&mut self, x: usize, y: usize, mut amount: u64, cache: Option<&WorldCache>) {
		while amount > 0 {
			let world = match cache.and_then(|c| c.lookup(amount)) {
				Some(world) => world,
				None => {
					self.add_grains(x, y, amount);
					return;
				}
			};
			let (cx, cy) = world.center();
			for (j, row) in world.rows().enumerate() {
				for (i, &grains) in row.iter().enumerate() {
					if grains > 0 {
						self.add_grains(x + i - cx, y + j - cy, grains);
					}
				}
			}
			amount -= world.amount();
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn small() -> WorldCache {
		WorldCache::new(CacheConfig {
			size: 4,
			smallest: 20,
			factor: 3,
		}).unwrap()
	}

	#[test]
	fn amounts_grow_geometrically() {
		let cache = small();
		let amounts: Vec<_> = cache.worlds().iter().map(|w| w.amount()).collect();
		assert_eq!(amounts, [20, 60, 180, 540]);
		assert!(cache.worlds().iter().all(|w| w.is_stable()));
	}

	#[test]
	fn lookup_picks_largest_fitting() {
		let cache = small();
		assert!(cache.lookup(0).is_none());
		assert!(cache.lookup(19).is_none());
		assert_eq!(cache.lookup(20).map(Grid::amount), Some(20));
		assert_eq!(cache.lookup(59).map(Grid::amount), Some(20));
		assert_eq!(cache.lookup(60).map(Grid::amount), Some(60));
		assert_eq!(cache.lookup(539).map(Grid::amount), Some(180));
		assert_eq!(cache.lookup(540).map(Grid::amount), Some(540));
		assert_eq!(cache.lookup(u64::MAX).map(Grid::amount), Some(540));
	}

	#[test]
	fn empty_cache_deposits_raw() {
		let mut g = Grid::blank(side_for(50), 50);
		let (x, y) = g.center();
		g.deposit(x, y, 50, Some(&WorldCache::empty()));
		assert_eq!(g.grains_at(x, y), 50);
		assert_eq!(g.pending.len(), 1);
	}

	#[test]
	fn deposit_stamps_then_drops_remainder() {
		let cache = small();
		let mut g = Grid::blank(side_for(85), 85);
		let (x, y) = g.center();
		g.deposit(x, y, 85, Some(&cache));
		// 60 + 20 stamped, 5 left on the center
		let stamp60 = cache.lookup(60).unwrap();
		let stamp20 = cache.lookup(20).unwrap();
		let (c60, c20) = (stamp60.center(), stamp20.center());
		let expected = stamp60.grains_at(c60.0, c60.1) + stamp20.grains_at(c20.0, c20.1) + 5;
		assert_eq!(g.grains_at(x, y), expected);
		assert_eq!(g.total_grains(), 85);
	}

	#[test]
	fn zero_factor_is_rejected() {
		let config = CacheConfig {
			factor: 0,
			..CacheConfig::default()
		};
		assert!(matches!(WorldCache::new(config), Err(Error::InvalidCache(_))));
	}

	#[test]
	fn zero_smallest_is_rejected() {
		let config = CacheConfig {
			smallest: 0,
			..CacheConfig::default()
		};
		assert!(matches!(WorldCache::new(config), Err(Error::InvalidCache(_))));
	}

	#[test]
	fn overflowing_amounts_are_rejected() {
		let config = CacheConfig {
			size: 70,
			smallest: 1,
			factor: 2,
		};
		assert!(matches!(WorldCache::new(config), Err(Error::InvalidCache(_))));
	}

	#[test]
	fn zero_size_is_empty() {
		let config = CacheConfig {
			size: 0,
			..CacheConfig::default()
		};
		assert!(WorldCache::new(config).unwrap().is_empty());
	}
}
