use seahorse::{png, CellState, Grid, Palette, WorldCache};

#[test]
fn writes_png() {
	let g = Grid::new(500, &WorldCache::empty());
	let path = std::env::temp_dir().join(format!("seahorse-{}.png", std::process::id()));
	png(&g, &Palette::default(), &path).unwrap();
	let bytes = std::fs::read(&path).unwrap();
	std::fs::remove_file(&path).unwrap();
	assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
}

#[test]
fn sink_failure_leaves_grid_intact() {
	let g = Grid::uncached(300);
	let before = g.to_string();
	let path = std::env::temp_dir().join("seahorse-missing-dir").join("nested").join("world.png");
	assert!(png(&g, &Palette::default(), &path).is_err());
	assert_eq!(g.to_string(), before);
	assert_eq!(g.total_grains(), 300);
}

#[test]
fn every_stable_cell_has_a_state() {
	let g = Grid::uncached(1000);
	let p = Palette::default();
	for &c in g.rows().flatten() {
		let color = p.color(CellState::from_grains(c));
		assert_eq!(color[3], 255);
	}
}

#[test]
fn ascii_has_one_line_per_row() {
	let g = Grid::uncached(100);
	let s = g.to_string();
	assert_eq!(s.lines().count(), g.side());
	assert!(s.lines().all(|l| l.chars().count() == g.side()));
}
