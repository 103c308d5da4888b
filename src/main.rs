use seahorse::{
	png,
	Error,
	Grid,
	Palette,
	WorldCache,
};

use std::time::Instant;

const DEFAULT_GRAIN_AMOUNT: u64 = 100_000;
const DEFAULT_FILENAME: &str = "world.png";

fn main() {
	env_logger::init();
	let start = Instant::now();
	let config = match Config::new(&mut std::env::args()) {
		Ok(config) => config,
		Err(e) => {
			println!("{}", e);
			return
		}
	};
	log::debug!("{:?}", config);
	let grid = if config.cache {
		let cache = WorldCache::default();
		log::info!("world cache of {} piles built in {:?}", cache.len(), start.elapsed());
		Grid::new(config.amount, &cache)
	} else {
		Grid::uncached(config.amount)
	};
	log::info!("{} grains stable on a {}x{} grid", grid.amount(), grid.side(), grid.side());
	if config.out_ascii {
		print!("{}", grid);
	}
	if config.topplings {
		println!("Topplings: {}", grid.topplings());
	}
	if let Some(filename) = &config.out_png {
		if let Err(e) = png(&grid, &Palette::default(), filename) {
			log::error!("Can't write to file {}. {}", filename, e);
		}
	}
	let elapsed = start.elapsed();
	log::info!("done in {:?}", elapsed);
	if config.time {
		println!("{}", elapsed.as_millis());
	}
}

#[derive(Debug)]
struct Config {
	amount: u64,
	out_ascii: bool,
	out_png: Option<String>,
	topplings: bool,
	time: bool,
	cache: bool,
}

impl Config {
	fn new(args: &mut dyn Iterator<Item = String>) -> Result<Config, Error> {
		args.next();
		let amount = match args.next() {
			None => DEFAULT_GRAIN_AMOUNT,
			Some(s) => s.parse::<u64>().map_err(|_| Error::Config(format!("\
Please specify the grain amount as a non-negative integer as the 1st command line argument.
Example of a correct call (with cargo, use 'cargo run --release' instead of 'seahorse'):
seahorse 100000 png+time world.png
Got: {}", s)))?,
		};
		let mut out_ascii = false;
		let mut out_png = false;
		let mut topplings = false;
		let mut time = false;
		let mut cache = true;
		match args.next() {
			None => {
				out_png = true;
				time = true;
			}
			Some(s) => for out in s.split('+') {
				match out {
					"ascii" => out_ascii = true,
					"png" => out_png = true,
					"topplings" => topplings = true,
					"time" => time = true,
					"nocache" => cache = false,
					_ => return Err(Error::Config(format!("\
Expected output format: '+'-separated 'ascii', 'png', 'topplings', 'time', and/or 'nocache'.
Got: {}", out)))
				}
			},
		}
		let filename = args.next();
		if !out_png && filename.is_some() {
			return Err(Error::Config("A file name was given, but 'png' is not among the outputs.".to_owned()));
		}
		if let Some(s) = args.next() {
			return Err(Error::Config(format!("Unexpected argument: {}", s)));
		}
		Ok(Config {
			amount,
			out_ascii,
			out_png: if out_png {
				Some(filename.unwrap_or_else(|| DEFAULT_FILENAME.to_owned()))
			} else { None },
			topplings,
			time,
			cache,
		})
	}
}
