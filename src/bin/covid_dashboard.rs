use std::path::PathBuf;
use std::process;

use log::info;

use covid_dashboard::{Config, CsvSink, Dashboard, RenderSink, SourceCache, ViewToggles};


static USAGE: &'static str = "usage: covid_dashboard [--sort] [--raw] [--no-compare] OUTDIR [STATE ...]

Downloads the JHU CSSE US time series, derives the per-state tables and
writes every view as CSV into OUTDIR. Listed states are compared
against each other.

  --sort        sort the bar charts by value, largest first
  --raw         also write the raw county tables
  --no-compare  skip the comparison views

Sources are taken from COVID_CASES_URL, COVID_DEATHS_URL and
COVID_STATE_IDS_URL; COVID_SNAPSHOT_DIR keeps a copy of every download.";


struct Args {
	outdir: PathBuf,
	states: Vec<String>,
	toggles: ViewToggles,
}

fn parse_args(argv: &[String]) -> Result<Args, String> {
	let mut toggles = ViewToggles::all();
	toggles.raw_tables = false;
	let mut positional = Vec::new();
	for arg in argv {
		match arg.as_str() {
			"--sort" => {
				toggles.sort_deaths_desc = true;
				toggles.sort_cases_desc = true;
			},
			"--raw" => toggles.raw_tables = true,
			"--no-compare" => toggles.compare = false,
			"-h" | "--help" => return Err(String::new()),
			s if s.starts_with("--") => return Err(format!("unknown option {}", s)),
			s => positional.push(s.to_string()),
		}
	}
	if positional.is_empty() {
		return Err("missing OUTDIR".into())
	}
	let outdir = PathBuf::from(positional.remove(0));
	Ok(Args{outdir, states: positional, toggles})
}


fn main() -> Result<(), Box<dyn std::error::Error>> {
	env_logger::init();

	let argv: Vec<String> = std::env::args().collect();
	let args = match parse_args(&argv[1..]) {
		Ok(args) => args,
		Err(msg) => {
			if !msg.is_empty() {
				eprintln!("{}", msg);
			}
			eprintln!("{}", USAGE);
			process::exit(2);
		},
	};

	let config = Config::from_env();
	let mut cache = SourceCache::http().with_snapshot_dir(config.snapshot_dir.clone());
	let dashboard = Dashboard::load(&mut cache, &config)?;

	let comparison = if args.toggles.compare {
		dashboard.compare(&args.states[..])?
	} else {
		None
	};

	let mut sink = CsvSink::new(&args.outdir)?;
	for view in dashboard.views(&args.toggles, comparison.as_ref()) {
		sink.render(&view)?;
	}
	info!("wrote {} files to {}", sink.written().len(), args.outdir.display());
	println!("states: {}", dashboard.regions().join(", "));
	Ok(())
}
