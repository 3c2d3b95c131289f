use std::env;
use std::path::PathBuf;

use enum_map::{enum_map, EnumMap};

use log::warn;

use super::Metric;
use super::reshape::LongFormOrder;


pub static DEFAULT_CASES_URL: &'static str = "https://raw.githubusercontent.com/CSSEGISandData/COVID-19/master/csse_covid_19_data/csse_covid_19_time_series/time_series_covid19_confirmed_US.csv";
pub static DEFAULT_DEATHS_URL: &'static str = "https://raw.githubusercontent.com/CSSEGISandData/COVID-19/master/csse_covid_19_data/csse_covid_19_time_series/time_series_covid19_deaths_US.csv";
pub static DEFAULT_STATE_IDS_URL: &'static str = "https://cdn.jsdelivr.net/npm/vega-datasets@v1.29.0/data/population_engineers_hurricanes.csv";


/// Where the data comes from and how it is shaped.
///
/// Locations may be `http(s)://` URLs or local paths (optionally `.gz`).
#[derive(Debug, Clone)]
pub struct Config {
	pub series_urls: EnumMap<Metric, String>,
	pub state_ids_url: String,
	pub snapshot_dir: Option<PathBuf>,
	pub long_form_order: LongFormOrder,
}

impl Default for Config {
	fn default() -> Self {
		Self{
			series_urls: enum_map!{
				Metric::Cases => DEFAULT_CASES_URL.to_string(),
				Metric::Deaths => DEFAULT_DEATHS_URL.to_string(),
			},
			state_ids_url: DEFAULT_STATE_IDS_URL.into(),
			snapshot_dir: None,
			long_form_order: LongFormOrder::default(),
		}
	}
}

fn env_or(name: &str, default: &str) -> String {
	env::var(name).unwrap_or(default.into())
}

impl Config {
	/// Read the configuration from the environment:
	///
	/// - `COVID_CASES_URL`, `COVID_DEATHS_URL`, `COVID_STATE_IDS_URL`
	/// - `COVID_SNAPSHOT_DIR`: write every fetched body there
	/// - `COVID_LONG_FORM_ORDER`: `date` (default) or `value`
	pub fn from_env() -> Self {
		let long_form_order = match env::var("COVID_LONG_FORM_ORDER") {
			Ok(s) => match s.parse::<LongFormOrder>() {
				Ok(order) => order,
				Err(e) => {
					warn!("ignoring COVID_LONG_FORM_ORDER: {}", e);
					LongFormOrder::default()
				},
			},
			Err(_) => LongFormOrder::default(),
		};
		Self{
			series_urls: enum_map!{
				Metric::Cases => env_or("COVID_CASES_URL", DEFAULT_CASES_URL),
				Metric::Deaths => env_or("COVID_DEATHS_URL", DEFAULT_DEATHS_URL),
			},
			state_ids_url: env_or("COVID_STATE_IDS_URL", DEFAULT_STATE_IDS_URL),
			snapshot_dir: env::var_os("COVID_SNAPSHOT_DIR").map(PathBuf::from),
			long_form_order,
		}
	}

	pub fn series_url(&self, metric: Metric) -> &str {
		&self.series_urls[metric]
	}
}
