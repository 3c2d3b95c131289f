use std::fmt;

use enum_map::Enum;

use serde::Serialize;

mod error;
mod config;
mod source;
mod jhu;
mod lookup;
mod timeseries;
mod aggregate;
mod totals;
mod reshape;
mod ratio;
mod select;
mod bars;
mod dashboard;
mod render;

pub use error::Error;
pub use config::*;
pub use source::*;
pub use jhu::*;
pub use lookup::*;
pub use timeseries::*;
pub use aggregate::*;
pub use totals::*;
pub use reshape::*;
pub use ratio::*;
pub use select::*;
pub use bars::*;
pub use dashboard::*;
pub use render::*;


/// The two cumulative datasets published per county.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Enum, Serialize)]
pub enum Metric {
	#[serde(rename = "cases")]
	Cases,
	#[serde(rename = "deaths")]
	Deaths,
}

impl Metric {
	pub fn all() -> [Metric; 2] {
		[Metric::Deaths, Metric::Cases]
	}

	pub fn name(&self) -> &'static str {
		match self {
			Self::Cases => "cases",
			Self::Deaths => "deaths",
		}
	}
}

impl fmt::Display for Metric {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		f.write_str(self.name())
	}
}
