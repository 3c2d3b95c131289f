//! Parser for the JHU CSSE US time series tables
//! (`time_series_covid19_{confirmed,deaths}_US.csv`).

use std::collections::HashMap;
use std::io;

use log::{debug, info};

use smartstring::alias::{String as SmartString};

use chrono::NaiveDate;

use super::Metric;
use super::error::Error;
use super::timeseries::Counts;


pub static REGION_COLUMN: &'static str = "Province_State";
pub static SUB_REGION_COLUMN: &'static str = "Combined_Key";

static IDENTIFIER_COLUMNS: &'static [&'static str] = &[
	"UID",
	"iso2",
	"iso3",
	"code3",
	"FIPS",
	"Admin2",
	"Province_State",
	"Country_Region",
	"Lat",
	"Long_",
	"Combined_Key",
];

static DATE_FORMAT: &'static str = "%m/%d/%y";


/// The identifying columns a table for `metric` must carry.
pub fn expected_columns(metric: Metric) -> Vec<&'static str> {
	let mut result = IDENTIFIER_COLUMNS.to_vec();
	if metric == Metric::Deaths {
		result.push("Population");
	}
	result
}

/// Date column headers look like `1/22/20`.
pub fn parse_date_header(s: &str) -> Option<NaiveDate> {
	NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}


#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubRegion {
	pub region: SmartString,
	pub name: SmartString,
}

impl SubRegion {
	pub fn new<R: Into<SmartString>, N: Into<SmartString>>(region: R, name: N) -> Self {
		Self{region: region.into(), name: name.into()}
	}
}


/// Cumulative counts per sub-region (county), one column per date.
///
/// Only the region name, the sub-region label and the date columns survive
/// parsing; the other identifying columns are checked for presence and
/// then discarded.
#[derive(Debug, Clone)]
pub struct RawTable {
	metric: Metric,
	counts: Counts<SubRegion>,
}

fn column_index(headers: &csv::StringRecord, metric: Metric, name: &str) -> Result<usize, Error> {
	headers.iter().position(|h| h.trim() == name).ok_or_else(|| Error::schema(metric.name(), name))
}

fn parse_count(metric: Metric, line: u64, column: &str, cell: &str) -> Result<i64, Error> {
	let cell = cell.trim();
	if cell.is_empty() {
		return Ok(0)
	}
	cell.parse::<i64>().map_err(|e| Error::malformed(
		metric.name(),
		format!("line {}, column {}: {:?} is not a count ({})", line, column, cell, e),
	))
}

impl RawTable {
	pub fn new(metric: Metric, counts: Counts<SubRegion>) -> Self {
		Self{metric, counts}
	}

	pub fn from_csv<R: io::Read>(metric: Metric, r: R) -> Result<Self, Error> {
		let mut r = csv::Reader::from_reader(r);
		let headers = r.headers().map_err(|e| Error::malformed(metric.name(), e))?.clone();

		for name in expected_columns(metric) {
			column_index(&headers, metric, name)?;
		}
		let region_index = column_index(&headers, metric, REGION_COLUMN)?;
		let sub_region_index = column_index(&headers, metric, SUB_REGION_COLUMN)?;

		let mut date_columns: Vec<(usize, NaiveDate)> = headers.iter().enumerate().filter_map(|(i, h)| {
			Some((i, parse_date_header(h)?))
		}).collect();
		if date_columns.is_empty() {
			return Err(Error::schema(metric.name(), "<date columns>"))
		}
		date_columns.sort_by_key(|(_, date)| *date);
		if let Some(w) = date_columns.windows(2).find(|w| w[0].1 == w[1].1) {
			return Err(Error::malformed(metric.name(), format!("duplicate date column {}", w[0].1)))
		}

		let dates: Vec<NaiveDate> = date_columns.iter().map(|(_, date)| *date).collect();
		let mut counts = Counts::new(dates);
		let mut decreasing = 0usize;
		for row in r.records() {
			let row = row.map_err(|e| Error::malformed(metric.name(), e))?;
			let line = row.position().map(|p| p.line()).unwrap_or(0);
			let cell = |i: usize| row.get(i).unwrap_or("").trim();
			let key = SubRegion::new(cell(region_index), cell(sub_region_index));

			let mut values = Vec::with_capacity(date_columns.len());
			for (i, _) in date_columns.iter() {
				values.push(parse_count(metric, line, &headers[*i], cell(*i))?);
			}
			if values.windows(2).any(|w| w[1] < w[0]) {
				decreasing += 1;
			}

			if counts.contains_key(&key) {
				debug!("{}: duplicate sub-region {:?} on line {}, summing", metric, key, line);
			}
			let dst = counts.get_or_create(key);
			for (acc, v) in dst.iter_mut().zip(values.into_iter()) {
				*acc += v;
			}
		}

		if decreasing > 0 {
			debug!("{}: {} sub-regions have decreasing cumulative counts", metric, decreasing);
		}
		info!(
			"{}: parsed {} sub-regions over {} dates ({} .. {})",
			metric,
			counts.nkeys(),
			counts.len(),
			counts.dates()[0],
			counts.dates()[counts.len() - 1],
		);
		Ok(Self{metric, counts})
	}

	/// Rebuild a raw-shaped table from per-region series, with every region
	/// acting as its own single sub-region.
	pub fn from_region_series(metric: Metric, series: &Counts<SmartString>) -> Self {
		let mut counts = Counts::new(series.dates().to_vec());
		for (region, values) in series.iter() {
			counts.insert(SubRegion::new(region.clone(), region.clone()), values.to_vec());
		}
		Self{metric, counts}
	}

	pub fn metric(&self) -> Metric {
		self.metric
	}

	pub fn counts(&self) -> &Counts<SubRegion> {
		&self.counts
	}

	pub fn dates(&self) -> &[NaiveDate] {
		self.counts.dates()
	}

	/// Number of sub-regions per region.
	pub fn sub_region_counts(&self) -> HashMap<&str, usize> {
		let mut result = HashMap::new();
		for k in self.counts.keys() {
			*result.entry(k.region.as_str()).or_insert(0) += 1;
		}
		result
	}
}
