use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{info, trace};

use serde::Serialize;

use smartstring::alias::{String as SmartString};

use super::dashboard::View;
use super::error::Error;
use super::jhu::RawTable;
use super::lookup::RegionId;


/// The drawing side of the dashboard. It only ever receives prepared tables.
pub trait RenderSink {
	fn render(&mut self, view: &View<'_>) -> Result<(), Error>;
}


#[derive(Debug, Serialize)]
struct BarRecord<'x> {
	region: &'x str,
	id: RegionId,
	value: i64,
	above_mean: bool,
	mean: f64,
}


fn csv_error(e: csv::Error) -> Error {
	Error::Io(e.into())
}

fn write_records<S: Serialize, I: IntoIterator<Item = S>>(path: &Path, records: I) -> Result<(), Error> {
	let mut w = csv::Writer::from_path(path).map_err(csv_error)?;
	for rec in records {
		w.serialize(rec).map_err(csv_error)?;
	}
	w.flush()?;
	Ok(())
}

/// Wide layout: region, sub-region, then one column per date (ISO format).
fn write_raw(path: &Path, table: &RawTable) -> Result<(), Error> {
	let mut w = csv::Writer::from_path(path).map_err(csv_error)?;
	let mut header: Vec<String> = vec!["region".into(), "sub_region".into()];
	header.extend(table.dates().iter().map(|d| d.to_string()));
	w.write_record(&header).map_err(csv_error)?;
	let mut record: Vec<SmartString> = Vec::with_capacity(header.len());
	for (k, values) in table.counts().iter() {
		record.clear();
		record.push(k.region.clone());
		record.push(k.name.clone());
		record.extend(values.iter().map(|v| SmartString::from(v.to_string())));
		w.write_record(record.iter().map(|s| s.as_bytes())).map_err(csv_error)?;
	}
	w.flush()?;
	Ok(())
}


/// Writes every view as `<name>.csv` into a directory, for an external
/// front end to pick up.
pub struct CsvSink {
	dir: PathBuf,
	written: Vec<PathBuf>,
}

impl CsvSink {
	pub fn new<P: Into<PathBuf>>(dir: P) -> io::Result<Self> {
		let dir = dir.into();
		fs::create_dir_all(&dir)?;
		Ok(Self{dir, written: Vec::new()})
	}

	pub fn written(&self) -> &[PathBuf] {
		&self.written[..]
	}
}

impl RenderSink for CsvSink {
	fn render(&mut self, view: &View<'_>) -> Result<(), Error> {
		let path = self.dir.join(format!("{}.csv", view.name()));
		trace!("rendering {} to {}", view.name(), path.display());
		match view {
			View::RawTable{table, ..} => write_raw(&path, table)?,
			View::TotalsTable{totals, ..} | View::Map{totals, ..} => write_records(&path, totals.iter())?,
			View::Bars{chart, ..} => write_records(&path, chart.bars.iter().map(|b| BarRecord{
				region: b.region.as_str(),
				id: b.id,
				value: b.value,
				above_mean: b.above_mean,
				mean: chart.mean,
			}))?,
			View::Lines{series, ..} | View::CompareLines{series, ..} => write_records(&path, series.iter())?,
			View::RatioMap{ratios} => write_records(&path, ratios.iter())?,
			View::CompareTotals{totals, ..} => write_records(&path, totals.iter())?,
			View::SelectionPrompt => {
				info!("no regions selected for comparison, select at least one");
				return Ok(())
			},
		}
		self.written.push(path);
		Ok(())
	}
}
