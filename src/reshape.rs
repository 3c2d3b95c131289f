use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use smartstring::alias::{String as SmartString};

use chrono::NaiveDate;

use super::aggregate::RegionSeries;


/// Row order of a long form table. Rows are always grouped by region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LongFormOrder {
	/// By date within each region.
	Chronological,
	/// By value within each region, ties by date.
	ByValue,
}

impl Default for LongFormOrder {
	fn default() -> Self {
		Self::Chronological
	}
}

#[derive(Debug, Clone)]
pub struct ParseLongFormOrderError(String);

impl fmt::Display for ParseLongFormOrderError {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		write!(f, "unknown long form order {:?}, expected \"date\" or \"value\"", self.0)
	}
}

impl std::error::Error for ParseLongFormOrderError {}

impl FromStr for LongFormOrder {
	type Err = ParseLongFormOrderError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"date" | "chronological" => Ok(Self::Chronological),
			"value" => Ok(Self::ByValue),
			other => Err(ParseLongFormOrderError(other.into())),
		}
	}
}


#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LongFormRow {
	pub region: SmartString,
	pub date: NaiveDate,
	pub value: i64,
}


/// Unpivot a wide region × date table into one row per (region, date).
pub fn to_long_form(agg: &RegionSeries, order: LongFormOrder) -> Vec<LongFormRow> {
	let mut result = Vec::with_capacity(agg.nkeys() * agg.len());
	for (region, values) in agg.iter() {
		for (date, value) in agg.dates().iter().zip(values.iter()) {
			result.push(LongFormRow{
				region: region.clone(),
				date: *date,
				value: *value,
			});
		}
	}
	match order {
		LongFormOrder::Chronological => result.sort_by(|a, b| {
			a.region.cmp(&b.region).then(a.date.cmp(&b.date))
		}),
		LongFormOrder::ByValue => result.sort_by(|a, b| {
			a.region.cmp(&b.region).then(a.value.cmp(&b.value)).then(a.date.cmp(&b.date))
		}),
	}
	result
}


#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashSet;

	fn d(day: u32) -> NaiveDate {
		NaiveDate::from_ymd(2020, 6, day)
	}

	fn series() -> RegionSeries {
		let mut agg = RegionSeries::new(vec![d(1), d(2), d(3)]);
		agg.insert("Texas".into(), vec![4, 9, 7]);
		agg.insert("Maine".into(), vec![1, 1, 2]);
		agg
	}

	#[test]
	fn cross_product() {
		let agg = series();
		let rows = to_long_form(&agg, LongFormOrder::Chronological);
		assert_eq!(rows.len(), agg.nkeys() * agg.len());
		let pairs: HashSet<(&str, NaiveDate)> = rows.iter().map(|r| (r.region.as_str(), r.date)).collect();
		let mut expected = HashSet::new();
		for region in &["Texas", "Maine"] {
			for date in agg.dates() {
				expected.insert((*region, *date));
			}
		}
		assert_eq!(pairs, expected);
	}

	#[test]
	fn chronological_by_default() {
		let rows = to_long_form(&series(), LongFormOrder::default());
		let texas: Vec<(NaiveDate, i64)> = rows.iter().filter(|r| r.region.as_str() == "Texas").map(|r| (r.date, r.value)).collect();
		assert_eq!(texas, vec![(d(1), 4), (d(2), 9), (d(3), 7)]);
		assert_eq!(rows[0].region.as_str(), "Maine");
	}

	#[test]
	fn by_value() {
		let rows = to_long_form(&series(), LongFormOrder::ByValue);
		let values: Vec<(&str, i64)> = rows.iter().map(|r| (r.region.as_str(), r.value)).collect();
		assert_eq!(values, vec![("Maine", 1), ("Maine", 1), ("Maine", 2), ("Texas", 4), ("Texas", 7), ("Texas", 9)]);
		assert_eq!(rows[0].date, d(1));
	}

	#[test]
	fn parse_order() {
		assert_eq!("date".parse::<LongFormOrder>().unwrap(), LongFormOrder::Chronological);
		assert_eq!("value".parse::<LongFormOrder>().unwrap(), LongFormOrder::ByValue);
		assert!("random".parse::<LongFormOrder>().is_err());
	}
}
