use log::warn;

use serde::Serialize;

use smartstring::alias::{String as SmartString};

use super::aggregate::RegionSeries;
use super::lookup::{RegionId, RegionIdentifierLookup};


#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionTotal {
	pub region: SmartString,
	pub id: RegionId,
	pub total: i64,
}

/// Latest cumulative value of a region, without a map identifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatestValue {
	pub region: SmartString,
	pub total: i64,
}


/// Result of an inner join: the joined rows plus the names of the regions
/// which found no partner and were left out.
#[derive(Debug, Clone, PartialEq)]
pub struct Joined<R> {
	pub rows: Vec<R>,
	pub missing: Vec<SmartString>,
}

impl<R> Joined<R> {
	pub fn rows(&self) -> &[R] {
		&self.rows[..]
	}

	pub fn missing(&self) -> &[SmartString] {
		&self.missing[..]
	}

	pub fn is_complete(&self) -> bool {
		self.missing.is_empty()
	}
}


/// The value at the most recent date for every region, in table order.
pub fn latest(agg: &RegionSeries) -> Vec<LatestValue> {
	let index = match agg.last_date().and_then(|date| agg.date_index(date)) {
		Some(i) => i,
		None => return Vec::new(),
	};
	agg.iter().map(|(region, values)| LatestValue{
		region: region.clone(),
		total: values[index],
	}).collect()
}

/// Current total per region joined with its map identifier.
///
/// Regions unknown to `lookup` are dropped and reported in
/// [`Joined::missing`].
pub fn totals(agg: &RegionSeries, lookup: &RegionIdentifierLookup) -> Joined<RegionTotal> {
	let mut rows = Vec::with_capacity(agg.nkeys());
	let mut missing = Vec::new();
	for LatestValue{region, total} in latest(agg) {
		match lookup.get(&region) {
			Some(id) => rows.push(RegionTotal{region, id, total}),
			None => missing.push(region),
		}
	}
	rows.sort_by(|a, b| a.region.cmp(&b.region));
	missing.sort();
	if !missing.is_empty() {
		warn!("{} regions have no map identifier and are left out: {}", missing.len(), missing.join(", "));
	}
	Joined{rows, missing}
}


#[cfg(test)]
mod tests {
	use super::*;
	use chrono::NaiveDate;

	fn series() -> RegionSeries {
		let dates = (1..=3).map(|d| NaiveDate::from_ymd(2020, 4, d)).collect();
		let mut agg = RegionSeries::new(dates);
		agg.insert("Ohio".into(), vec![1, 5, 9]);
		agg.insert("Guam".into(), vec![0, 2, 2]);
		agg.insert("Alabama".into(), vec![3, 3, 4]);
		agg
	}

	#[test]
	fn total_is_last_column() {
		let agg = series();
		let lookup: RegionIdentifierLookup = vec![("Ohio", 39), ("Alabama", 1), ("Guam", 66)].into_iter().collect();
		let joined = totals(&agg, &lookup);
		assert!(joined.is_complete());
		for row in joined.rows() {
			let values = agg.get(row.region.as_str()).unwrap();
			assert_eq!(row.total, values[values.len() - 1]);
		}
		assert_eq!(joined.rows()[0], RegionTotal{region: "Alabama".into(), id: 1, total: 4});
	}

	#[test]
	fn unknown_regions_are_reported() {
		let lookup: RegionIdentifierLookup = vec![("Ohio", 39), ("Alabama", 1)].into_iter().collect();
		let joined = totals(&series(), &lookup);
		let regions: Vec<&str> = joined.rows().iter().map(|r| r.region.as_str()).collect();
		assert_eq!(regions, vec!["Alabama", "Ohio"]);
		assert_eq!(joined.missing(), &[SmartString::from("Guam")]);
	}

	#[test]
	fn latest_of_empty_axis() {
		let agg = RegionSeries::new(vec![]);
		assert!(latest(&agg).is_empty());
	}
}
