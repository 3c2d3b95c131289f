use std::collections::HashSet;

use log::debug;

use super::aggregate::RegionSeries;
use super::error::Error;


/// Slice `agg` down to `regions`, in request order and with the same date
/// axis. Repeated names are collected once.
///
/// Every requested name must be part of `agg`; otherwise nothing is
/// returned and the error lists all unknown names. An empty request yields
/// an empty table.
pub fn select_regions<S: AsRef<str>>(agg: &RegionSeries, regions: &[S]) -> Result<RegionSeries, Error> {
	let unknown: Vec<String> = regions.iter()
		.map(|r| AsRef::<str>::as_ref(r))
		.filter(|r| !agg.contains_key(*r))
		.map(|r| r.to_string())
		.collect();
	if !unknown.is_empty() {
		return Err(Error::UnknownRegions(unknown))
	}

	let mut result = RegionSeries::new(agg.dates().to_vec());
	let mut seen = HashSet::new();
	for region in regions.iter().map(|r| AsRef::<str>::as_ref(r)) {
		if !seen.insert(region) {
			continue
		}
		if let Some(values) = agg.get(region) {
			result.insert(region.into(), values.to_vec());
		}
	}
	debug!("selected {} of {} regions", result.nkeys(), agg.nkeys());
	Ok(result)
}


#[cfg(test)]
mod tests {
	use super::*;
	use chrono::NaiveDate;

	fn series() -> RegionSeries {
		let dates = vec![NaiveDate::from_ymd(2020, 5, 1), NaiveDate::from_ymd(2020, 5, 2)];
		let mut agg = RegionSeries::new(dates);
		agg.insert("California".into(), vec![10, 20]);
		agg.insert("Ohio".into(), vec![1, 2]);
		agg.insert("Texas".into(), vec![5, 6]);
		agg
	}

	#[test]
	fn selects_exactly_the_requested_rows() {
		let agg = series();
		let selected = select_regions(&agg, &["California", "Texas"]).unwrap();
		assert_eq!(selected.nkeys(), 2);
		let names: Vec<&str> = selected.keys().map(|k| k.as_str()).collect();
		assert_eq!(names, vec!["California", "Texas"]);
		assert_eq!(selected.dates(), agg.dates());
		assert_eq!(selected.get("Texas"), agg.get("Texas"));
		assert!(!selected.contains_key("Ohio"));
	}

	#[test]
	fn keeps_request_order_and_collapses_duplicates() {
		let selected = select_regions(&series(), &["Texas", "Ohio", "Texas"]).unwrap();
		let names: Vec<&str> = selected.keys().map(|k| k.as_str()).collect();
		assert_eq!(names, vec!["Texas", "Ohio"]);
	}

	#[test]
	fn unknown_names_fail() {
		match select_regions(&series(), &["Texas", "Narnia", "Oz"]) {
			Err(Error::UnknownRegions(names)) => assert_eq!(names, vec!["Narnia".to_string(), "Oz".to_string()]),
			other => panic!("unexpected result: {:?}", other),
		}
	}

	#[test]
	fn empty_selection_is_empty() {
		let none: [&str; 0] = [];
		let selected = select_regions(&series(), &none).unwrap();
		assert!(selected.is_empty());
		assert_eq!(selected.len(), 2);
	}
}
