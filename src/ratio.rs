use std::collections::{HashMap, HashSet};

use log::warn;

use serde::Serialize;

use smartstring::alias::{String as SmartString};

use super::lookup::RegionId;
use super::totals::{Joined, RegionTotal};


#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionRatio {
	pub region: SmartString,
	pub id: RegionId,
	pub deaths: i64,
	pub cases: i64,
	/// Deaths per case; `None` where no cases were recorded.
	pub ratio: Option<f64>,
}


pub fn death_case_ratio(deaths: i64, cases: i64) -> Option<f64> {
	if cases == 0 {
		return None
	}
	Some(deaths as f64 / cases as f64)
}

/// Join death and case totals by region and compute deaths per case.
///
/// The identifier comes from the death totals. Regions present on only one
/// side are reported in [`Joined::missing`].
pub fn ratio(deaths: &[RegionTotal], cases: &[RegionTotal]) -> Joined<RegionRatio> {
	let case_map: HashMap<&str, i64> = cases.iter().map(|t| (t.region.as_str(), t.total)).collect();
	let mut rows = Vec::with_capacity(deaths.len());
	let mut missing = Vec::new();
	for d in deaths.iter() {
		match case_map.get(d.region.as_str()) {
			Some(cases) => rows.push(RegionRatio{
				region: d.region.clone(),
				id: d.id,
				deaths: d.total,
				cases: *cases,
				ratio: death_case_ratio(d.total, *cases),
			}),
			None => missing.push(d.region.clone()),
		}
	}
	let death_regions: HashSet<&str> = deaths.iter().map(|t| t.region.as_str()).collect();
	for c in cases.iter() {
		if !death_regions.contains(c.region.as_str()) {
			missing.push(c.region.clone());
		}
	}

	rows.sort_by(|a, b| a.region.cmp(&b.region));
	missing.sort();
	missing.dedup();
	if !missing.is_empty() {
		warn!("{} regions lack either deaths or cases and are left out of the ratio: {}", missing.len(), missing.join(", "));
	}
	let undefined = rows.iter().filter(|r| r.ratio.is_none()).count();
	if undefined > 0 {
		warn!("{} regions have no recorded cases, their ratio is undefined", undefined);
	}
	Joined{rows, missing}
}
