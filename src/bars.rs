use serde::Serialize;

use smartstring::alias::{String as SmartString};

use super::lookup::RegionId;
use super::totals::RegionTotal;


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarOrder {
	ByRegion,
	/// Largest first.
	Descending,
}


#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
	pub region: SmartString,
	pub id: RegionId,
	pub value: i64,
	pub above_mean: bool,
}

/// Per-region totals against the national mean.
#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
	pub mean: f64,
	pub bars: Vec<Bar>,
}

pub fn mean(totals: &[RegionTotal]) -> f64 {
	if totals.is_empty() {
		return 0.
	}
	let sum: i64 = totals.iter().map(|t| t.total).sum();
	sum as f64 / totals.len() as f64
}

pub fn bar_chart(totals: &[RegionTotal], order: BarOrder) -> BarChart {
	let mean = mean(totals);
	let mut bars: Vec<Bar> = totals.iter().map(|t| Bar{
		region: t.region.clone(),
		id: t.id,
		value: t.total,
		above_mean: t.total as f64 > mean,
	}).collect();
	if order == BarOrder::Descending {
		bars.sort_by(|a, b| b.value.cmp(&a.value).then(a.region.cmp(&b.region)));
	}
	BarChart{mean, bars}
}
