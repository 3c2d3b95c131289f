use log::{debug, info};

use smartstring::alias::{String as SmartString};

use super::Metric;
use super::aggregate::{aggregate, RegionSeries};
use super::bars::{bar_chart, BarChart, BarOrder};
use super::config::Config;
use super::error::Error;
use super::jhu::RawTable;
use super::lookup::RegionIdentifierLookup;
use super::ratio::{ratio, RegionRatio};
use super::reshape::{to_long_form, LongFormOrder, LongFormRow};
use super::select::select_regions;
use super::source::{Fetch, SourceCache};
use super::totals::{latest, totals, Joined, LatestValue, RegionTotal};


/// Every table derived from one metric's raw data.
#[derive(Debug, Clone)]
pub struct MetricView {
	raw: RawTable,
	aggregated: RegionSeries,
	totals: Joined<RegionTotal>,
	long_form: Vec<LongFormRow>,
}

impl MetricView {
	pub fn build(raw: RawTable, lookup: &RegionIdentifierLookup, order: LongFormOrder) -> Self {
		let aggregated = aggregate(&raw);
		let totals = totals(&aggregated, lookup);
		let long_form = to_long_form(&aggregated, order);
		Self{raw, aggregated, totals, long_form}
	}

	pub fn metric(&self) -> Metric {
		self.raw.metric()
	}

	pub fn raw(&self) -> &RawTable {
		&self.raw
	}

	pub fn aggregated(&self) -> &RegionSeries {
		&self.aggregated
	}

	pub fn totals(&self) -> &Joined<RegionTotal> {
		&self.totals
	}

	pub fn long_form(&self) -> &[LongFormRow] {
		&self.long_form[..]
	}

	pub fn bar_chart(&self, order: BarOrder) -> BarChart {
		bar_chart(self.totals.rows(), order)
	}
}


/// One metric restricted to the user's selection.
#[derive(Debug, Clone)]
pub struct Selection {
	pub series: RegionSeries,
	pub totals: Vec<LatestValue>,
	pub long_form: Vec<LongFormRow>,
}

impl Selection {
	fn build(agg: &RegionSeries, regions: &[SmartString], order: LongFormOrder) -> Result<Self, Error> {
		let series = select_regions(agg, regions)?;
		let totals = latest(&series);
		let long_form = to_long_form(&series, order);
		Ok(Self{series, totals, long_form})
	}
}

#[derive(Debug, Clone)]
pub struct Comparison {
	pub regions: Vec<SmartString>,
	pub cases: Selection,
	pub deaths: Selection,
}

impl Comparison {
	pub fn metric(&self, metric: Metric) -> &Selection {
		match metric {
			Metric::Cases => &self.cases,
			Metric::Deaths => &self.deaths,
		}
	}
}


/// The switches offered by the page. Everything is off by default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewToggles {
	pub deaths: bool,
	pub cases: bool,
	pub ratio: bool,
	pub compare: bool,
	pub raw_tables: bool,
	pub summary_tables: bool,
	pub sort_deaths_desc: bool,
	pub sort_cases_desc: bool,
	pub compare_totals_deaths: bool,
	pub compare_series_deaths: bool,
	pub compare_totals_cases: bool,
	pub compare_series_cases: bool,
}

impl ViewToggles {
	/// Every section and every table, bars in region order.
	pub fn all() -> Self {
		Self{
			deaths: true,
			cases: true,
			ratio: true,
			compare: true,
			raw_tables: true,
			summary_tables: true,
			sort_deaths_desc: false,
			sort_cases_desc: false,
			compare_totals_deaths: true,
			compare_series_deaths: true,
			compare_totals_cases: true,
			compare_series_cases: true,
		}
	}

	fn section(&self, metric: Metric) -> bool {
		match metric {
			Metric::Cases => self.cases,
			Metric::Deaths => self.deaths,
		}
	}

	fn bar_order(&self, metric: Metric) -> BarOrder {
		let desc = match metric {
			Metric::Cases => self.sort_cases_desc,
			Metric::Deaths => self.sort_deaths_desc,
		};
		if desc {
			BarOrder::Descending
		} else {
			BarOrder::ByRegion
		}
	}

	fn compare_totals(&self, metric: Metric) -> bool {
		match metric {
			Metric::Cases => self.compare_totals_cases,
			Metric::Deaths => self.compare_totals_deaths,
		}
	}

	fn compare_series(&self, metric: Metric) -> bool {
		match metric {
			Metric::Cases => self.compare_series_cases,
			Metric::Deaths => self.compare_series_deaths,
		}
	}
}


/// A prepared table together with the way it is meant to be drawn.
#[derive(Debug, Clone)]
pub enum View<'a> {
	RawTable{metric: Metric, table: &'a RawTable},
	TotalsTable{metric: Metric, totals: &'a [RegionTotal]},
	Map{metric: Metric, totals: &'a [RegionTotal]},
	Bars{metric: Metric, chart: BarChart},
	Lines{metric: Metric, series: &'a [LongFormRow]},
	RatioMap{ratios: &'a [RegionRatio]},
	CompareTotals{metric: Metric, totals: &'a [LatestValue]},
	CompareLines{metric: Metric, series: &'a [LongFormRow]},
	/// Comparison requested without any region selected.
	SelectionPrompt,
}

impl<'a> View<'a> {
	pub fn name(&self) -> String {
		match self {
			Self::RawTable{metric, ..} => format!("{}_raw", metric),
			Self::TotalsTable{metric, ..} => format!("{}_totals", metric),
			Self::Map{metric, ..} => format!("{}_map", metric),
			Self::Bars{metric, ..} => format!("{}_bars", metric),
			Self::Lines{metric, ..} => format!("{}_lines", metric),
			Self::RatioMap{..} => "ratio_map".into(),
			Self::CompareTotals{metric, ..} => format!("compare_{}_totals", metric),
			Self::CompareLines{metric, ..} => format!("compare_{}_lines", metric),
			Self::SelectionPrompt => "selection_prompt".into(),
		}
	}
}


/// All derived tables of one session.
#[derive(Debug, Clone)]
pub struct Dashboard {
	cases: MetricView,
	deaths: MetricView,
	ratio: Joined<RegionRatio>,
	long_form_order: LongFormOrder,
}

impl Dashboard {
	/// Fetch (through `cache`) and derive everything.
	pub fn load<F: Fetch>(cache: &mut SourceCache<F>, config: &Config) -> Result<Self, Error> {
		let lookup = RegionIdentifierLookup::from_csv(&cache.get(&config.state_ids_url)?[..])?;
		debug!("loaded {} state identifiers", lookup.len());
		let cases = RawTable::from_csv(Metric::Cases, &cache.get(config.series_url(Metric::Cases))?[..])?;
		let deaths = RawTable::from_csv(Metric::Deaths, &cache.get(config.series_url(Metric::Deaths))?[..])?;
		Ok(Self::from_raw(cases, deaths, &lookup, config.long_form_order))
	}

	pub fn from_raw(cases: RawTable, deaths: RawTable, lookup: &RegionIdentifierLookup, order: LongFormOrder) -> Self {
		assert_eq!(cases.metric(), Metric::Cases);
		assert_eq!(deaths.metric(), Metric::Deaths);
		let cases = MetricView::build(cases, lookup, order);
		let deaths = MetricView::build(deaths, lookup, order);
		let ratio = ratio(deaths.totals().rows(), cases.totals().rows());
		info!(
			"dashboard ready: {} regions with deaths, {} with cases, {} ratios",
			deaths.totals().rows().len(),
			cases.totals().rows().len(),
			ratio.rows().len(),
		);
		Self{cases, deaths, ratio, long_form_order: order}
	}

	pub fn metric(&self, metric: Metric) -> &MetricView {
		match metric {
			Metric::Cases => &self.cases,
			Metric::Deaths => &self.deaths,
		}
	}

	pub fn ratio(&self) -> &Joined<RegionRatio> {
		&self.ratio
	}

	/// The regions offered for selection.
	pub fn regions(&self) -> Vec<&str> {
		self.deaths.totals().rows().iter().map(|t| t.region.as_str()).collect()
	}

	/// Restrict both metrics to `regions`; `None` if nothing is selected.
	pub fn compare<S: AsRef<str>>(&self, regions: &[S]) -> Result<Option<Comparison>, Error> {
		if regions.is_empty() {
			return Ok(None)
		}
		let regions: Vec<SmartString> = regions.iter().map(|r| SmartString::from(AsRef::<str>::as_ref(r))).collect();
		let order = self.long_form_order;
		let deaths = Selection::build(self.deaths.aggregated(), &regions, order)?;
		let cases = Selection::build(self.cases.aggregated(), &regions, order)?;
		Ok(Some(Comparison{regions, cases, deaths}))
	}

	/// The views to draw for `toggles`, in page order.
	pub fn views<'a>(&'a self, toggles: &ViewToggles, comparison: Option<&'a Comparison>) -> Vec<View<'a>> {
		let mut result = Vec::new();
		for metric in Metric::all().iter().copied() {
			if !toggles.section(metric) {
				continue
			}
			let mv = self.metric(metric);
			if toggles.raw_tables {
				result.push(View::RawTable{metric, table: mv.raw()});
			}
			if toggles.summary_tables {
				result.push(View::TotalsTable{metric, totals: mv.totals().rows()});
			}
			result.push(View::Map{metric, totals: mv.totals().rows()});
			result.push(View::Bars{metric, chart: mv.bar_chart(toggles.bar_order(metric))});
			result.push(View::Lines{metric, series: mv.long_form()});
		}
		if toggles.ratio {
			result.push(View::RatioMap{ratios: self.ratio.rows()});
		}
		if toggles.compare {
			match comparison {
				None => result.push(View::SelectionPrompt),
				Some(c) => {
					for metric in Metric::all().iter().copied() {
						let sel = c.metric(metric);
						if toggles.compare_totals(metric) {
							result.push(View::CompareTotals{metric, totals: &sel.totals[..]});
						}
						if toggles.compare_series(metric) {
							result.push(View::CompareLines{metric, series: &sel.long_form[..]});
						}
					}
				},
			}
		}
		result
	}
}


#[cfg(test)]
mod tests {
	use super::*;
	use chrono::NaiveDate;
	use crate::jhu::SubRegion;
	use crate::timeseries::Counts;

	fn raw(metric: Metric, rows: &[(&str, &str, [i64; 3])]) -> RawTable {
		let dates = (1..=3).map(|d| NaiveDate::from_ymd(2020, 4, d)).collect();
		let mut counts = Counts::new(dates);
		for (region, name, values) in rows {
			counts.insert(SubRegion::new(*region, *name), values.to_vec());
		}
		RawTable::new(metric, counts)
	}

	fn dashboard() -> Dashboard {
		let cases = raw(Metric::Cases, &[
			("Ohio", "a", [1, 5, 10]),
			("Ohio", "b", [0, 5, 10]),
			("Texas", "c", [2, 4, 50]),
			("Guam", "d", [0, 1, 1]),
			("Samoa", "e", [0, 0, 0]),
		]);
		let deaths = raw(Metric::Deaths, &[
			("Ohio", "a", [0, 1, 2]),
			("Texas", "c", [0, 0, 5]),
			("Guam", "d", [0, 0, 0]),
			("Samoa", "e", [0, 0, 0]),
		]);
		let lookup: RegionIdentifierLookup = vec![("Ohio", 39), ("Texas", 48), ("Guam", 66)].into_iter().collect();
		Dashboard::from_raw(cases, deaths, &lookup, LongFormOrder::Chronological)
	}

	#[test]
	fn derives_all_tables() {
		let db = dashboard();
		let case_totals: Vec<(&str, i64)> = db.metric(Metric::Cases).totals().rows().iter().map(|t| (t.region.as_str(), t.total)).collect();
		assert_eq!(case_totals, vec![("Guam", 1), ("Ohio", 20), ("Texas", 50)]);
		assert_eq!(db.regions(), vec!["Ohio", "Texas"]);
		// Guam has cases but no deaths at all
		assert_eq!(db.ratio().missing(), &[SmartString::from("Guam")]);
		let ohio = &db.ratio().rows()[0];
		assert_eq!((ohio.deaths, ohio.cases, ohio.ratio), (2, 20, Some(0.1)));
		assert_eq!(db.metric(Metric::Deaths).long_form().len(), 2 * 2);
	}

	#[test]
	fn compare_selected() {
		let db = dashboard();
		let c = db.compare(&["Texas"]).unwrap().unwrap();
		assert_eq!(c.deaths.totals, vec![LatestValue{region: "Texas".into(), total: 5}]);
		assert_eq!(c.cases.totals, vec![LatestValue{region: "Texas".into(), total: 50}]);
		assert_eq!(c.cases.long_form.len(), 3);
	}

	#[test]
	fn compare_nothing() {
		let db = dashboard();
		let none: Vec<String> = Vec::new();
		assert!(db.compare(&none[..]).unwrap().is_none());
		let views = db.views(&ViewToggles{compare: true, ..Default::default()}, None);
		let names: Vec<String> = views.iter().map(|v| v.name()).collect();
		assert_eq!(names, vec!["selection_prompt"]);
	}

	#[test]
	fn compare_unknown() {
		let db = dashboard();
		assert!(matches!(db.compare(&["Samoa"]), Err(Error::UnknownRegions(_))));
	}

	#[test]
	fn view_order() {
		let db = dashboard();
		let c = db.compare(&["Ohio", "Texas"]).unwrap();
		let views = db.views(&ViewToggles::all(), c.as_ref());
		let names: Vec<String> = views.iter().map(|v| v.name()).collect();
		assert_eq!(names, vec![
			"deaths_raw", "deaths_totals", "deaths_map", "deaths_bars", "deaths_lines",
			"cases_raw", "cases_totals", "cases_map", "cases_bars", "cases_lines",
			"ratio_map",
			"compare_deaths_totals", "compare_deaths_lines",
			"compare_cases_totals", "compare_cases_lines",
		]);
	}

	#[test]
	fn sorted_bars() {
		let db = dashboard();
		let toggles = ViewToggles{cases: true, sort_cases_desc: true, ..Default::default()};
		let views = db.views(&toggles, None);
		let chart = views.iter().find_map(|v| match v {
			View::Bars{chart, ..} => Some(chart),
			_ => None,
		}).unwrap();
		assert_eq!(chart.bars[0].region.as_str(), "Texas");
		assert_eq!(views.len(), 3);
	}
}
