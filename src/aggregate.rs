use log::info;

use smartstring::alias::{String as SmartString};

use super::jhu::RawTable;
use super::timeseries::Counts;


/// Per-region cumulative counts, one column per date with activity.
pub type RegionSeries = Counts<SmartString>;


/// Sum the sub-regions of `raw` into their regions and drop every region
/// and every date whose total is exactly zero.
///
/// Regions without any recorded events (e.g. territories without a single
/// confirmed case) disappear from everything derived from the result.
///
/// Row and column masks are computed on the same table. With cumulative
/// counts one pass removes everything; the masks are recomputed until
/// nothing changes so that the invariants also hold when upstream
/// corrections produced negative cells.
pub fn aggregate(raw: &RawTable) -> RegionSeries {
	let mut grouped = raw.counts().rekeyed(|k| Some(k.region.clone()));
	grouped.sort_keys();
	let (nregions, ndates) = (grouped.nkeys(), grouped.len());

	loop {
		let row_mask: Vec<bool> = grouped.row_sums().into_iter().map(|s| s != 0).collect();
		let column_mask: Vec<bool> = grouped.column_sums().into_iter().map(|s| s != 0).collect();
		if row_mask.iter().all(|keep| *keep) && column_mask.iter().all(|keep| *keep) {
			break
		}
		grouped.retain_rows(&row_mask);
		grouped.retain_dates(&column_mask);
	}

	info!(
		"{}: aggregated {} sub-regions into {} regions over {} dates (dropped {} regions and {} dates without events)",
		raw.metric(),
		raw.counts().nkeys(),
		grouped.nkeys(),
		grouped.len(),
		nregions - grouped.nkeys(),
		ndates - grouped.len(),
	);
	grouped
}
