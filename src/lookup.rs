use std::collections::HashMap;
use std::io;
use std::iter::FromIterator;

use log::debug;

use serde::Deserialize;

use smartstring::alias::{String as SmartString};

use super::error::Error;


/// Numeric state identifier, as used by the `us-10m` topojson features.
pub type RegionId = u32;

static DATASET: &'static str = "state ids";


#[derive(Debug, Clone, Deserialize)]
struct RawStateIdRow {
	state: SmartString,
	id: RegionId,
}


/// Maps a state's display name to its map identifier.
#[derive(Debug, Clone, Default)]
pub struct RegionIdentifierLookup {
	ids: HashMap<SmartString, RegionId>,
}

impl RegionIdentifierLookup {
	/// Read `state,id` pairs from a CSV with a header; further columns are
	/// ignored.
	pub fn from_csv<R: io::Read>(r: R) -> Result<Self, Error> {
		let mut r = csv::Reader::from_reader(r);
		{
			let headers = r.headers().map_err(|e| Error::malformed(DATASET, e))?;
			for name in &["state", "id"] {
				if !headers.iter().any(|h| h.trim() == *name) {
					return Err(Error::schema(DATASET, *name))
				}
			}
		}
		let mut result = Self::default();
		for row in r.deserialize() {
			let rec: RawStateIdRow = row.map_err(|e| Error::malformed(DATASET, e))?;
			if let Some(prev) = result.ids.insert(rec.state.clone(), rec.id) {
				debug!("state {:?} listed twice, id {} replaced by {}", rec.state, prev, rec.id);
			}
		}
		Ok(result)
	}

	pub fn get(&self, region: &str) -> Option<RegionId> {
		self.ids.get(region).copied()
	}

	pub fn insert<S: Into<SmartString>>(&mut self, region: S, id: RegionId) {
		self.ids.insert(region.into(), id);
	}

	pub fn len(&self) -> usize {
		self.ids.len()
	}

	pub fn is_empty(&self) -> bool {
		self.ids.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, RegionId)> + '_ {
		self.ids.iter().map(|(k, v)| (k.as_str(), *v))
	}
}

impl<S: Into<SmartString>> FromIterator<(S, RegionId)> for RegionIdentifierLookup {
	fn from_iter<I: IntoIterator<Item = (S, RegionId)>>(iter: I) -> Self {
		let mut result = Self::default();
		for (region, id) in iter {
			result.insert(region, id);
		}
		result
	}
}


#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn reads_vega_population_table() {
		let csv = "state,id,population,engineers,hurricanes\nAlabama,1,4863300,0.003422,22\nAlaska,2,741894,0.001591,0\n";
		let lookup = RegionIdentifierLookup::from_csv(csv.as_bytes()).unwrap();
		assert_eq!(lookup.len(), 2);
		assert_eq!(lookup.get("Alaska"), Some(2));
		assert_eq!(lookup.get("Guam"), None);
	}

	#[test]
	fn missing_id_column() {
		let csv = "state,fips\nAlabama,1\n";
		match RegionIdentifierLookup::from_csv(csv.as_bytes()) {
			Err(Error::SchemaMismatch{column, ..}) => assert_eq!(column, "id"),
			other => panic!("unexpected result: {:?}", other),
		}
	}

	#[test]
	fn non_numeric_id() {
		let csv = "state,id\nAlabama,one\n";
		assert!(matches!(RegionIdentifierLookup::from_csv(csv.as_bytes()), Err(Error::Malformed{..})));
	}

	#[test]
	fn from_pairs() {
		let lookup: RegionIdentifierLookup = vec![("Ohio", 39), ("Texas", 48)].into_iter().collect();
		assert_eq!(lookup.get("Texas"), Some(48));
		assert!(!lookup.is_empty());
	}
}
