use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

use num_traits::Zero;

use chrono::NaiveDate;


pub trait TimeSeriesKey: Hash + Eq + Clone + std::fmt::Debug {}
impl<T: Hash + Eq + Clone + std::fmt::Debug> TimeSeriesKey for T {}


/// A set of keyed series sharing one date axis.
///
/// The date axis is strictly ascending, so the most recent date is always
/// the last column. It does not have to be contiguous: columns may be
/// dropped from it (see [`TimeSeries::retain_dates`]).
///
/// Keys keep their insertion order unless reordered with
/// [`TimeSeries::sort_keys`].
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries<T: Hash + Eq, V: Copy> {
	dates: Vec<NaiveDate>,
	keys: HashMap<T, usize>,
	order: Vec<T>,
	time_series: Vec<Vec<V>>,
}

impl<T: Hash + Eq, V: Copy> TimeSeries<T, V> {
	pub fn new(dates: Vec<NaiveDate>) -> Self {
		assert!(
			dates.windows(2).all(|w| w[0] < w[1]),
			"date axis must be strictly ascending",
		);
		Self{
			dates,
			keys: HashMap::new(),
			order: Vec::new(),
			time_series: Vec::new(),
		}
	}

	#[inline(always)]
	pub fn date_index(&self, date: NaiveDate) -> Option<usize> {
		self.dates.binary_search(&date).ok()
	}

	#[inline(always)]
	pub fn index_date(&self, i: usize) -> Option<NaiveDate> {
		self.dates.get(i).copied()
	}

	#[inline(always)]
	pub fn dates(&self) -> &[NaiveDate] {
		&self.dates[..]
	}

	#[inline(always)]
	pub fn last_date(&self) -> Option<NaiveDate> {
		self.dates.last().copied()
	}

	/// Number of dates on the axis.
	#[inline(always)]
	pub fn len(&self) -> usize {
		self.dates.len()
	}

	/// Number of keyed series.
	#[inline(always)]
	pub fn nkeys(&self) -> usize {
		self.order.len()
	}

	pub fn is_empty(&self) -> bool {
		self.order.is_empty()
	}

	pub fn keys(&self) -> std::slice::Iter<'_, T> {
		self.order.iter()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&T, &[V])> + '_ {
		self.order.iter().zip(self.time_series.iter().map(|v| &v[..]))
	}

	pub fn get_index<Q>(&self, k: &Q) -> Option<usize>
		where T: Borrow<Q>, Q: Hash + Eq + ?Sized
	{
		Some(*self.keys.get(k)?)
	}

	pub fn contains_key<Q>(&self, k: &Q) -> bool
		where T: Borrow<Q>, Q: Hash + Eq + ?Sized
	{
		self.keys.contains_key(k)
	}

	pub fn get<Q>(&self, k: &Q) -> Option<&[V]>
		where T: Borrow<Q>, Q: Hash + Eq + ?Sized
	{
		let index = self.get_index(k)?;
		Some(&self.time_series[index][..])
	}

	pub fn get_value<Q>(&self, k: &Q, i: usize) -> Option<V>
		where T: Borrow<Q>, Q: Hash + Eq + ?Sized
	{
		self.get(k).and_then(|v| v.get(i).copied())
	}
}

impl<T: TimeSeriesKey, V: Copy> TimeSeries<T, V> {
	/// Insert a full series for `k`, replacing any previous one.
	pub fn insert(&mut self, k: T, vec: Vec<V>) {
		assert_eq!(vec.len(), self.dates.len());
		match self.keys.get(&k) {
			Some(index) => self.time_series[*index] = vec,
			None => {
				self.keys.insert(k.clone(), self.order.len());
				self.order.push(k);
				self.time_series.push(vec);
			},
		}
	}

	/// Keep only the rows for which `mask` is true; `mask` is in key order.
	pub fn retain_rows(&mut self, mask: &[bool]) {
		assert_eq!(mask.len(), self.order.len());
		let order = std::mem::take(&mut self.order);
		let time_series = std::mem::take(&mut self.time_series);
		self.keys.clear();
		for ((k, vec), keep) in order.into_iter().zip(time_series.into_iter()).zip(mask.iter()) {
			if *keep {
				self.keys.insert(k.clone(), self.order.len());
				self.order.push(k);
				self.time_series.push(vec);
			}
		}
	}

	/// Keep only the date columns for which `mask` is true.
	pub fn retain_dates(&mut self, mask: &[bool]) {
		assert_eq!(mask.len(), self.dates.len());
		let mut m = mask.iter();
		self.dates.retain(|_| *m.next().unwrap_or(&false));
		for vec in self.time_series.iter_mut() {
			let mut m = mask.iter();
			vec.retain(|_| *m.next().unwrap_or(&false));
		}
	}

	pub fn sort_keys(&mut self) where T: Ord {
		let mut indices: Vec<usize> = (0..self.order.len()).collect();
		indices.sort_by(|a, b| self.order[*a].cmp(&self.order[*b]));
		let mut order = Vec::with_capacity(indices.len());
		let mut time_series = Vec::with_capacity(indices.len());
		for i in indices {
			order.push(self.order[i].clone());
			time_series.push(std::mem::take(&mut self.time_series[i]));
		}
		self.keys = order.iter().cloned().enumerate().map(|(i, k)| (k, i)).collect();
		self.order = order;
		self.time_series = time_series;
	}
}

impl<T: TimeSeriesKey, V: Copy + Zero> TimeSeries<T, V> {
	pub fn get_or_create(&mut self, k: T) -> &mut [V] {
		let index = self.get_index_or_create(k);
		&mut self.time_series[index][..]
	}

	pub fn get_index_or_create(&mut self, k: T) -> usize {
		match self.keys.get(&k) {
			Some(v) => *v,
			None => {
				let v = self.time_series.len();
				let mut vec = Vec::with_capacity(self.dates.len());
				vec.resize(self.dates.len(), V::zero());
				self.time_series.push(vec);
				self.keys.insert(k.clone(), v);
				self.order.push(k);
				v
			},
		}
	}

	/// Map every key through `f` and sum the series which end up on the
	/// same new key. Keys mapped to `None` are dropped.
	pub fn rekeyed<U: TimeSeriesKey, F: Fn(&T) -> Option<U>>(&self, f: F) -> TimeSeries<U, V> {
		let mut result = TimeSeries::<U, V>::new(self.dates.clone());
		for (k_old, ts_old) in self.iter() {
			let k_new = match f(k_old) {
				Some(k) => k,
				None => continue,
			};
			let ts_new = result.get_or_create(k_new);
			assert_eq!(ts_new.len(), ts_old.len());
			for (dst, src) in ts_new.iter_mut().zip(ts_old.iter()) {
				*dst = *dst + *src;
			}
		}
		result
	}

	/// Sum of every row across all dates, in key order.
	pub fn row_sums(&self) -> Vec<V> {
		self.time_series.iter().map(|vec| {
			vec.iter().fold(V::zero(), |acc, v| acc + *v)
		}).collect()
	}

	/// Sum of every date column across all rows.
	pub fn column_sums(&self) -> Vec<V> {
		let mut sums = Vec::with_capacity(self.dates.len());
		sums.resize(self.dates.len(), V::zero());
		for vec in self.time_series.iter() {
			for (acc, v) in sums.iter_mut().zip(vec.iter()) {
				*acc = *acc + *v;
			}
		}
		sums
	}
}


pub type Counts<T> = TimeSeries<T, i64>;
