use std::collections::HashMap;
use std::fs;
use std::io;
use std::io::Read;
use std::path::{Path, PathBuf};

use log::{debug, info, trace, warn};

use bytes::Bytes;

use flate2;

use super::error::Error;


/// Anything which can turn a source location into its raw body.
pub trait Fetch {
	fn fetch(&self, location: &str) -> Result<Bytes, Error>;
}


pub fn is_remote(location: &str) -> bool {
	location.starts_with("http://") || location.starts_with("https://")
}


/// Open a local file, transparently decompressing `.gz` files.
pub fn magic_open<P: AsRef<Path>>(path: P) -> io::Result<Box<dyn Read>> {
	let path = path.as_ref();
	match path.extension() {
		Some(x) if x == "gz" => {
			Ok(Box::new(flate2::read::GzDecoder::new(fs::File::open(path)?)))
		},
		_ => Ok(Box::new(fs::File::open(path)?)),
	}
}


/// Fetches `http(s)://` locations with a blocking client and reads
/// everything else from the local filesystem.
pub struct HttpFetcher {
	client: reqwest::blocking::Client,
}

impl HttpFetcher {
	pub fn new() -> Self {
		Self{
			client: reqwest::blocking::Client::new(),
		}
	}

	fn fetch_remote(&self, url: &str) -> Result<Bytes, Error> {
		debug!("GET {}", url);
		let resp = self.client.get(url).send().map_err(|e| Error::unavailable(url, e))?;
		let resp = match resp.error_for_status() {
			Ok(resp) => resp,
			Err(e) => return Err(match e.status() {
				Some(status) => Error::unavailable(url, format!("HTTP status {}", status)),
				None => Error::unavailable(url, e),
			}),
		};
		resp.bytes().map_err(|e| Error::unavailable(url, e))
	}

	fn read_local(&self, path: &str) -> Result<Bytes, Error> {
		debug!("reading {}", path);
		let mut r = magic_open(path).map_err(|e| Error::unavailable(path, e))?;
		let mut buf = Vec::new();
		r.read_to_end(&mut buf).map_err(|e| Error::unavailable(path, e))?;
		Ok(Bytes::from(buf))
	}
}

impl Default for HttpFetcher {
	fn default() -> Self {
		Self::new()
	}
}

impl Fetch for HttpFetcher {
	fn fetch(&self, location: &str) -> Result<Bytes, Error> {
		if is_remote(location) {
			self.fetch_remote(location)
		} else {
			self.read_local(location)
		}
	}
}


/// Memoizes source bodies by location.
///
/// Each location is fetched at most once until it is explicitly refreshed.
/// If a snapshot directory is set, every fetched body is also written there
/// under the last path segment of its location; snapshots are never read
/// back.
pub struct SourceCache<F: Fetch = HttpFetcher> {
	fetcher: F,
	bodies: HashMap<String, Bytes>,
	snapshot_dir: Option<PathBuf>,
}

impl SourceCache<HttpFetcher> {
	pub fn http() -> Self {
		Self::new(HttpFetcher::new())
	}
}

impl<F: Fetch> SourceCache<F> {
	pub fn new(fetcher: F) -> Self {
		Self{
			fetcher,
			bodies: HashMap::new(),
			snapshot_dir: None,
		}
	}

	pub fn with_snapshot_dir(mut self, dir: Option<PathBuf>) -> Self {
		self.snapshot_dir = dir;
		self
	}

	pub fn fetcher(&self) -> &F {
		&self.fetcher
	}

	pub fn is_cached(&self, location: &str) -> bool {
		self.bodies.contains_key(location)
	}

	/// Return the body for `location`, fetching it on first use.
	pub fn get(&mut self, location: &str) -> Result<Bytes, Error> {
		if let Some(body) = self.bodies.get(location) {
			trace!("cache hit for {}", location);
			return Ok(body.clone())
		}
		self.refresh(location)
	}

	/// Fetch `location` again, replacing the cached body.
	pub fn refresh(&mut self, location: &str) -> Result<Bytes, Error> {
		let body = self.fetcher.fetch(location)?;
		info!("fetched {} ({} bytes)", location, body.len());
		self.snapshot(location, &body);
		self.bodies.insert(location.into(), body.clone());
		Ok(body)
	}

	/// Refetch every location fetched so far.
	pub fn refresh_all(&mut self) -> Result<(), Error> {
		let mut locations: Vec<String> = self.bodies.keys().cloned().collect();
		locations.sort();
		for location in locations {
			self.refresh(&location)?;
		}
		Ok(())
	}

	fn snapshot(&self, location: &str, body: &Bytes) {
		let dir = match self.snapshot_dir.as_ref() {
			Some(dir) => dir,
			None => return,
		};
		let path = dir.join(snapshot_name(location));
		let result = fs::create_dir_all(dir).and_then(|_| fs::write(&path, &body[..]));
		match result {
			Ok(()) => debug!("wrote snapshot {}", path.display()),
			// snapshots are incidental, the data is already in memory
			Err(e) => warn!("failed to write snapshot {}: {}", path.display(), e),
		}
	}
}


fn snapshot_name(location: &str) -> &str {
	let location = location.split(|c| c == '?' || c == '#').next().unwrap_or(location);
	match location.trim_end_matches('/').rsplit(|c| c == '/' || c == '\\').next() {
		Some(name) if !name.is_empty() => name,
		_ => "snapshot.csv",
	}
}
