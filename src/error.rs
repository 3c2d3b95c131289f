use std::fmt;
use std::io;


#[derive(Debug)]
pub enum Error {
	/// The source could not be fetched or read at all.
	SourceUnavailable{url: String, reason: String},
	/// An expected column is absent from a dataset.
	SchemaMismatch{dataset: String, column: String},
	/// A record or cell could not be parsed.
	Malformed{dataset: String, detail: String},
	/// A selection named regions which are not part of the table.
	UnknownRegions(Vec<String>),
	Io(io::Error),
}

impl Error {
	pub fn unavailable<U: Into<String>, E: fmt::Display>(url: U, reason: E) -> Self {
		Self::SourceUnavailable{
			url: url.into(),
			reason: reason.to_string(),
		}
	}

	pub fn schema<D: Into<String>, C: Into<String>>(dataset: D, column: C) -> Self {
		Self::SchemaMismatch{
			dataset: dataset.into(),
			column: column.into(),
		}
	}

	pub fn malformed<D: Into<String>, E: fmt::Display>(dataset: D, detail: E) -> Self {
		Self::Malformed{
			dataset: dataset.into(),
			detail: detail.to_string(),
		}
	}
}

impl fmt::Display for Error {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::SourceUnavailable{url, reason} => write!(f, "source {} unavailable: {}", url, reason),
			Self::SchemaMismatch{dataset, column} => write!(f, "{}: missing expected column {:?}", dataset, column),
			Self::Malformed{dataset, detail} => write!(f, "{}: malformed data: {}", dataset, detail),
			Self::UnknownRegions(names) => write!(f, "unknown regions: {}", names.join(", ")),
			Self::Io(e) => fmt::Display::fmt(e, f),
		}
	}
}

impl From<io::Error> for Error {
	fn from(err: io::Error) -> Self {
		Self::Io(err)
	}
}

impl std::error::Error for Error {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Self::Io(e) => Some(e),
			_ => None,
		}
	}
}
