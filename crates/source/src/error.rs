//! Data source errors.

use prefpop_model::{CatalogError, SeriesError};
use thiserror::Error;

/// Failure to obtain data from a [`crate::PopulationSource`].
///
/// Cloneable so a failed fetch can be reported from every view snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
	/// The request never produced a response.
	#[error("transport error: {0}")]
	Transport(String),

	/// The server answered with a non-success status.
	#[error("unexpected status {status}: {body}")]
	Status { status: u16, body: String },

	/// The body could not be decoded or violated a data invariant.
	#[error("malformed response: {0}")]
	Malformed(String),

	/// The envelope carried no result, only a message.
	#[error("api error: {0}")]
	Api(String),

	/// The task running the fetch died before settling.
	#[error("fetch task failed: {0}")]
	Task(String),

	/// The client could not be configured.
	#[error("invalid configuration: {0}")]
	Config(String),
}

impl From<serde_json::Error> for SourceError {
	fn from(err: serde_json::Error) -> Self {
		Self::Malformed(err.to_string())
	}
}

impl From<SeriesError> for SourceError {
	fn from(err: SeriesError) -> Self {
		Self::Malformed(err.to_string())
	}
}

impl From<CatalogError> for SourceError {
	fn from(err: CatalogError) -> Self {
		Self::Malformed(err.to_string())
	}
}

/// Result type for data source operations.
pub type Result<T> = std::result::Result<T, SourceError>;
