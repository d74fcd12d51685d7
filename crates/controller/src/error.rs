use prefpop_model::PrefectureId;
use thiserror::Error;

/// A toggle that could not be applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToggleError {
	/// The prefecture catalog has not loaded successfully.
	#[error("prefecture catalog is not loaded")]
	CatalogUnavailable,

	/// The id is not part of the loaded catalog.
	#[error("unknown prefecture {0}")]
	UnknownPrefecture(PrefectureId),
}
