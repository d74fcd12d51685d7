//! Validation errors for domain construction.

use thiserror::Error;

use crate::PrefectureId;

/// A population series violated one of its structural invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeriesError {
	/// Two compositions in one series share a label.
	#[error("duplicate composition label {label:?} for {prefecture}")]
	DuplicateLabel { prefecture: PrefectureId, label: String },

	/// Points of a composition are not strictly ascending by year.
	#[error("composition {label:?} for {prefecture} is not ascending by year at {year}")]
	UnorderedPoints { prefecture: PrefectureId, label: String, year: i32 },
}

/// The prefecture list could not be turned into a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
	/// The same id appears more than once.
	#[error("duplicate prefecture id {0}")]
	DuplicateId(PrefectureId),
}
