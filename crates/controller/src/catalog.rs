use prefpop_model::Catalog;
use prefpop_source::{PopulationSource, SourceError};
use thiserror::Error;
use tracing::{info, warn};

/// The prefecture list could not be loaded.
///
/// Fatal to the initial render: callers must show an error state rather than
/// an empty list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("prefecture list unavailable: {0}")]
pub struct CatalogLoadError(#[from] pub SourceError);

impl CatalogLoadError {
	/// Message suitable for display in place of the prefecture list.
	pub fn user_message(&self) -> String {
		format!("error: {}", self.0)
	}
}

/// Lifecycle of the one-shot prefecture catalog load.
#[derive(Debug, Clone, Default)]
pub enum CatalogState {
	/// Not loaded yet.
	#[default]
	Loading,
	Ready(Catalog),
	Failed(CatalogLoadError),
}

impl CatalogState {
	/// Loaded catalog, if any.
	pub fn ready(&self) -> Option<&Catalog> {
		match self {
			Self::Ready(catalog) => Some(catalog),
			_ => None,
		}
	}

	pub fn error(&self) -> Option<&CatalogLoadError> {
		match self {
			Self::Failed(err) => Some(err),
			_ => None,
		}
	}

	pub fn is_loading(&self) -> bool {
		matches!(self, Self::Loading)
	}
}

/// Fetches the prefecture list from `source`. A list with duplicate ids is
/// reported as a malformed response.
pub async fn load_catalog(source: &dyn PopulationSource) -> Result<Catalog, CatalogLoadError> {
	let catalog = source
		.fetch_prefectures()
		.await
		.and_then(|prefectures| Catalog::new(prefectures).map_err(SourceError::from))
		.map_err(|err| {
			warn!(error = %err, "catalog.load.failed");
			CatalogLoadError(err)
		})?;
	info!(prefectures = catalog.len(), "catalog.loaded");
	Ok(catalog)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::ScriptedSource;

	#[tokio::test]
	async fn loads_catalog_from_source() {
		let source = ScriptedSource::with_catalog(&[(1, "北海道"), (2, "青森県")]);
		let catalog = load_catalog(&source).await.unwrap();
		assert_eq!(catalog.len(), 2);
		assert_eq!(catalog.name(prefpop_model::PrefectureId(2)), Some("青森県"));
	}

	#[tokio::test]
	async fn failure_carries_cause_for_display() {
		let source = ScriptedSource::failing_catalog(SourceError::Transport("API Error".into()));
		let err = load_catalog(&source).await.unwrap_err();
		assert_eq!(err.user_message(), "error: transport error: API Error");
	}

	#[tokio::test]
	async fn duplicate_ids_are_malformed() {
		let source = ScriptedSource::with_catalog(&[(1, "北海道"), (1, "青森県")]);
		let err = load_catalog(&source).await.unwrap_err();
		assert!(matches!(&err.0, SourceError::Malformed(msg) if msg.contains("duplicate prefecture id")), "{err}");
	}

	#[test]
	fn state_accessors() {
		let state = CatalogState::default();
		assert!(state.is_loading());
		assert!(state.ready().is_none());

		let state = CatalogState::Failed(CatalogLoadError(SourceError::Api("down".into())));
		assert!(state.error().is_some());
		assert!(!state.is_loading());
	}
}
