//! Selection state machine.
//!
//! Per prefecture: `Unselected -> Selected(Pending) -> Selected(Ready | Failed)`,
//! and any `Selected(_)` back to `Unselected` on deselect. Toggles never
//! wait on the network; fetch completions are applied later, in arrival
//! order, by [`SelectionController::poll_settled`] or
//! [`SelectionController::settle_next`].

use std::sync::Arc;

use prefpop_model::{Catalog, PrefectureId};
use prefpop_source::PopulationSource;
use tokio::sync::watch;
use tracing::debug;

use crate::cache::{EntryStatus, FetchSettled, PopulationCache};
use crate::{AggregatedView, CatalogLoadError, CatalogState, ChartDataset, ControllerConfig, SelectionSet, ToggleError, load_catalog, recompute};

/// Result of a successful toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
	Selected,
	Deselected,
}

/// Owns the selection and the population cache, and publishes the
/// aggregated view after every change.
pub struct SelectionController {
	source: Arc<dyn PopulationSource>,
	catalog: CatalogState,
	selection: SelectionSet,
	cache: PopulationCache,
	view_tx: watch::Sender<Arc<AggregatedView>>,
}

impl std::fmt::Debug for SelectionController {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SelectionController")
			.field("catalog", &self.catalog)
			.field("selection", &self.selection)
			.field("cache", &self.cache)
			.finish_non_exhaustive()
	}
}

impl SelectionController {
	pub fn new(source: Arc<dyn PopulationSource>, config: ControllerConfig) -> Self {
		let cache = PopulationCache::new(Arc::clone(&source), config.cache);
		let (view_tx, _) = watch::channel(Arc::new(AggregatedView::default()));
		Self {
			source,
			catalog: CatalogState::Loading,
			selection: SelectionSet::new(),
			cache,
			view_tx,
		}
	}

	/// Loads the prefecture catalog.
	///
	/// A loaded catalog is kept and returned without refetching; a failed
	/// load may be retried.
	pub async fn load_catalog(&mut self) -> Result<Catalog, CatalogLoadError> {
		if let CatalogState::Ready(catalog) = &self.catalog {
			return Ok(catalog.clone());
		}
		match load_catalog(self.source.as_ref()).await {
			Ok(catalog) => {
				self.catalog = CatalogState::Ready(catalog.clone());
				Ok(catalog)
			}
			Err(err) => {
				self.catalog = CatalogState::Failed(err.clone());
				Err(err)
			}
		}
	}

	pub fn catalog(&self) -> &CatalogState {
		&self.catalog
	}

	pub fn selection(&self) -> &SelectionSet {
		&self.selection
	}

	pub fn cache(&self) -> &PopulationCache {
		&self.cache
	}

	/// Current view snapshot.
	pub fn view(&self) -> Arc<AggregatedView> {
		Arc::clone(&self.view_tx.borrow())
	}

	/// Receiver notified with every recomputed view.
	pub fn subscribe(&self) -> watch::Receiver<Arc<AggregatedView>> {
		self.view_tx.subscribe()
	}

	/// Datasets for `label` from the current view, named from the catalog.
	pub fn datasets(&self, label: &str) -> Result<Vec<ChartDataset>, ToggleError> {
		let catalog = self.catalog.ready().ok_or(ToggleError::CatalogUnavailable)?;
		Ok(self.view().datasets(catalog, label))
	}

	/// Flips selection of `id` and publishes the new view immediately.
	///
	/// Selecting requests the population from the cache; re-selecting a
	/// prefecture whose fetch failed retries it. Deselecting leaves the cache
	/// entry to the cache policy.
	pub fn toggle(&mut self, id: PrefectureId) -> Result<Toggle, ToggleError> {
		let catalog = self.catalog.ready().ok_or(ToggleError::CatalogUnavailable)?;
		if !catalog.contains(id) {
			return Err(ToggleError::UnknownPrefecture(id));
		}

		let toggle = if self.selection.toggle(id) {
			if self.cache.get(id).is_some_and(|e| e.status() == EntryStatus::Failed) {
				self.cache.invalidate(id);
			}
			self.cache.request(id);
			Toggle::Selected
		} else {
			self.cache.release(id);
			Toggle::Deselected
		};

		debug!(prefecture = id.0, ?toggle, selected = self.selection.len(), "controller.toggle");
		self.publish();
		Ok(toggle)
	}

	/// Reacts to a settled cache entry.
	///
	/// Returns whether the view changed; results for prefectures deselected
	/// in the meantime have no visible effect.
	pub fn on_cache_settled(&mut self, id: PrefectureId) -> bool {
		if !self.selection.contains(id) {
			debug!(prefecture = id.0, "controller.settled.not_selected");
			return false;
		}
		self.publish();
		true
	}

	fn apply_settled(&mut self, msg: FetchSettled) -> Option<PrefectureId> {
		let id = msg.prefecture;
		self.cache.settle(msg)?;
		self.on_cache_settled(id);
		Some(id)
	}

	/// Applies every completion that has already arrived. Returns how many
	/// entries settled.
	pub fn poll_settled(&mut self) -> usize {
		let mut settled = 0;
		while let Some(msg) = self.cache.try_next_settled() {
			if self.apply_settled(msg).is_some() {
				settled += 1;
			}
		}
		settled
	}

	/// Waits for the next fetch to settle and applies it.
	///
	/// Returns `None` once nothing is in flight.
	pub async fn settle_next(&mut self) -> Option<PrefectureId> {
		loop {
			if self.cache.in_flight() == 0 {
				return None;
			}
			let msg = self.cache.next_settled().await?;
			if let Some(id) = self.apply_settled(msg) {
				return Some(id);
			}
		}
	}

	/// Waits until every in-flight fetch has settled.
	pub async fn settle_all(&mut self) {
		while self.settle_next().await.is_some() {}
	}

	fn publish(&mut self) {
		let view = recompute(&self.selection, &self.cache);
		debug!(
			selected = view.selected_ids().len(),
			ready = view.series_by_id().len(),
			failed = view.failed().len(),
			"controller.recompute"
		);
		self.view_tx.send_replace(Arc::new(view));
	}
}
