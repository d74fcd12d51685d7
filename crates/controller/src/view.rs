//! Render-ready snapshot of the selection.

use std::collections::BTreeMap;
use std::sync::Arc;

use prefpop_model::{Catalog, PopulationPoint, PopulationSeries, PrefectureId};
use prefpop_source::SourceError;
use serde::Serialize;

use crate::cache::{EntryLookup, EntryState};
use crate::SelectionSet;

/// What the chart renders, derived from the selection and the cache.
///
/// `selected_ids` is in selection order. A selected id is in exactly one of
/// three places: `series_by_id` (Ready), `failed` (Failed), or neither
/// (still loading).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregatedView {
	selected_ids: Vec<PrefectureId>,
	series_by_id: BTreeMap<PrefectureId, Arc<PopulationSeries>>,
	failed: BTreeMap<PrefectureId, SourceError>,
}

/// One chart line: a composition of one prefecture.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDataset {
	pub prefecture: PrefectureId,
	pub name: String,
	pub label: String,
	/// Points after this year are projections.
	pub boundary_year: i32,
	pub points: Vec<PopulationPoint>,
}

/// Builds the view for `selection` from whatever `cache` currently holds.
///
/// Pure: the same inputs always produce the same view.
pub fn recompute(selection: &SelectionSet, cache: &impl EntryLookup) -> AggregatedView {
	let mut view = AggregatedView {
		selected_ids: selection.iter().collect(),
		..AggregatedView::default()
	};
	for id in selection.iter() {
		match cache.lookup(id).map(|entry| entry.state()) {
			Some(EntryState::Ready(series)) => {
				view.series_by_id.insert(id, Arc::clone(series));
			}
			Some(EntryState::Failed(err)) => {
				view.failed.insert(id, err.clone());
			}
			Some(EntryState::Pending) | None => {}
		}
	}
	view
}

impl AggregatedView {
	pub fn selected_ids(&self) -> &[PrefectureId] {
		&self.selected_ids
	}

	pub fn series_by_id(&self) -> &BTreeMap<PrefectureId, Arc<PopulationSeries>> {
		&self.series_by_id
	}

	pub fn series(&self, id: PrefectureId) -> Option<&PopulationSeries> {
		self.series_by_id.get(&id).map(Arc::as_ref)
	}

	pub fn failed(&self) -> &BTreeMap<PrefectureId, SourceError> {
		&self.failed
	}

	pub fn failure(&self, id: PrefectureId) -> Option<&SourceError> {
		self.failed.get(&id)
	}

	pub fn is_selected(&self, id: PrefectureId) -> bool {
		self.selected_ids.contains(&id)
	}

	/// Selected but neither ready nor failed.
	pub fn is_loading(&self, id: PrefectureId) -> bool {
		self.is_selected(id) && !self.series_by_id.contains_key(&id) && !self.failed.contains_key(&id)
	}

	/// Composition labels across ready series, first seen first.
	pub fn labels(&self) -> Vec<&str> {
		let mut labels: Vec<&str> = Vec::new();
		for series in self.ready_in_order() {
			for label in series.labels() {
				if !labels.contains(&label) {
					labels.push(label);
				}
			}
		}
		labels
	}

	fn ready_in_order(&self) -> impl Iterator<Item = &PopulationSeries> {
		self.selected_ids.iter().filter_map(|id| self.series(*id))
	}

	/// One dataset per ready selected prefecture that has `label`, in
	/// selection order.
	pub fn datasets(&self, catalog: &Catalog, label: &str) -> Vec<ChartDataset> {
		self.ready_in_order()
			.filter_map(|series| {
				let composition = series.composition(label)?;
				let id = series.prefecture();
				Some(ChartDataset {
					prefecture: id,
					name: catalog.name(id).map_or_else(|| id.to_string(), str::to_string),
					label: composition.label.clone(),
					boundary_year: series.boundary_year(),
					points: composition.points.clone(),
				})
			})
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use std::collections::HashMap;

	use pretty_assertions::assert_eq;
	use prefpop_model::Prefecture;

	use super::*;
	use crate::CacheEntry;
	use crate::testing::{full_series, young_series};

	fn selection(ids: &[u32]) -> SelectionSet {
		let mut set = SelectionSet::new();
		for &id in ids {
			set.insert(PrefectureId(id));
		}
		set
	}

	fn catalog() -> Catalog {
		Catalog::new(vec![Prefecture::new(1, "北海道"), Prefecture::new(2, "青森県"), Prefecture::new(3, "岩手県")]).unwrap()
	}

	#[test]
	fn ready_entries_appear_in_series_by_id() {
		let cache = HashMap::from([(PrefectureId(1), CacheEntry::ready(PrefectureId(1), 1, young_series(1)))]);
		let view = recompute(&selection(&[1]), &cache);

		assert_eq!(view.selected_ids(), &[PrefectureId(1)]);
		assert_eq!(view.series(PrefectureId(1)), Some(&young_series(1)));
		assert!(!view.is_loading(PrefectureId(1)));
	}

	#[test]
	fn pending_and_failed_stay_selected_without_series() {
		let cache = HashMap::from([
			(PrefectureId(1), CacheEntry::pending(PrefectureId(1), 1)),
			(PrefectureId(2), CacheEntry::failed(PrefectureId(2), 2, SourceError::Transport("offline".into()))),
			(PrefectureId(3), CacheEntry::ready(PrefectureId(3), 3, young_series(3))),
		]);
		let view = recompute(&selection(&[1, 2, 3]), &cache);

		assert_eq!(view.selected_ids(), &[PrefectureId(1), PrefectureId(2), PrefectureId(3)]);
		assert_eq!(view.series_by_id().keys().copied().collect::<Vec<_>>(), vec![PrefectureId(3)]);
		assert!(view.is_loading(PrefectureId(1)));
		assert!(!view.is_loading(PrefectureId(2)));
		assert_eq!(view.failure(PrefectureId(2)), Some(&SourceError::Transport("offline".into())));
	}

	#[test]
	fn unselected_cache_entries_are_invisible() {
		let cache = HashMap::from([
			(PrefectureId(1), CacheEntry::ready(PrefectureId(1), 1, young_series(1))),
			(PrefectureId(2), CacheEntry::ready(PrefectureId(2), 2, young_series(2))),
		]);
		let view = recompute(&selection(&[2]), &cache);

		assert_eq!(view.selected_ids(), &[PrefectureId(2)]);
		assert!(view.series(PrefectureId(1)).is_none());
		assert!(!view.is_selected(PrefectureId(1)));
	}

	#[test]
	fn order_follows_selection_not_catalog() {
		let cache: HashMap<PrefectureId, CacheEntry> = HashMap::new();
		let view = recompute(&selection(&[2, 1]), &cache);
		assert_eq!(view.selected_ids(), &[PrefectureId(2), PrefectureId(1)]);
	}

	#[test]
	fn recompute_is_deterministic() {
		let cache = HashMap::from([
			(PrefectureId(1), CacheEntry::ready(PrefectureId(1), 1, full_series(1, 900))),
			(PrefectureId(2), CacheEntry::pending(PrefectureId(2), 2)),
		]);
		let sel = selection(&[2, 1]);
		assert_eq!(recompute(&sel, &cache), recompute(&sel, &cache));
	}

	#[test]
	fn datasets_follow_selection_and_skip_missing_labels() {
		let cache = HashMap::from([
			(PrefectureId(1), CacheEntry::ready(PrefectureId(1), 1, full_series(1, 900))),
			(PrefectureId(2), CacheEntry::ready(PrefectureId(2), 2, young_series(2))),
			(PrefectureId(3), CacheEntry::ready(PrefectureId(3), 3, full_series(3, 300))),
		]);
		let view = recompute(&selection(&[3, 2, 1]), &cache);

		let totals = view.datasets(&catalog(), "総人口");
		assert_eq!(totals.iter().map(|d| d.name.as_str()).collect::<Vec<_>>(), vec!["岩手県", "北海道"]);
		assert_eq!(totals[0].points[0].value, 300);
		assert_eq!(totals[0].boundary_year, 2020);

		let young = view.datasets(&catalog(), "年少人口");
		assert_eq!(young.len(), 3);
		assert_eq!(young[1].prefecture, PrefectureId(2));

		assert_eq!(view.labels(), vec!["総人口", "年少人口"]);
	}

	#[test]
	fn dataset_name_falls_back_to_id() {
		let cache = HashMap::from([(PrefectureId(40), CacheEntry::ready(PrefectureId(40), 1, young_series(40)))]);
		let view = recompute(&selection(&[40]), &cache);
		assert_eq!(view.datasets(&catalog(), "年少人口")[0].name, "pref#40");
	}
}
