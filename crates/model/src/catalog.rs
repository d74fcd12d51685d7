use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::CatalogError;

/// Stable identifier of a prefecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct PrefectureId(pub u32);

impl fmt::Display for PrefectureId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "pref#{}", self.0)
	}
}

impl From<u32> for PrefectureId {
	fn from(id: u32) -> Self {
		Self(id)
	}
}

/// One selectable prefecture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prefecture {
	pub id: PrefectureId,
	pub name: String,
}

impl Prefecture {
	pub fn new(id: impl Into<PrefectureId>, name: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			name: name.into(),
		}
	}
}

/// Immutable list of available prefectures, loaded once at startup.
///
/// Preserves source order for listing and indexes ids for lookup. Cheap to
/// clone.
#[derive(Debug, Clone)]
pub struct Catalog {
	prefectures: Arc<[Prefecture]>,
	index: Arc<FxHashMap<PrefectureId, usize>>,
}

impl Catalog {
	/// Builds a catalog, rejecting duplicate ids.
	pub fn new(prefectures: Vec<Prefecture>) -> Result<Self, CatalogError> {
		let mut index = FxHashMap::default();
		for (pos, pref) in prefectures.iter().enumerate() {
			if index.insert(pref.id, pos).is_some() {
				return Err(CatalogError::DuplicateId(pref.id));
			}
		}
		Ok(Self {
			prefectures: prefectures.into(),
			index: Arc::new(index),
		})
	}

	pub fn get(&self, id: PrefectureId) -> Option<&Prefecture> {
		self.index.get(&id).map(|&pos| &self.prefectures[pos])
	}

	pub fn contains(&self, id: PrefectureId) -> bool {
		self.index.contains_key(&id)
	}

	/// Display name for `id`, if catalogued.
	pub fn name(&self, id: PrefectureId) -> Option<&str> {
		self.get(id).map(|p| p.name.as_str())
	}

	pub fn iter(&self) -> impl Iterator<Item = &Prefecture> {
		self.prefectures.iter()
	}

	pub fn len(&self) -> usize {
		self.prefectures.len()
	}

	pub fn is_empty(&self) -> bool {
		self.prefectures.is_empty()
	}
}
