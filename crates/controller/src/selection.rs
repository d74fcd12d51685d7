use indexmap::IndexSet;
use prefpop_model::PrefectureId;

/// Prefectures currently toggled on, in the order they were selected.
///
/// Equality is membership only; order is what the view reports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
	ids: IndexSet<PrefectureId>,
}

impl SelectionSet {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds `id` at the end. Returns false if it was already selected.
	pub fn insert(&mut self, id: PrefectureId) -> bool {
		self.ids.insert(id)
	}

	/// Removes `id`, keeping the relative order of the rest.
	pub fn remove(&mut self, id: PrefectureId) -> bool {
		self.ids.shift_remove(&id)
	}

	/// Flips membership of `id`. Returns whether it is now selected.
	pub fn toggle(&mut self, id: PrefectureId) -> bool {
		if self.remove(id) {
			false
		} else {
			self.insert(id)
		}
	}

	pub fn contains(&self, id: PrefectureId) -> bool {
		self.ids.contains(&id)
	}

	pub fn iter(&self) -> impl Iterator<Item = PrefectureId> + '_ {
		self.ids.iter().copied()
	}

	pub fn len(&self) -> usize {
		self.ids.len()
	}

	pub fn is_empty(&self) -> bool {
		self.ids.is_empty()
	}
}
