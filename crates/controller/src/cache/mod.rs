//! Population cache with single-flight fetches.
//!
//! The first [`PopulationCache::request`] for a prefecture inserts a
//! [`EntryState::Pending`] entry and spawns one background fetch. Later
//! requests return the existing entry unchanged; the pending entry is the
//! de-duplication token. The fetch task reports a [`FetchSettled`] message
//! over an unbounded channel, which the owner drains and hands back to
//! [`PopulationCache::settle`].
//!
//! Each fetch carries the generation it was started under. A completion
//! whose generation no longer matches its entry is dropped.

use std::collections::HashMap;
use std::hash::BuildHasher;
use std::sync::Arc;

use indexmap::IndexSet;
use prefpop_model::{PopulationSeries, PrefectureId};
use prefpop_source::{PopulationSource, SourceError};
use prefpop_worker::{GenerationClock, TaskClass, describe_join_error};
use rustc_hash::FxHashMap;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::CachePolicy;

/// Coarse lifecycle of a cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStatus {
	Pending,
	Ready,
	Failed,
}

/// Data held by a cache entry.
#[derive(Debug, Clone)]
pub enum EntryState {
	/// A fetch is in flight.
	Pending,
	Ready(Arc<PopulationSeries>),
	Failed(SourceError),
}

/// Cached fetch outcome for one prefecture.
#[derive(Debug, Clone)]
pub struct CacheEntry {
	prefecture: PrefectureId,
	generation: u64,
	state: EntryState,
}

impl CacheEntry {
	/// Entry waiting on the fetch tagged `generation`.
	pub fn pending(prefecture: PrefectureId, generation: u64) -> Self {
		Self {
			prefecture,
			generation,
			state: EntryState::Pending,
		}
	}

	/// Entry holding a fetched series.
	pub fn ready(prefecture: PrefectureId, generation: u64, series: PopulationSeries) -> Self {
		Self {
			prefecture,
			generation,
			state: EntryState::Ready(Arc::new(series)),
		}
	}

	/// Entry holding the cause of a failed fetch.
	pub fn failed(prefecture: PrefectureId, generation: u64, error: SourceError) -> Self {
		Self {
			prefecture,
			generation,
			state: EntryState::Failed(error),
		}
	}

	/// Returns the prefecture this entry caches.
	pub fn prefecture(&self) -> PrefectureId {
		self.prefecture
	}

	/// Returns the generation of the fetch that produced this entry.
	pub fn generation(&self) -> u64 {
		self.generation
	}

	/// Returns the entry data.
	pub fn state(&self) -> &EntryState {
		&self.state
	}

	/// Returns the lifecycle status without the payload.
	pub fn status(&self) -> EntryStatus {
		match self.state {
			EntryState::Pending => EntryStatus::Pending,
			EntryState::Ready(_) => EntryStatus::Ready,
			EntryState::Failed(_) => EntryStatus::Failed,
		}
	}

	/// Whether a fetch is still in flight.
	pub fn is_pending(&self) -> bool {
		matches!(self.state, EntryState::Pending)
	}

	/// Returns the series if Ready.
	pub fn series(&self) -> Option<&Arc<PopulationSeries>> {
		match &self.state {
			EntryState::Ready(series) => Some(series),
			_ => None,
		}
	}

	/// Returns the failure cause if Failed.
	pub fn error(&self) -> Option<&SourceError> {
		match &self.state {
			EntryState::Failed(err) => Some(err),
			_ => None,
		}
	}
}

/// Completion report sent from a fetch task.
#[derive(Debug)]
pub struct FetchSettled {
	pub prefecture: PrefectureId,
	pub generation: u64,
	pub result: Result<PopulationSeries, SourceError>,
}

/// Read access to cache entries by prefecture.
pub trait EntryLookup {
	fn lookup(&self, id: PrefectureId) -> Option<&CacheEntry>;
}

impl<S: BuildHasher> EntryLookup for HashMap<PrefectureId, CacheEntry, S> {
	fn lookup(&self, id: PrefectureId) -> Option<&CacheEntry> {
		self.get(&id)
	}
}

/// Prefecture-keyed population cache.
pub struct PopulationCache {
	source: Arc<dyn PopulationSource>,
	policy: CachePolicy,
	entries: FxHashMap<PrefectureId, CacheEntry>,
	/// Deselected prefectures, least recently released first.
	released: IndexSet<PrefectureId>,
	clock: GenerationClock,
	fetches_started: u64,
	settled_tx: mpsc::UnboundedSender<FetchSettled>,
	settled_rx: mpsc::UnboundedReceiver<FetchSettled>,
}

impl std::fmt::Debug for PopulationCache {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("PopulationCache")
			.field("policy", &self.policy)
			.field("entries", &self.entries)
			.field("released", &self.released)
			.field("fetches_started", &self.fetches_started)
			.finish()
	}
}

impl EntryLookup for PopulationCache {
	fn lookup(&self, id: PrefectureId) -> Option<&CacheEntry> {
		self.entries.get(&id)
	}
}

impl PopulationCache {
	/// Creates an empty cache fetching from `source`.
	pub fn new(source: Arc<dyn PopulationSource>, policy: CachePolicy) -> Self {
		let (settled_tx, settled_rx) = mpsc::unbounded_channel();
		Self {
			source,
			policy,
			entries: FxHashMap::default(),
			released: IndexSet::new(),
			clock: GenerationClock::new(),
			fetches_started: 0,
			settled_tx,
			settled_rx,
		}
	}

	/// Returns the entry for `id`, starting a fetch if there is none.
	///
	/// Never starts a second fetch for an existing entry, whatever its state.
	pub fn request(&mut self, id: PrefectureId) -> &CacheEntry {
		self.released.shift_remove(&id);
		if !self.entries.contains_key(&id) {
			let entry = self.start_fetch(id);
			self.entries.insert(id, entry);
		}
		&self.entries[&id]
	}

	fn start_fetch(&mut self, prefecture: PrefectureId) -> CacheEntry {
		let generation = self.clock.next();
		self.fetches_started += 1;
		debug!(prefecture = prefecture.0, generation, "cache.fetch.start");

		let source = Arc::clone(&self.source);
		let fetch = prefpop_worker::spawn(TaskClass::Fetch, async move { source.fetch_population(prefecture).await });

		let tx = self.settled_tx.clone();
		prefpop_worker::spawn(TaskClass::Relay, async move {
			let result = match fetch.await {
				Ok(result) => result,
				Err(err) => Err(SourceError::Task(describe_join_error(err))),
			};
			let _ = tx.send(FetchSettled {
				prefecture,
				generation,
				result,
			});
		});

		CacheEntry::pending(prefecture, generation)
	}

	/// Returns the entry for `id` without starting a fetch.
	pub fn get(&self, id: PrefectureId) -> Option<&CacheEntry> {
		self.entries.get(&id)
	}

	/// Drops a settled entry so the next [`Self::request`] fetches again.
	///
	/// Pending entries are kept: their fetch is still the one in flight.
	pub fn invalidate(&mut self, id: PrefectureId) -> bool {
		match self.entries.get(&id) {
			Some(entry) if entry.is_pending() => {
				debug!(prefecture = id.0, "cache.invalidate.pending_refused");
				false
			}
			Some(_) => {
				self.entries.remove(&id);
				self.released.shift_remove(&id);
				debug!(prefecture = id.0, "cache.invalidate");
				true
			}
			None => false,
		}
	}

	/// Marks `id` as no longer displayed.
	///
	/// Under [`CachePolicy::RetainAll`] this is a no-op.
	pub fn release(&mut self, id: PrefectureId) {
		let CachePolicy::Lru { .. } = self.policy else {
			return;
		};
		if !self.entries.contains_key(&id) {
			return;
		}
		self.released.shift_remove(&id);
		self.released.insert(id);
		self.evict_over_capacity();
	}

	fn evict_over_capacity(&mut self) {
		let CachePolicy::Lru { capacity } = self.policy else {
			return;
		};
		while self.released.len() > capacity.get() {
			let entries = &self.entries;
			let Some(pos) = self
				.released
				.iter()
				.position(|id| entries.get(id).is_some_and(|e| !e.is_pending()))
			else {
				break;
			};
			if let Some(id) = self.released.shift_remove_index(pos) {
				self.entries.remove(&id);
				debug!(prefecture = id.0, "cache.evict");
			}
		}
	}

	/// Applies a fetch completion.
	///
	/// Returns the updated entry, or `None` when the completion is stale.
	pub fn settle(&mut self, msg: FetchSettled) -> Option<&CacheEntry> {
		let FetchSettled {
			prefecture,
			generation,
			result,
		} = msg;

		let Some(entry) = self
			.entries
			.get_mut(&prefecture)
			.filter(|e| e.generation == generation && e.is_pending())
		else {
			debug!(prefecture = prefecture.0, generation, "cache.settle.stale");
			return None;
		};

		entry.state = match result {
			Ok(series) => {
				debug!(prefecture = prefecture.0, generation, "cache.settle.ready");
				EntryState::Ready(Arc::new(series))
			}
			Err(err) => {
				warn!(prefecture = prefecture.0, generation, error = %err, "cache.settle.failed");
				EntryState::Failed(err)
			}
		};

		self.evict_over_capacity();
		self.entries.get(&prefecture)
	}

	/// Takes one completion without waiting.
	pub fn try_next_settled(&mut self) -> Option<FetchSettled> {
		self.settled_rx.try_recv().ok()
	}

	/// Waits for the next completion.
	pub async fn next_settled(&mut self) -> Option<FetchSettled> {
		self.settled_rx.recv().await
	}

	/// Number of fetches still in flight.
	pub fn in_flight(&self) -> usize {
		self.entries.values().filter(|e| e.is_pending()).count()
	}

	/// Total fetches started over the cache's lifetime.
	pub fn fetches_started(&self) -> u64 {
		self.fetches_started
	}

	/// Returns the retention policy.
	pub fn policy(&self) -> CachePolicy {
		self.policy
	}

	/// Number of entries in any state.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Whether the cache holds no entries.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}
