#![cfg_attr(test, allow(unused_crate_dependencies))]
//! Prefecture selection and population aggregation.
//!
//! [`SelectionController`] owns the user's [`SelectionSet`] and a
//! [`PopulationCache`]. Selecting a prefecture requests its population once;
//! the fetch runs as a background task and reports back over a channel that
//! only the controller drains, so all state changes happen in one place.
//!
//! ```text
//! toggle(id) ──► SelectionSet ──► PopulationCache::request ──► fetch task
//!      │                                                          │
//!      ▼                                                          ▼
//!  recompute() ◄── on_cache_settled(id) ◄── settle ◄── FetchSettled channel
//!      │
//!      ▼
//!  watch<Arc<AggregatedView>> ──► presentation
//! ```
//!
//! [`recompute`] is a pure function of the selection and cache contents.

mod cache;
mod catalog;
mod config;
mod controller;
mod error;
mod selection;
mod view;

#[cfg(test)]
mod testing;

pub use cache::{CacheEntry, EntryLookup, EntryState, EntryStatus, FetchSettled, PopulationCache};
pub use catalog::{CatalogLoadError, CatalogState, load_catalog};
pub use config::{CachePolicy, ControllerConfig};
pub use controller::{SelectionController, Toggle};
pub use error::ToggleError;
pub use selection::SelectionSet;
pub use view::{AggregatedView, ChartDataset, recompute};
