#![cfg_attr(test, allow(unused_crate_dependencies))]
//! Prefecture and population-composition domain types.
//!
//! Everything here is immutable once constructed. [`PopulationSeries::new`]
//! and [`Catalog::new`] are the only ways in, and both enforce the invariants
//! the rest of the workspace relies on:
//!
//! - composition points are strictly ascending by year
//! - composition labels are unique within a series
//! - prefecture ids are unique within a catalog

mod catalog;
mod error;
mod series;

pub use catalog::{Catalog, Prefecture, PrefectureId};
pub use error::{CatalogError, SeriesError};
pub use series::{Composition, PopulationPoint, PopulationSeries};
