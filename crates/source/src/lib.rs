#![cfg_attr(test, allow(unused_crate_dependencies))]
//! Population data source boundary.
//!
//! [`PopulationSource`] is the seam the controller consumes. [`HttpSource`]
//! implements it against the prefecture population API:
//!
//! ```text
//! GET {base}/api/v1/prefectures
//! GET {base}/api/v1/population/composition/perYear?prefCode={id}
//! ```
//!
//! Both endpoints answer with a `{ message, result }` envelope, decoded by
//! [`decode_prefectures`] and [`decode_population`].

mod config;
mod endpoint;
mod error;
mod http;
mod query;
mod source;
mod wire;

pub use config::{API_KEY_ENV, ApiConfig, BASE_URL_ENV, DEFAULT_BASE_URL};
pub use endpoint::Endpoint;
pub use error::{Result, SourceError};
pub use http::{API_KEY_HEADER, HttpSource};
pub use query::QueryParams;
pub use source::PopulationSource;
pub use wire::{decode_population, decode_prefectures};
