#![cfg_attr(test, allow(unused_crate_dependencies))]
//! Task spawning primitives shared by the population fetch pipeline.
//!
//! A fetch runs as a [`TaskClass::Fetch`] task watched by a
//! [`TaskClass::Relay`] task, which forwards the result (or the panic,
//! via [`describe_join_error`]) tagged with a [`GenerationClock`] value.

mod class;
mod generation;
mod join;
mod spawn;

pub use class::TaskClass;
pub use generation::GenerationClock;
pub use join::describe_join_error;
pub use spawn::spawn;
