use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Hands out fetch generations, starting at 1.
///
/// A cache entry remembers the generation of the fetch it is waiting on; a
/// completion carrying any other generation is stale. Clones draw from the
/// same sequence.
#[derive(Debug, Default, Clone)]
pub struct GenerationClock {
	issued: Arc<AtomicU64>,
}

impl GenerationClock {
	pub fn new() -> Self {
		Self::default()
	}

	/// Issues the next generation.
	pub fn next(&self) -> u64 {
		self.issued.fetch_add(1, Ordering::Relaxed) + 1
	}
}
