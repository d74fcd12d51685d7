//! Controller configuration.

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

/// What happens to cache entries of deselected prefectures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case", deny_unknown_fields)]
pub enum CachePolicy {
	/// Keep every fetched entry for the lifetime of the cache.
	#[default]
	RetainAll,
	/// Keep at most `capacity` deselected entries, dropping the least
	/// recently deselected first. Selected and pending entries are never
	/// dropped.
	Lru { capacity: NonZeroUsize },
}

/// Settings for [`crate::SelectionController`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ControllerConfig {
	pub cache: CachePolicy,
}

impl ControllerConfig {
	pub fn with_cache_policy(mut self, policy: CachePolicy) -> Self {
		self.cache = policy;
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_retains_everything() {
		assert_eq!(ControllerConfig::default().cache, CachePolicy::RetainAll);
	}

	#[test]
	fn parses_tagged_policies() {
		let config: ControllerConfig = serde_json::from_str(r#"{"cache":{"policy":"lru","capacity":4}}"#).unwrap();
		assert_eq!(
			config.cache,
			CachePolicy::Lru {
				capacity: NonZeroUsize::new(4).unwrap()
			}
		);

		let config: ControllerConfig = serde_json::from_str(r#"{"cache":{"policy":"retain_all"}}"#).unwrap();
		assert_eq!(config.cache, CachePolicy::RetainAll);
	}

	#[test]
	fn rejects_zero_capacity_and_unknown_policy() {
		assert!(serde_json::from_str::<ControllerConfig>(r#"{"cache":{"policy":"lru","capacity":0}}"#).is_err());
		assert!(serde_json::from_str::<ControllerConfig>(r#"{"cache":{"policy":"forever"}}"#).is_err());
		assert!(serde_json::from_str::<ControllerConfig>(r#"{"eviction":"lru"}"#).is_err());
	}
}
