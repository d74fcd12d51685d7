//! Data source configuration.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::{Result, SourceError};

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "https://yumemi-frontend-engineer-codecheck-api.vercel.app";

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "YUMEMI_X_API_KEY";

/// Environment variable overriding the base URL.
pub const BASE_URL_ENV: &str = "PREFPOP_BASE_URL";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for [`crate::HttpSource`].
///
/// Only the fields below are recognised; unknown keys in a config file are
/// rejected.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiConfig {
	/// Root of the API; endpoint paths are appended to it.
	pub base_url: Url,
	/// Sent as `X-API-KEY` when present.
	pub api_key: Option<String>,
	/// Per-request timeout in seconds.
	pub timeout_secs: u64,
	pub user_agent: String,
}

impl Default for ApiConfig {
	fn default() -> Self {
		Self {
			base_url: default_base_url(),
			api_key: None,
			timeout_secs: DEFAULT_TIMEOUT_SECS,
			user_agent: concat!("prefpop/", env!("CARGO_PKG_VERSION")).to_string(),
		}
	}
}

impl fmt::Debug for ApiConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ApiConfig")
			.field("base_url", &self.base_url.as_str())
			.field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
			.field("timeout_secs", &self.timeout_secs)
			.field("user_agent", &self.user_agent)
			.finish()
	}
}

fn default_base_url() -> Url {
	Url::parse(DEFAULT_BASE_URL).unwrap_or_else(|err| unreachable!("default base url is valid: {err}"))
}

impl ApiConfig {
	/// Creates a configuration for `base_url` with default timeout and no key.
	pub fn new(base_url: Url) -> Self {
		Self {
			base_url,
			..Self::default()
		}
	}

	/// Parses `base_url` and creates a configuration for it.
	pub fn parse(base_url: &str) -> Result<Self> {
		let base_url = Url::parse(base_url).map_err(|e| SourceError::Config(format!("invalid base url {base_url:?}: {e}")))?;
		Ok(Self::new(base_url))
	}

	/// Sets the API key.
	pub fn api_key(mut self, key: impl Into<String>) -> Self {
		self.api_key = Some(key.into());
		self
	}

	/// Sets the request timeout.
	pub fn timeout(mut self, secs: u64) -> Self {
		self.timeout_secs = secs;
		self
	}

	pub fn request_timeout(&self) -> Duration {
		Duration::from_secs(self.timeout_secs)
	}

	/// Applies [`API_KEY_ENV`] and [`BASE_URL_ENV`] from the process environment.
	pub fn with_env_overrides(self) -> Result<Self> {
		self.with_overrides_from(|name| std::env::var(name).ok())
	}

	/// Applies overrides from `lookup`; empty values are ignored.
	pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
		if let Some(key) = lookup(API_KEY_ENV).filter(|v| !v.is_empty()) {
			self.api_key = Some(key);
		}
		if let Some(raw) = lookup(BASE_URL_ENV).filter(|v| !v.is_empty()) {
			self.base_url = Url::parse(&raw).map_err(|e| SourceError::Config(format!("{BASE_URL_ENV}={raw:?}: {e}")))?;
		}
		self.validate()?;
		Ok(self)
	}

	/// Checks the settings are usable.
	pub fn validate(&self) -> Result<()> {
		if self.base_url.cannot_be_a_base() {
			return Err(SourceError::Config(format!("base url cannot carry a path: {}", self.base_url)));
		}
		if self.timeout_secs == 0 {
			return Err(SourceError::Config("timeout_secs must be > 0".into()));
		}
		Ok(())
	}
}
