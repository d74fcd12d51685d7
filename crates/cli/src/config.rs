//! Application configuration file.

use std::path::{Path, PathBuf};

use anyhow::Context;
use prefpop_controller::ControllerConfig;
use prefpop_source::ApiConfig;
use serde::Deserialize;
use tracing::debug;

use crate::cli::Cli;

/// Contents of `config.toml`.
///
/// ```toml
/// [api]
/// base_url = "https://yumemi-frontend-engineer-codecheck-api.vercel.app"
/// timeout_secs = 30
///
/// [controller.cache]
/// policy = "lru"
/// capacity = 16
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
	pub api: ApiConfig,
	pub controller: ControllerConfig,
}

impl AppConfig {
	pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
		toml::from_str(text)
	}

	/// Location searched when no `--config` is given.
	pub fn default_path() -> Option<PathBuf> {
		dirs::config_dir().map(|dir| dir.join("prefpop").join("config.toml"))
	}

	/// Reads `explicit`, or the default path if it exists, or falls back to
	/// defaults.
	pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
		let path = match explicit {
			Some(path) => path.to_path_buf(),
			None => match Self::default_path().filter(|p| p.is_file()) {
				Some(path) => path,
				None => return Ok(Self::default()),
			},
		};
		debug!(path = %path.display(), "config.load");
		let text = std::fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
		Self::from_toml(&text).with_context(|| format!("parsing {}", path.display()))
	}

	/// Applies command-line flags, then environment overrides.
	pub fn with_overrides(mut self, cli: &Cli) -> anyhow::Result<Self> {
		if let Some(base_url) = &cli.base_url {
			self.api.base_url = base_url.clone();
		}
		if let Some(timeout) = cli.timeout {
			self.api.timeout_secs = timeout;
		}
		self.api = self.api.with_env_overrides().context("applying environment overrides")?;
		Ok(self)
	}
}
