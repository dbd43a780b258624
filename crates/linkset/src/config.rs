//! TOML configuration.
//!
//! ```toml
//! palette = ["#FF0000", "#0000FF"]
//!
//! [anchor]
//! min_window_len = 10
//! hash_len = 6
//!
//! [repair]
//! out_of_bounds = "relocate" # or "skip"
//!
//! [schedule]
//! debounce_ms = 50
//! ```
//!
//! Every field is optional.

use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;

use flink_anchor::{AnchorOptions, RepairOptions};
use serde::Deserialize;
use tracing::debug;

use crate::connections::Connections;
use crate::error::{ConfigError, Result};
use crate::schedule::{DEFAULT_DEBOUNCE, RecomputeScheduler};

/// Debounce settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScheduleConfig {
	/// Delay in milliseconds between the last change and a recompute.
	pub debounce_ms: u64,
}

impl Default for ScheduleConfig {
	fn default() -> Self {
		Self {
			debounce_ms: DEFAULT_DEBOUNCE.as_millis() as u64,
		}
	}
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FlinkConfig {
	pub anchor: AnchorOptions,
	pub repair: RepairOptions,
	pub schedule: ScheduleConfig,
	/// Color tags for link sets. Empty means the built-in palette.
	pub palette: Vec<String>,
}

impl FlinkConfig {
	/// Parses a TOML string.
	pub fn parse(input: &str) -> Result<Self> {
		Ok(toml::from_str(input)?)
	}

	/// Loads configuration from a file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
			path: path.to_path_buf(),
			error: e,
		})?;
		Self::parse(&content)
	}

	/// Loads configuration from a file, or returns defaults if it does not
	/// exist.
	pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		match Self::load(path) {
			Err(ConfigError::Io { error, .. }) if error.kind() == ErrorKind::NotFound => {
				debug!(path = %path.display(), "no config file, using defaults");
				Ok(Self::default())
			}
			other => other,
		}
	}

	pub fn debounce(&self) -> Duration {
		Duration::from_millis(self.schedule.debounce_ms)
	}

	/// Creates an empty connection list using the configured palette.
	pub fn connections(&self) -> Connections {
		Connections::with_palette(self.palette.clone())
	}

	/// Creates a scheduler using the configured debounce.
	pub fn scheduler<K: PartialEq>(&self) -> RecomputeScheduler<K> {
		RecomputeScheduler::new(self.debounce())
	}
}
