//! Loader configuration supplied by the module manager.

use std::path::PathBuf;
use std::time::Duration;

/// Default minimum delay, in milliseconds, before cached data is written back or evicted.
pub const DEFAULT_WRITE_DELAY: u64 = 7000;

/// Settings shared by all loading strategies.
///
/// Hooks are not part of the configuration, see [`Hooks`](crate::hooks::Hooks).
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Enables the bytecode cache of the host process strategy when set.
    pub node_cached_data: Option<CachedDataConfig>,
    /// Set when running inside an embedding renderer that expects `file:///` script names with an uppercase drive
    /// letter.
    pub embedded_renderer: bool,
    /// Nonce attached to script elements created by the in-page strategy.
    pub csp_nonce: Option<String>,
    /// Value of the `crossorigin` attribute for script elements created by the in-page strategy.
    pub cross_origin: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedDataConfig {
    /// Directory holding the `.code` files.
    pub path: PathBuf,
    /// Mixed into every cache key, typically a product commit, so that a new build never reuses old entries.
    #[serde(default)]
    pub seed: Option<String>,
    /// Minimum delay, in milliseconds, before a cache file is written or deleted.
    #[serde(default = "default_write_delay")]
    pub write_delay: u64,
}

fn default_write_delay() -> u64 {
    DEFAULT_WRITE_DELAY
}

impl CachedDataConfig {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            seed: None,
            write_delay: DEFAULT_WRITE_DELAY,
        }
    }

    pub fn with_seed<S: Into<String>>(mut self, seed: S) -> Self {
        self.seed = Some(seed.into());
        self
    }

    pub fn with_write_delay(mut self, delay: Duration) -> Self {
        self.write_delay = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    #[inline]
    pub fn write_delay(&self) -> Duration {
        Duration::from_millis(self.write_delay)
    }
}

impl Config {
    /// Parses a configuration from JSON, using defaults for any missing field.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
