//! # Client configuration: `notebook.toml`
//!
//! Settings for the client engine: where the API lives and how the autosave
//! controller paces its writes.
//!
//! ## Structure
//!
//! ```toml
//! [api]
//! base_url = "http://localhost:8080"
//!
//! [autosave]
//! draft_debounce_ms = 500    # local draft coalescing window
//! save_debounce_ms = 1000    # remote save coalescing window
//! status_reset_ms = 2000     # success/failed indicator lifetime
//! ```
//!
//! Every field has a serde default, so a missing or empty file is equivalent
//! to [`StoreConfig::default`].

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level client configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub autosave: AutosaveConfig,
}

/// Where the document API is served.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

/// Autosave pacing, in milliseconds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AutosaveConfig {
    #[serde(default = "default_draft_debounce")]
    pub draft_debounce_ms: u64,
    #[serde(default = "default_save_debounce")]
    pub save_debounce_ms: u64,
    #[serde(default = "default_status_reset")]
    pub status_reset_ms: u64,
}

fn default_draft_debounce() -> u64 {
    500
}

fn default_save_debounce() -> u64 {
    1000
}

fn default_status_reset() -> u64 {
    2000
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            draft_debounce_ms: default_draft_debounce(),
            save_debounce_ms: default_save_debounce(),
            status_reset_ms: default_status_reset(),
        }
    }
}

impl AutosaveConfig {
    pub fn draft_debounce(&self) -> Duration {
        Duration::from_millis(self.draft_debounce_ms)
    }

    pub fn save_debounce(&self) -> Duration {
        Duration::from_millis(self.save_debounce_ms)
    }

    pub fn status_reset(&self) -> Duration {
        Duration::from_millis(self.status_reset_ms)
    }
}

impl StoreConfig {
    /// Create a config pointing at the given API base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            api: ApiConfig {
                base_url: base_url.into(),
            },
            autosave: AutosaveConfig::default(),
        }
    }

    /// Builder method to set the remote save debounce window.
    pub fn with_save_debounce_ms(mut self, ms: u64) -> Self {
        self.autosave.save_debounce_ms = ms;
        self
    }

    /// The well-known filename for the config file.
    pub fn filename() -> &'static str {
        "notebook.toml"
    }

    /// Parse from TOML string.
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Serialize to TOML string.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
