use std::time::Duration;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::domain::error::{AppError, Result};

/// Runtime settings for both binaries.
///
/// Layered in figment order: built-in defaults, then
/// `equipment-visualizer.toml` next to the working directory, then
/// `EQUIPVIZ_*` environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Base URL the desktop client talks to.
    pub backend_url: String,
    /// Address the aggregation service binds to.
    pub bind_addr: String,
    /// Wall-clock budget for the reachability probe, in seconds.
    pub probe_timeout_secs: u64,
    /// Wall-clock budget for one upload round trip, in seconds.
    pub upload_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:8000".to_string(),
            bind_addr: "0.0.0.0:8000".to_string(),
            probe_timeout_secs: 2,
            upload_timeout_secs: 10,
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self> {
        Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file("equipment-visualizer.toml"))
            .merge(Env::prefixed("EQUIPVIZ_"))
            .extract()
            .map_err(|e| AppError::Config(e.to_string()))
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn upload_timeout(&self) -> Duration {
        Duration::from_secs(self.upload_timeout_secs)
    }

    /// Full URL of the analyze endpoint, tolerant of a trailing slash on
    /// the configured base.
    pub fn analyze_url(&self) -> String {
        format!("{}/api/analyze/", self.backend_url.trim_end_matches('/'))
    }
}
