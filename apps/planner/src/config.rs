//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use planner_core::domain::NOTICE_TTL;
#[cfg(feature = "gemini")]
use planner_infra::GeminiConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Root directory of the file store.
    pub data_dir: PathBuf,
    /// Keep everything in memory; nothing touches disk.
    pub ephemeral: bool,
    /// How long success notices stay up.
    pub notice_ttl: Duration,
    #[cfg(feature = "gemini")]
    pub gemini: Option<GeminiConfig>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            data_dir: env::var("PLANNER_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".planner")),
            ephemeral: false,
            notice_ttl: env::var("NOTICE_TTL_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(NOTICE_TTL),
            #[cfg(feature = "gemini")]
            gemini: GeminiConfig::from_env(),
        }
    }

    /// Apply command-line overrides.
    pub fn with_overrides(mut self, data_dir: Option<PathBuf>, ephemeral: bool) -> Self {
        if let Some(dir) = data_dir {
            self.data_dir = dir;
        }
        self.ephemeral |= ephemeral;
        self
    }
}
