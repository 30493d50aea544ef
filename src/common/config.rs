//! Tool configuration
//!
//! `~/.config/gtksync/config.toml`. Every field has a default, so a missing or
//! partial file is fine.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use super::paths;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Executable started as the live settings daemon
    pub xsettingsd_command: String,
    /// Upper bound for `gsettings` queries, in seconds
    pub query_timeout_secs: u64,
    /// Poll interval of `gtksync watch`, in seconds
    pub watch_interval_secs: u64,
    /// Send desktop notifications for user-visible notices
    pub notifications: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            xsettingsd_command: "xsettingsd".to_string(),
            query_timeout_secs: 2,
            watch_interval_secs: 2,
            notifications: true,
        }
    }
}

impl SyncConfig {
    pub fn load() -> Result<Self> {
        let path = paths::gtksync_config_dir()?.join("config.toml");
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs.max(1))
    }

    pub fn watch_interval(&self) -> Duration {
        Duration::from_secs(self.watch_interval_secs.max(1))
    }
}
