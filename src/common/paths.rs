use anyhow::{Context, Result};
use std::path::PathBuf;

/// Placeholder for the per-user config home (`$XDG_CONFIG_HOME`, `~/.config`).
pub const CONFIG_HOME_PLACEHOLDER: &str = "$XDG_CONFIG_HOME";
/// Placeholder for the legacy GTK 2 rc file (`$GTK2_RC_FILES`, `~/.gtkrc-2.0`).
pub const GTK2_RC_PLACEHOLDER: &str = "$GTK2_RC_FILES";

const CONFIG_HOME_DEFAULT: &str = "/.config";
const GTK2_RC_DEFAULT: &str = "/.gtkrc-2.0";

/// Expands the symbolic path templates used for toolkit config files.
///
/// Values are captured once so a single apply cycle sees a consistent view of
/// the environment.
#[derive(Debug, Clone)]
pub struct PathResolver {
    home: PathBuf,
    config_home: Option<String>,
    gtk2_rc_files: Option<String>,
}

impl PathResolver {
    pub fn new(home: PathBuf, config_home: Option<String>, gtk2_rc_files: Option<String>) -> Self {
        Self {
            home,
            config_home,
            gtk2_rc_files,
        }
    }

    pub fn from_env() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("/"));
        Self::new(
            home,
            std::env::var("XDG_CONFIG_HOME").ok(),
            std::env::var("GTK2_RC_FILES").ok(),
        )
    }

    /// Resolve a template into a concrete path.
    ///
    /// Substitution runs config home, then the GTK 2 rc placeholder, then the
    /// leading `~`. Text produced by one step is never fed back into an earlier
    /// step.
    pub fn resolve(&self, template: &str) -> PathBuf {
        let home = self.home.to_string_lossy().into_owned();
        let config_home = env_path_or(self.config_home.as_deref(), &home, CONFIG_HOME_DEFAULT);
        let gtk2_rc = env_path_or(self.gtk2_rc_files.as_deref(), &home, GTK2_RC_DEFAULT);

        let path = template
            .replace(CONFIG_HOME_PLACEHOLDER, &config_home)
            .replace(GTK2_RC_PLACEHOLDER, &gtk2_rc);
        let path = shellexpand::tilde_with_context(&path, || Some(home.as_str()));
        PathBuf::from(path.into_owned())
    }
}

/// First entry of a colon separated variable, or `home + default` when unset.
fn env_path_or(value: Option<&str>, home: &str, default: &str) -> String {
    match value.filter(|v| !v.is_empty()) {
        Some(v) => v.split(':').next().unwrap_or(v).to_string(),
        None => format!("{home}{default}"),
    }
}

/// Standard data directories, most specific first.
///
/// `$XDG_DATA_HOME` (or `~/.local/share`) followed by every entry of
/// `$XDG_DATA_DIRS` (or `/usr/local/share:/usr/share`).
pub fn data_dirs() -> Vec<PathBuf> {
    let mut result = Vec::new();
    if let Some(data_home) = dirs::data_dir() {
        result.push(data_home);
    }

    let system = std::env::var("XDG_DATA_DIRS")
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "/usr/local/share:/usr/share".to_string());
    for dir in system.split(':').filter(|d| !d.is_empty()) {
        let dir = PathBuf::from(dir);
        if !result.contains(&dir) {
            result.push(dir);
        }
    }
    result
}

/// Get the gtksync config directory
pub fn gtksync_config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .context("Unable to determine user config directory")?
        .join("gtksync");

    std::fs::create_dir_all(&config_dir)
        .with_context(|| format!("creating config directory at {}", config_dir.display()))?;

    Ok(config_dir)
}
