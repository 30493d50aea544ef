//! Installed GTK theme discovery and the desktop's default theme

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;

use crate::common::paths;
use crate::ui::prelude::*;

use super::ThemeQuery;

/// Themes GTK 3 ships compiled in; they have no directory under `themes/`.
pub const BUILTIN_GTK3_THEMES: [&str; 3] = ["Adwaita", "HighContrast", "HighContrastInverse"];

const GSETTINGS_SCHEMA: &str = "org.gnome.desktop.interface";
const GSETTINGS_THEME_KEY: &str = "gtk-theme";

/// List themes installed in the standard data directories.
pub fn list_gtk_themes(query: ThemeQuery) -> Vec<String> {
    list_gtk_themes_in(&paths::data_dirs(), query)
}

/// List themes under `<dir>/themes` for each of `data_dirs`.
///
/// Built-in GTK 3 themes come first (not for GTK 2), then discovered themes in
/// directory order. Each name appears once.
pub fn list_gtk_themes_in(data_dirs: &[PathBuf], query: ThemeQuery) -> Vec<String> {
    let mut themes: Vec<String> = Vec::new();

    if query != ThemeQuery::Version(super::GtkVersion::Gtk2) {
        themes.extend(BUILTIN_GTK3_THEMES.iter().map(|s| s.to_string()));
    }

    for data_dir in data_dirs {
        let themes_dir = data_dir.join("themes");
        if !themes_dir.is_dir() {
            continue;
        }

        for entry in walkdir::WalkDir::new(&themes_dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.path().is_dir() {
                continue;
            }
            let Some(name) = entry.file_name().to_str() else {
                continue;
            };
            if supports(entry.path(), query) && !themes.iter().any(|t| t == name) {
                themes.push(name.to_string());
            }
        }
    }

    themes
}

fn supports(theme_dir: &Path, query: ThemeQuery) -> bool {
    match query {
        ThemeQuery::Version(version) => theme_dir
            .join(format!("gtk-{}", version.as_str()))
            .join(version.theme_marker_file())
            .exists(),
        ThemeQuery::Any => walkdir::WalkDir::new(theme_dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .any(|e| {
                e.file_name().to_string_lossy().starts_with("gtk-")
                    && e.path().join("gtk.css").exists()
            }),
    }
}

/// Ask gsettings for the desktop's GTK theme.
///
/// Returns an empty string when gsettings is missing, fails, hangs past
/// `timeout` or reports an empty value.
pub fn default_gtk_theme(timeout: Duration) -> String {
    if which::which("gsettings").is_err() {
        emit(
            Level::Debug,
            "gtk.default_theme.no_gsettings",
            "gsettings not found; no default GTK theme",
            None,
        );
        return String::new();
    }

    let output = Command::new("timeout")
        .arg(format!("{}s", timeout.as_secs().max(1)))
        .args(["gsettings", "get", GSETTINGS_SCHEMA, GSETTINGS_THEME_KEY])
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output();

    match output {
        Ok(out) if out.status.success() => parse_gsettings_value(&String::from_utf8_lossy(&out.stdout)),
        Ok(out) => {
            emit(
                Level::Debug,
                "gtk.default_theme.query_failed",
                &format!(
                    "gsettings query failed with exit code {}",
                    out.status.code().unwrap_or(-1)
                ),
                None,
            );
            String::new()
        }
        Err(e) => {
            emit(
                Level::Debug,
                "gtk.default_theme.query_error",
                &format!("Failed to execute gsettings: {e}"),
                None,
            );
            String::new()
        }
    }
}

/// Strip the GVariant quoting from a gsettings string value.
pub(crate) fn parse_gsettings_value(raw: &str) -> String {
    let value = raw.trim();
    if value.len() <= 1 {
        return String::new();
    }
    value.replace(['\'', '"'], "").trim().to_string()
}
