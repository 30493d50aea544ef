//! Read the active theme back out of an existing GTK config file

use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::common::paths::PathResolver;
use crate::ui::prelude::*;

use super::GtkVersion;
use super::themes::default_gtk_theme;

const THEME_KEY: &str = "gtk-theme-name";

/// Theme currently set in the config file for `version`, falling back to the
/// desktop default when the file is missing, unreadable or has no theme line.
pub fn active_gtk_theme(resolver: &PathResolver, version: GtkVersion, timeout: Duration) -> String {
    let path = version.config_path(resolver);
    match theme_from_file(&path, version) {
        Some(theme) => theme,
        None => default_gtk_theme(timeout),
    }
}

/// Theme named in the file at `path`, if any.
pub fn theme_from_file(path: &Path, version: GtkVersion) -> Option<String> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            emit(
                Level::Debug,
                "gtk.read.open_failed",
                &format!("Cannot read {}: {e}", path.display()),
                None,
            );
            return None;
        }
    };

    let lines = byte_lines(&bytes);
    match version {
        GtkVersion::Gtk2 => find_gtkrc_theme(lines),
        GtkVersion::Gtk3 => find_settings_ini_theme(lines),
    }
}

/// Lines of a config file, lossily decoded.
///
/// The files are byte streams; a line in another encoding must not end the
/// scan early.
pub(crate) fn byte_lines(bytes: &[u8]) -> impl Iterator<Item = String> + '_ {
    bytes
        .split(|&b| b == b'\n')
        .map(|line| String::from_utf8_lossy(line).into_owned())
}

fn find_gtkrc_theme(lines: impl Iterator<Item = String>) -> Option<String> {
    lines
        .map(|line| line.trim().to_string())
        .filter(|line| line.starts_with(THEME_KEY))
        .find_map(|line| line.split('=').nth(1).map(|v| v.replace('"', "").trim().to_string()))
}

/// settings.ini values are unquoted, so only whitespace is stripped.
fn find_settings_ini_theme(lines: impl Iterator<Item = String>) -> Option<String> {
    let mut in_settings = false;
    for line in lines {
        let line = line.trim();
        if line.starts_with("[Settings]") {
            in_settings = true;
        } else if line.starts_with('[') && line.ends_with(']') {
            in_settings = false;
        } else if in_settings
            && line.starts_with(THEME_KEY)
            && let Some(value) = line.split('=').nth(1)
        {
            return Some(value.trim().to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gtk::themes::tests::FakeGsettings;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_gtkrc_quoted_value() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "gtkrc",
            "# comment\n\n  gtk-theme-name = \"Arc-Dark\"\ngtk-icon-theme-name = \"Papirus\"\n",
        );
        assert_eq!(theme_from_file(&path, GtkVersion::Gtk2).as_deref(), Some("Arc-Dark"));
    }

    #[test]
    fn test_gtkrc_first_match_wins() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "gtkrc", "gtk-theme-name=\"One\"\ngtk-theme-name=\"Two\"\n");
        assert_eq!(theme_from_file(&path, GtkVersion::Gtk2).as_deref(), Some("One"));
    }

    #[test]
    fn test_gtkrc_line_without_value_is_skipped() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "gtkrc", "gtk-theme-name\ngtk-theme-name = \"Real\"\n");
        assert_eq!(theme_from_file(&path, GtkVersion::Gtk2).as_deref(), Some("Real"));
    }

    #[test]
    fn test_settings_ini_only_reads_settings_section() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "settings.ini",
            "gtk-theme-name = Outside\n[Other]\ngtk-theme-name = Wrong\n[Settings]\ngtk-icon-theme-name = Papirus\ngtk-theme-name = Materia\n",
        );
        assert_eq!(theme_from_file(&path, GtkVersion::Gtk3).as_deref(), Some("Materia"));
    }

    #[test]
    fn test_settings_ini_section_closed_by_next_header() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "settings.ini", "[Settings]\n[Later]\ngtk-theme-name = Nope\n");
        assert_eq!(theme_from_file(&path, GtkVersion::Gtk3), None);
    }

    #[test]
    fn test_settings_ini_keeps_quotes() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "settings.ini", "[Settings]\ngtk-theme-name = \"Quoted\"\n");
        assert_eq!(
            theme_from_file(&path, GtkVersion::Gtk3).as_deref(),
            Some("\"Quoted\"")
        );
    }

    #[test]
    fn test_latin1_comment_before_gtkrc_theme() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gtkrc");
        fs::write(&path, b"# Th\xe8me perso\ngtk-theme-name = \"Clearlooks\"\n").unwrap();
        assert_eq!(theme_from_file(&path, GtkVersion::Gtk2).as_deref(), Some("Clearlooks"));
    }

    #[test]
    fn test_latin1_comment_inside_settings_section() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.ini");
        fs::write(&path, b"[Settings]\n# caf\xe9\ngtk-theme-name = Materia\n").unwrap();
        assert_eq!(theme_from_file(&path, GtkVersion::Gtk3).as_deref(), Some("Materia"));
    }

    #[test]
    fn test_missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        assert_eq!(theme_from_file(&dir.path().join("nope"), GtkVersion::Gtk2), None);
    }

    #[test]
    #[serial]
    fn test_active_theme_falls_back_to_default() {
        let _gsettings = FakeGsettings::new("echo \"'Adwaita-dark'\"");
        let dir = TempDir::new().unwrap();
        let resolver = PathResolver::new(dir.path().to_path_buf(), None, None);
        assert_eq!(
            active_gtk_theme(&resolver, GtkVersion::Gtk3, Duration::from_secs(2)),
            "Adwaita-dark"
        );
    }

    #[test]
    #[serial]
    fn test_settings_without_theme_line_fall_back_to_default() {
        let _gsettings = FakeGsettings::new("echo \"'Adwaita-dark'\"");
        let dir = TempDir::new().unwrap();
        let resolver = PathResolver::new(dir.path().to_path_buf(), None, None);
        fs::write(dir.path().join(".gtkrc-2.0"), "gtk-icon-theme-name = \"Papirus\"\n").unwrap();
        assert_eq!(
            active_gtk_theme(&resolver, GtkVersion::Gtk2, Duration::from_secs(2)),
            "Adwaita-dark"
        );
    }

    #[test]
    fn test_active_theme_reads_resolved_file() {
        let dir = TempDir::new().unwrap();
        let resolver = PathResolver::new(dir.path().to_path_buf(), None, None);
        fs::write(dir.path().join(".gtkrc-2.0"), "gtk-theme-name = \"Raleigh\"\n").unwrap();
        assert_eq!(
            active_gtk_theme(&resolver, GtkVersion::Gtk2, Duration::from_secs(1)),
            "Raleigh"
        );
    }
}
