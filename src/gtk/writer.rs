//! Write GTK config files, backing up files this tool did not create

use anyhow::{Context, Result};
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::common::paths::PathResolver;
use crate::ui::prelude::*;

use super::reader::byte_lines;
use super::templates::render_gtk;
use super::{GtkVersion, SENTINEL, ThemeConfig};

/// Outcome of writing one target file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteReport {
    pub path: PathBuf,
    /// Copy of a user-owned file made before overwriting it
    pub backup: Option<PathBuf>,
    pub written: bool,
}

/// Render `config` for `version` and write it to the resolved config path.
///
/// Never fails: backup and write problems are reported and reflected in the
/// returned report.
pub fn write_gtk_config(
    resolver: &PathResolver,
    version: GtkVersion,
    config: &ThemeConfig,
    cursor_theme: &str,
) -> WriteReport {
    let path = version.config_path(resolver);
    let backup = backup_if_user_owned(&path);
    let contents = render_gtk(version, config, cursor_theme);

    let written = match write_file(&path, &contents) {
        Ok(()) => {
            emit(
                Level::Debug,
                "gtk.write.done",
                &format!("Wrote GTK {version} settings to {}", path.display()),
                None,
            );
            true
        }
        Err(e) => {
            emit(
                Level::Debug,
                "gtk.write.failed",
                &format!("Skipping GTK {version} settings: {e:#}"),
                None,
            );
            false
        }
    };

    WriteReport {
        path,
        backup,
        written,
    }
}

/// Whether any line of the file starts with the sentinel.
///
/// Lines are trimmed and prefix-matched, so a sentinel with trailing text
/// still counts. `None` when the file cannot be read.
pub fn has_sentinel(path: &Path) -> Option<bool> {
    let bytes = fs::read(path).ok()?;
    Some(byte_lines(&bytes).any(|line| line.trim().starts_with(SENTINEL)))
}

/// `<path>-<unix seconds>~`
pub fn backup_path(path: &Path, timestamp: i64) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(format!("-{timestamp}~"));
    PathBuf::from(name)
}

/// Copy an existing file without the sentinel aside. Best effort: a failed
/// copy is reported and the caller overwrites anyway.
fn backup_if_user_owned(path: &Path) -> Option<PathBuf> {
    if !path.exists() || has_sentinel(path) == Some(true) {
        return None;
    }

    let backup = backup_path(path, chrono::Utc::now().timestamp());
    match fs::copy(path, &backup) {
        Ok(_) => {
            emit(
                Level::Warn,
                "gtk.backup.created",
                &format!(
                    "'{}' has been overwritten. You can find a copy of your old settings in '{}'",
                    path.display(),
                    backup.display()
                ),
                Some(serde_json::json!({
                    "path": path.display().to_string(),
                    "backup": backup.display().to_string(),
                })),
            );
            Some(backup)
        }
        Err(e) => {
            emit(
                Level::Warn,
                "gtk.backup.failed",
                &format!("Could not back up '{}' before overwriting it: {e}", path.display()),
                None,
            );
            None
        }
    }
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;
    }

    let mut file =
        File::create(path).with_context(|| format!("opening {} for writing", path.display()))?;
    file.write_all(contents.as_bytes())
        .with_context(|| format!("writing {}", path.display()))?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gtk::reader::theme_from_file;
    use crate::gtk::{ButtonStyle, ToolbarStyle};
    use tempfile::TempDir;

    fn setup() -> (TempDir, PathResolver) {
        let dir = TempDir::new().unwrap();
        let resolver = PathResolver::new(dir.path().to_path_buf(), None, None);
        (dir, resolver)
    }

    fn sample() -> ThemeConfig {
        ThemeConfig {
            style_theme: "Arc-Dark".into(),
            icon_theme: "Adwaita".into(),
            font_name: "Sans 10".into(),
            button_style: ButtonStyle::WithImages,
            toolbar_style: ToolbarStyle::Icons,
        }
    }

    fn backups_in(dir: &Path) -> Vec<PathBuf> {
        fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.to_string_lossy().ends_with('~'))
            .collect()
    }

    #[test]
    fn test_creates_missing_parent_directories() {
        let (dir, resolver) = setup();
        let report = write_gtk_config(&resolver, GtkVersion::Gtk3, &sample(), "Adwaita");
        assert!(report.written);
        assert_eq!(report.backup, None);
        assert_eq!(report.path, dir.path().join(".config/gtk-3.0/settings.ini"));
        assert!(report.path.exists());
    }

    #[test]
    fn test_scenario_gtk2_contents() {
        let (dir, resolver) = setup();
        write_gtk_config(&resolver, GtkVersion::Gtk2, &sample(), "");
        let text = fs::read_to_string(dir.path().join(".gtkrc-2.0")).unwrap();
        assert!(text.contains("gtk-font-name = \"Sans 10\""));
        assert!(text.contains("gtk-button-images = 1"));
        assert!(text.contains("gtk-toolbar-style = GTK_TOOLBAR_ICONS"));
    }

    #[test]
    fn test_second_write_is_identical_and_not_backed_up() {
        let (dir, resolver) = setup();
        let first = write_gtk_config(&resolver, GtkVersion::Gtk2, &sample(), "Adwaita");
        let bytes_first = fs::read(&first.path).unwrap();
        let second = write_gtk_config(&resolver, GtkVersion::Gtk2, &sample(), "Adwaita");
        let bytes_second = fs::read(&second.path).unwrap();

        assert_eq!(bytes_first, bytes_second);
        assert_eq!(second.backup, None);
        assert!(backups_in(dir.path()).is_empty());
    }

    #[test]
    fn test_user_file_is_backed_up_once() {
        let (dir, resolver) = setup();
        let target = dir.path().join(".gtkrc-2.0");
        fs::write(&target, "include \"/usr/share/themes/Foo/gtk-2.0/gtkrc\"\n").unwrap();

        let report = write_gtk_config(&resolver, GtkVersion::Gtk2, &sample(), "Adwaita");
        let backup = report.backup.expect("backup created");

        let name = backup.file_name().unwrap().to_string_lossy().into_owned();
        let stamp = name
            .strip_prefix(".gtkrc-2.0-")
            .and_then(|rest| rest.strip_suffix('~'))
            .unwrap();
        assert!(stamp.parse::<i64>().is_ok());
        assert_eq!(
            fs::read_to_string(&backup).unwrap(),
            "include \"/usr/share/themes/Foo/gtk-2.0/gtkrc\"\n"
        );
        assert_eq!(has_sentinel(&target), Some(true));

        // The generated file is now ours: no further backups
        write_gtk_config(&resolver, GtkVersion::Gtk2, &sample(), "Adwaita");
        assert_eq!(backups_in(dir.path()), vec![backup]);
    }

    #[test]
    fn test_sentinel_anywhere_counts_as_generated() {
        let (dir, resolver) = setup();
        let target = dir.path().join(".gtkrc-2.0");
        fs::write(&target, "\n  # Created by gtksync (DO NOT EDIT!) old\nfoo\n").unwrap();
        let report = write_gtk_config(&resolver, GtkVersion::Gtk2, &sample(), "");
        assert_eq!(report.backup, None);
    }

    #[test]
    fn test_sentinel_after_non_utf8_line() {
        let (dir, resolver) = setup();
        let target = dir.path().join(".gtkrc-2.0");
        let mut contents = b"# \xff\n".to_vec();
        contents.extend_from_slice(SENTINEL.as_bytes());
        contents.push(b'\n');
        fs::write(&target, contents).unwrap();

        assert_eq!(has_sentinel(&target), Some(true));
        let report = write_gtk_config(&resolver, GtkVersion::Gtk2, &sample(), "");
        assert_eq!(report.backup, None);
        assert!(backups_in(dir.path()).is_empty());
    }

    #[test]
    fn test_written_theme_reads_back() {
        let (_dir, resolver) = setup();
        for version in [GtkVersion::Gtk2, GtkVersion::Gtk3] {
            let report = write_gtk_config(&resolver, version, &sample(), "Adwaita");
            assert_eq!(
                theme_from_file(&report.path, version).as_deref(),
                Some("Arc-Dark"),
                "GTK {version}"
            );
        }
    }

    #[test]
    fn test_unwritable_target_is_skipped() {
        let (dir, resolver) = setup();
        // A directory where the file should go cannot be opened for writing
        fs::create_dir_all(dir.path().join(".config/gtk-3.0/settings.ini")).unwrap();
        let report = write_gtk_config(&resolver, GtkVersion::Gtk3, &sample(), "");
        assert!(!report.written);
    }

    #[test]
    fn test_backup_path_format() {
        assert_eq!(
            backup_path(Path::new("/home/a/.gtkrc-2.0"), 1700000000),
            PathBuf::from("/home/a/.gtkrc-2.0-1700000000~")
        );
    }
}
