//! GTK configuration generation
//!
//! Theme discovery, reading back the active theme, projecting desktop
//! settings and writing gtkrc / settings.ini files.

use std::fmt;
use std::str::FromStr;

use anyhow::bail;

use crate::common::paths::PathResolver;

pub mod projector;
pub mod reader;
pub mod templates;
pub mod themes;
pub mod writer;

/// First line of every file this tool generates.
pub const SENTINEL: &str = "# Created by gtksync (DO NOT EDIT!)";

/// GTK config generations with an on-disk settings file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GtkVersion {
    /// gtkrc, quoted values
    Gtk2,
    /// settings.ini, `[Settings]` section
    Gtk3,
}

impl GtkVersion {
    pub fn as_str(self) -> &'static str {
        match self {
            GtkVersion::Gtk2 => "2.0",
            GtkVersion::Gtk3 => "3.0",
        }
    }

    /// Path template understood by [`PathResolver`].
    pub fn config_template(self) -> String {
        match self {
            GtkVersion::Gtk2 => "$GTK2_RC_FILES".to_string(),
            GtkVersion::Gtk3 => format!("$XDG_CONFIG_HOME/gtk-{}/settings.ini", self.as_str()),
        }
    }

    pub fn config_path(self, resolver: &PathResolver) -> std::path::PathBuf {
        resolver.resolve(&self.config_template())
    }

    /// File a theme must ship under `gtk-<version>/` to support this version.
    pub fn theme_marker_file(self) -> &'static str {
        match self {
            GtkVersion::Gtk2 => "gtkrc",
            GtkVersion::Gtk3 => "gtk.css",
        }
    }
}

impl fmt::Display for GtkVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GtkVersion {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "2" | "2.0" | "gtk2" => Ok(GtkVersion::Gtk2),
            "3" | "3.0" | "gtk3" => Ok(GtkVersion::Gtk3),
            other => bail!("unsupported GTK version '{other}' (expected 2 or 3)"),
        }
    }
}

/// Which themes a discovery scan accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeQuery {
    Version(GtkVersion),
    /// Any `gtk-*` directory shipping a `gtk.css`
    Any,
}

impl FromStr for ThemeQuery {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "any" | "*" => Ok(ThemeQuery::Any),
            other => other.parse().map(ThemeQuery::Version),
        }
    }
}

/// Everything needed to render one target file.
///
/// Rebuilt from settings on every apply cycle; `style_theme` is filled per
/// target right before that target is written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThemeConfig {
    pub style_theme: String,
    pub icon_theme: String,
    pub font_name: String,
    pub button_style: ButtonStyle,
    pub toolbar_style: ToolbarStyle,
}

impl ThemeConfig {
    pub fn with_style_theme(&self, theme: impl Into<String>) -> Self {
        Self {
            style_theme: theme.into(),
            ..self.clone()
        }
    }
}

/// Whether buttons and menus show images.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ButtonStyle {
    TextOnly,
    #[default]
    WithImages,
}

impl ButtonStyle {
    pub fn as_flag(self) -> u8 {
        match self {
            ButtonStyle::TextOnly => 0,
            ButtonStyle::WithImages => 1,
        }
    }
}

/// GTK toolbar style enumeration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ToolbarStyle {
    Icons,
    Text,
    Both,
    #[default]
    BothHoriz,
}

impl ToolbarStyle {
    pub fn as_token(self) -> &'static str {
        match self {
            ToolbarStyle::Icons => "GTK_TOOLBAR_ICONS",
            ToolbarStyle::Text => "GTK_TOOLBAR_TEXT",
            ToolbarStyle::Both => "GTK_TOOLBAR_BOTH",
            ToolbarStyle::BothHoriz => "GTK_TOOLBAR_BOTH_HORIZ",
        }
    }
}
