//! Renderers for the three generated file formats
//!
//! All three share the same values; only layout and quoting differ.

use super::{GtkVersion, SENTINEL, ThemeConfig};

/// gtkrc for GTK 2. String values are quoted, the toolbar style is an enum
/// identifier and stays bare.
pub fn render_gtk2(config: &ThemeConfig, cursor_theme: &str) -> String {
    let images = config.button_style.as_flag();
    format!(
        "{SENTINEL}\n\
         gtk-theme-name = \"{theme}\"\n\
         gtk-icon-theme-name = \"{icons}\"\n\
         gtk-font-name = \"{font}\"\n\
         gtk-button-images = {images}\n\
         gtk-menu-images = {images}\n\
         gtk-toolbar-style = {toolbar}\n\
         gtk-cursor-theme-name = \"{cursor_theme}\"\n",
        theme = config.style_theme,
        icons = config.icon_theme,
        font = config.font_name,
        toolbar = config.toolbar_style.as_token(),
    )
}

/// settings.ini for GTK 3. GKeyFile keeps quotes literally, so nothing is
/// quoted.
pub fn render_gtk3(config: &ThemeConfig, cursor_theme: &str) -> String {
    let images = config.button_style.as_flag();
    format!(
        "{SENTINEL}\n\
         [Settings]\n\
         gtk-theme-name = {theme}\n\
         gtk-icon-theme-name = {icons}\n\
         # GTK3 ignores bold or italic attributes.\n\
         gtk-font-name = {font}\n\
         gtk-menu-images = {images}\n\
         gtk-button-images = {images}\n\
         gtk-toolbar-style = {toolbar}\n\
         gtk-cursor-theme-name = {cursor_theme}\n",
        theme = config.style_theme,
        icons = config.icon_theme,
        font = config.font_name,
        toolbar = config.toolbar_style.as_token(),
    )
}

/// xsettingsd configuration. Strings quoted, integers bare.
pub fn render_xsettings(config: &ThemeConfig, cursor_theme: &str) -> String {
    let images = config.button_style.as_flag();
    format!(
        "{SENTINEL}\n\
         Net/IconThemeName \"{icons}\"\n\
         Net/ThemeName \"{theme}\"\n\
         Gtk/FontName \"{font}\"\n\
         Gtk/MenuImages {images}\n\
         Gtk/ButtonImages {images}\n\
         Gtk/ToolbarStyle \"{toolbar}\"\n\
         Gtk/CursorThemeName \"{cursor_theme}\"\n",
        theme = config.style_theme,
        icons = config.icon_theme,
        font = config.font_name,
        toolbar = config.toolbar_style.as_token(),
    )
}

pub fn render_gtk(version: GtkVersion, config: &ThemeConfig, cursor_theme: &str) -> String {
    match version {
        GtkVersion::Gtk2 => render_gtk2(config, cursor_theme),
        GtkVersion::Gtk3 => render_gtk3(config, cursor_theme),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gtk::{ButtonStyle, ToolbarStyle};

    fn sample() -> ThemeConfig {
        ThemeConfig {
            style_theme: "Arc".into(),
            icon_theme: "Adwaita".into(),
            font_name: "Sans 10".into(),
            button_style: ButtonStyle::WithImages,
            toolbar_style: ToolbarStyle::Icons,
        }
    }

    #[test]
    fn test_gtk2_layout() {
        let text = render_gtk2(&sample(), "breeze_cursors");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                SENTINEL,
                "gtk-theme-name = \"Arc\"",
                "gtk-icon-theme-name = \"Adwaita\"",
                "gtk-font-name = \"Sans 10\"",
                "gtk-button-images = 1",
                "gtk-menu-images = 1",
                "gtk-toolbar-style = GTK_TOOLBAR_ICONS",
                "gtk-cursor-theme-name = \"breeze_cursors\"",
            ]
        );
    }

    #[test]
    fn test_gtk3_is_unquoted_in_settings_section() {
        let config = ThemeConfig {
            button_style: ButtonStyle::TextOnly,
            toolbar_style: ToolbarStyle::Text,
            ..sample()
        };
        let text = render_gtk3(&config, "Adwaita");
        assert!(text.starts_with(&format!("{SENTINEL}\n[Settings]\n")));
        assert!(text.contains("gtk-theme-name = Arc\n"));
        assert!(text.contains("gtk-font-name = Sans 10\n"));
        assert!(text.contains("gtk-menu-images = 0\n"));
        assert!(text.contains("gtk-button-images = 0\n"));
        assert!(text.contains("gtk-toolbar-style = GTK_TOOLBAR_TEXT\n"));
        assert!(!text.contains('"'));
    }

    #[test]
    fn test_xsettings_layout() {
        let text = render_xsettings(&sample(), "Adwaita");
        assert!(text.contains("Net/ThemeName \"Arc\"\n"));
        assert!(text.contains("Net/IconThemeName \"Adwaita\"\n"));
        assert!(text.contains("Gtk/FontName \"Sans 10\"\n"));
        assert!(text.contains("Gtk/ButtonImages 1\n"));
        assert!(text.contains("Gtk/ToolbarStyle \"GTK_TOOLBAR_ICONS\"\n"));
        assert!(text.contains("Gtk/CursorThemeName \"Adwaita\"\n"));
    }

    #[test]
    fn test_rendering_is_pure() {
        let config = sample();
        assert_eq!(render_gtk3(&config, "x"), render_gtk3(&config, "x"));
        assert_eq!(render_gtk(GtkVersion::Gtk2, &config, "x"), render_gtk2(&config, "x"));
    }
}
