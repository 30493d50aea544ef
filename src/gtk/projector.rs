//! Project desktop settings into a [`ThemeConfig`]
//!
//! Fonts arrive in Qt's serialized form and leave as a Pango description.
//! Toolbar styles are mapped through a fixed table.

use thiserror::Error;

use crate::settings::store::{self, SettingsStore};
use crate::ui::prelude::*;

use super::{ButtonStyle, ThemeConfig, ToolbarStyle};

const DEFAULT_FAMILY: &str = "Sans";
const DEFAULT_POINT_SIZE: u32 = 10;

#[derive(Error, Debug, PartialEq)]
pub enum FontError {
    #[error("font descriptor is empty")]
    Empty,

    #[error("font descriptor has {0} fields")]
    FieldCount(usize),

    #[error("invalid {field} '{value}' in font descriptor")]
    InvalidField { field: &'static str, value: String },
}

/// The parts of a font GTK can express.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub family: String,
    pub point_size: f64,
    pub italic: bool,
    pub bold: bool,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            family: DEFAULT_FAMILY.to_string(),
            point_size: f64::from(DEFAULT_POINT_SIZE),
            italic: false,
            bold: false,
        }
    }
}

impl FontSpec {
    /// Parse a font descriptor.
    ///
    /// Comma separated input is Qt's `QFont::toString()` layout:
    /// `family,pointSize,pixelSize,styleHint,weight,style,...`. Qt 5 writes 10
    /// or 11 fields with weights on the 0-99 scale (normal = 50), Qt 6 writes
    /// 16 or 17 with weights on the 1-1000 scale (normal = 400). Anything
    /// without a comma is read as `Family [Italic] [Bold] size`.
    pub fn parse(descriptor: &str) -> Result<Self, FontError> {
        let descriptor = descriptor.trim();
        if descriptor.is_empty() {
            return Err(FontError::Empty);
        }
        if descriptor.contains(',') {
            Self::parse_qt(descriptor)
        } else {
            Self::parse_pango(descriptor)
        }
    }

    fn parse_qt(descriptor: &str) -> Result<Self, FontError> {
        let fields: Vec<&str> = descriptor.split(',').collect();
        let count = fields.len();
        if (count > 2 && count < 9) || count > 17 {
            return Err(FontError::FieldCount(count));
        }

        let family = fields[0].trim();
        if family.is_empty() {
            return Err(FontError::Empty);
        }

        let mut spec = FontSpec {
            family: family.to_string(),
            ..Default::default()
        };

        if let Some(size) = fields.get(1) {
            let size: f64 = parse_field("point size", size)?;
            // Qt stores -1 when the font is sized in pixels
            if size > 0.0 && size.is_finite() {
                spec.point_size = size;
            }
        }

        if count >= 9 {
            let weight: i64 = parse_field("weight", fields[4])?;
            let normal = if count >= 16 { 400 } else { 50 };
            spec.bold = weight != normal;

            let style: i64 = parse_field("style", fields[5])?;
            spec.italic = style != 0;
        }

        Ok(spec)
    }

    fn parse_pango(descriptor: &str) -> Result<Self, FontError> {
        let mut words: Vec<&str> = descriptor.split_whitespace().collect();
        let mut spec = FontSpec::default();

        if let Some(last) = words.last()
            && let Ok(size) = last.parse::<f64>()
        {
            if size <= 0.0 || !size.is_finite() {
                return Err(FontError::InvalidField {
                    field: "point size",
                    value: last.to_string(),
                });
            }
            spec.point_size = size;
            words.pop();
        }

        while let Some(last) = words.last() {
            match last.to_ascii_lowercase().as_str() {
                "italic" | "oblique" => spec.italic = true,
                "bold" => spec.bold = true,
                _ => break,
            }
            words.pop();
        }

        if words.is_empty() {
            return Err(FontError::Empty);
        }
        spec.family = words.join(" ");
        Ok(spec)
    }

    /// `"<family>[ Italic][ Bold] <size>"`
    pub fn to_gtk_name(&self) -> String {
        format!(
            "{}{}{} {}",
            self.family,
            if self.italic { " Italic" } else { "" },
            if self.bold { " Bold" } else { "" },
            self.point_size.round() as i64
        )
    }
}

fn parse_field<T: std::str::FromStr>(field: &'static str, value: &str) -> Result<T, FontError> {
    value.trim().parse().map_err(|_| FontError::InvalidField {
        field,
        value: value.to_string(),
    })
}

/// Map a toolbar style token to GTK's toolbar style and button images flag.
///
/// GTK only knows "show text" and "show images", so the five desktop styles
/// collapse onto four GTK values. Text beside icon, follow-style and unknown
/// tokens all become `GTK_TOOLBAR_BOTH_HORIZ`. That loss is intentional.
pub fn map_toolbar_style(token: &str) -> (ToolbarStyle, ButtonStyle) {
    match token.trim() {
        "ToolButtonIconOnly" | "icon-only" => (ToolbarStyle::Icons, ButtonStyle::WithImages),
        "ToolButtonTextOnly" | "text-only" => (ToolbarStyle::Text, ButtonStyle::TextOnly),
        "ToolButtonTextUnderIcon" | "text-under-icon" => {
            (ToolbarStyle::Both, ButtonStyle::WithImages)
        }
        _ => (ToolbarStyle::BothHoriz, ButtonStyle::WithImages),
    }
}

/// Build the theme config from the desktop settings store.
///
/// `style_theme` is left empty; callers fill it per target file.
pub fn project(desktop: &SettingsStore) -> ThemeConfig {
    let descriptor = desktop.string(store::FONT);
    let font = FontSpec::parse(&descriptor).unwrap_or_else(|e| {
        emit(
            Level::Warn,
            "gtk.font.invalid",
            &format!("Ignoring font '{descriptor}': {e}"),
            None,
        );
        FontSpec::default()
    });

    let (toolbar_style, button_style) = map_toolbar_style(&desktop.string(store::TOOL_BUTTON_STYLE));

    ThemeConfig {
        style_theme: String::new(),
        icon_theme: desktop.string(store::ICON_THEME),
        font_name: font.to_gtk_name(),
        button_style,
        toolbar_style,
    }
}
