//! FILENAME: core/report-model/src/style.rs
//! PURPOSE: Defines style keys, style values and the static design-time style sheet.
//! CONTEXT: Every element carries a `StyleSheet` with the values chosen at design
//! time. Style expressions target keys by their registered name; the run-time
//! values live in `ComputedStyleTable` (see computed.rs).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Horizontal alignment options for element content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

/// Vertical alignment options for element content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum VerticalAlign {
    #[default]
    Top,
    Middle,
    Bottom,
}

/// RGB color representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8, // Alpha channel (255 = opaque, 0 = no paint)
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, a: 255 }
    }

    pub const fn with_alpha(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color { r, g, b, a }
    }

    pub const fn black() -> Self {
        Color::new(0, 0, 0)
    }

    pub const fn white() -> Self {
        Color::new(255, 255, 255)
    }

    pub const fn transparent() -> Self {
        Color::with_alpha(0, 0, 0, 0)
    }

    /// Returns true when painting this color has no visible effect.
    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// Hex form without alpha, e.g. `#ff0000`.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Packed 0xRRGGBB value, as spreadsheet writers expect it.
    pub fn to_rgb(&self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | (self.b as u32)
    }

    /// Parse from hex string (e.g., "#FF0000" or "FF0000").
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        if hex.len() == 6 {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Color::new(r, g, b))
        } else if hex.len() == 8 {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            let a = u8::from_str_radix(&hex[6..8], 16).ok()?;
            Some(Color::with_alpha(r, g, b, a))
        } else {
            None
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::black()
    }
}

/// Line style for borders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BorderLineStyle {
    #[default]
    None,
    Solid,
    Dashed,
    Dotted,
    Double,
}

/// Border style for a single edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct BorderEdge {
    pub width: u8, // 0 = no border, 1 = thin, 2 = medium, 3 = thick
    pub color: Color,
    pub style: BorderLineStyle,
}

impl BorderEdge {
    pub const fn none() -> Self {
        BorderEdge {
            width: 0,
            color: Color::black(),
            style: BorderLineStyle::None,
        }
    }

    pub const fn solid(width: u8, color: Color) -> Self {
        BorderEdge {
            width,
            color,
            style: BorderLineStyle::Solid,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.width > 0 && self.style != BorderLineStyle::None
    }
}

// ============================================================================
// STYLE KEYS
// ============================================================================

/// The registered style properties. Style expressions refer to these by name.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum StyleKey {
    Visible,
    BackgroundColor,
    TextColor,
    FontName,
    FontSize,
    Bold,
    Italic,
    Underline,
    HAlign,
    VAlign,
    NumberFormat,
    WrapText,
    BorderTop,
    BorderRight,
    BorderBottom,
    BorderLeft,
}

impl StyleKey {
    pub const ALL: [StyleKey; 16] = [
        StyleKey::Visible,
        StyleKey::BackgroundColor,
        StyleKey::TextColor,
        StyleKey::FontName,
        StyleKey::FontSize,
        StyleKey::Bold,
        StyleKey::Italic,
        StyleKey::Underline,
        StyleKey::HAlign,
        StyleKey::VAlign,
        StyleKey::NumberFormat,
        StyleKey::WrapText,
        StyleKey::BorderTop,
        StyleKey::BorderRight,
        StyleKey::BorderBottom,
        StyleKey::BorderLeft,
    ];

    /// The registered name used in report definitions.
    pub fn name(&self) -> &'static str {
        match self {
            StyleKey::Visible => "visible",
            StyleKey::BackgroundColor => "background-color",
            StyleKey::TextColor => "text-color",
            StyleKey::FontName => "font-name",
            StyleKey::FontSize => "font-size",
            StyleKey::Bold => "bold",
            StyleKey::Italic => "italic",
            StyleKey::Underline => "underline",
            StyleKey::HAlign => "h-align",
            StyleKey::VAlign => "v-align",
            StyleKey::NumberFormat => "number-format",
            StyleKey::WrapText => "wrap-text",
            StyleKey::BorderTop => "border-top",
            StyleKey::BorderRight => "border-right",
            StyleKey::BorderBottom => "border-bottom",
            StyleKey::BorderLeft => "border-left",
        }
    }

    /// Looks up a key by its registered name. Returns None for unknown names.
    pub fn from_name(name: &str) -> Option<StyleKey> {
        StyleKey::ALL.iter().copied().find(|key| key.name() == name)
    }

    /// The value an element has when neither its design style nor an
    /// expression sets this key.
    pub fn default_value(&self) -> StyleValue {
        match self {
            StyleKey::Visible => StyleValue::Bool(true),
            StyleKey::BackgroundColor => StyleValue::Color(Color::transparent()),
            StyleKey::TextColor => StyleValue::Color(Color::black()),
            StyleKey::FontName => StyleValue::Text("Arial".to_string()),
            StyleKey::FontSize => StyleValue::Size(10),
            StyleKey::Bold | StyleKey::Italic | StyleKey::Underline | StyleKey::WrapText => {
                StyleValue::Bool(false)
            }
            StyleKey::HAlign => StyleValue::Align(TextAlign::Left),
            StyleKey::VAlign => StyleValue::VAlign(VerticalAlign::Top),
            StyleKey::NumberFormat => StyleValue::Text(String::new()),
            StyleKey::BorderTop
            | StyleKey::BorderRight
            | StyleKey::BorderBottom
            | StyleKey::BorderLeft => StyleValue::Border(BorderEdge::none()),
        }
    }

    /// Parses a textual property (as found in expression parameters) into a
    /// value of the kind this key holds.
    pub fn parse_value(&self, text: &str) -> Option<StyleValue> {
        let text = text.trim();
        match self.default_value() {
            StyleValue::Bool(_) => match text.to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => Some(StyleValue::Bool(true)),
                "false" | "0" | "no" => Some(StyleValue::Bool(false)),
                _ => None,
            },
            StyleValue::Color(_) => Color::from_hex(text).map(StyleValue::Color),
            StyleValue::Text(_) => Some(StyleValue::Text(text.to_string())),
            StyleValue::Size(_) => text.parse().ok().map(StyleValue::Size),
            StyleValue::Align(_) => match text.to_ascii_lowercase().as_str() {
                "left" => Some(StyleValue::Align(TextAlign::Left)),
                "center" => Some(StyleValue::Align(TextAlign::Center)),
                "right" => Some(StyleValue::Align(TextAlign::Right)),
                "justify" => Some(StyleValue::Align(TextAlign::Justify)),
                _ => None,
            },
            StyleValue::VAlign(_) => match text.to_ascii_lowercase().as_str() {
                "top" => Some(StyleValue::VAlign(VerticalAlign::Top)),
                "middle" => Some(StyleValue::VAlign(VerticalAlign::Middle)),
                "bottom" => Some(StyleValue::VAlign(VerticalAlign::Bottom)),
                _ => None,
            },
            StyleValue::Border(_) => {
                let width: u8 = text.parse().ok()?;
                Some(StyleValue::Border(if width == 0 {
                    BorderEdge::none()
                } else {
                    BorderEdge::solid(width, Color::black())
                }))
            }
        }
    }
}

impl fmt::Display for StyleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// STYLE VALUES
// ============================================================================

/// A single resolved style value. Compared and hashed by value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StyleValue {
    Bool(bool),
    Color(Color),
    Text(String),
    Size(u8), // Font size in points
    Align(TextAlign),
    VAlign(VerticalAlign),
    Border(BorderEdge),
}

impl StyleValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            StyleValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Color> {
        match self {
            StyleValue::Color(c) => Some(*c),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            StyleValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_size(&self) -> Option<u8> {
        match self {
            StyleValue::Size(s) => Some(*s),
            _ => None,
        }
    }

    pub fn as_align(&self) -> Option<TextAlign> {
        match self {
            StyleValue::Align(a) => Some(*a),
            _ => None,
        }
    }

    pub fn as_valign(&self) -> Option<VerticalAlign> {
        match self {
            StyleValue::VAlign(a) => Some(*a),
            _ => None,
        }
    }

    pub fn as_border(&self) -> Option<BorderEdge> {
        match self {
            StyleValue::Border(b) => Some(*b),
            _ => None,
        }
    }
}

// ============================================================================
// STATIC STYLE SHEET
// ============================================================================

/// Design-time style of one element. Keys that are not set resolve to
/// `StyleKey::default_value()`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StyleSheet {
    #[serde(default)]
    values: BTreeMap<StyleKey, StyleValue>,
}

impl StyleSheet {
    pub fn new() -> Self {
        StyleSheet::default()
    }

    /// Resolved value for `key`, falling back to the key's default.
    pub fn get(&self, key: StyleKey) -> StyleValue {
        self.values
            .get(&key)
            .cloned()
            .unwrap_or_else(|| key.default_value())
    }

    /// The explicitly set value, if any.
    pub fn get_defined(&self, key: StyleKey) -> Option<&StyleValue> {
        self.values.get(&key)
    }

    pub fn set(&mut self, key: StyleKey, value: StyleValue) {
        self.values.insert(key, value);
    }

    pub fn with(mut self, key: StyleKey, value: StyleValue) -> Self {
        self.set(key, value);
        self
    }

    /// Iterates explicitly defined values in key order.
    pub fn defined(&self) -> impl Iterator<Item = (StyleKey, &StyleValue)> {
        self.values.iter().map(|(k, v)| (*k, v))
    }

    pub fn is_visible(&self) -> bool {
        self.get(StyleKey::Visible).as_bool().unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_from_hex() {
        let color = Color::from_hex("#FF0000").unwrap();
        assert_eq!(color, Color::new(255, 0, 0));
        assert_eq!(color.to_hex(), "#ff0000");
        assert_eq!(color.to_rgb(), 0xFF0000);

        let with_alpha = Color::from_hex("00FF0080").unwrap();
        assert_eq!(with_alpha.a, 0x80);
        assert!(Color::from_hex("#12").is_none());
    }

    #[test]
    fn test_color_from_hex_rejects_non_hex_text() {
        assert!(Color::from_hex("aé123").is_none());
        assert!(Color::from_hex("#ééé").is_none());
        assert!(Color::from_hex("+F+F+F").is_none());
        assert_eq!(StyleKey::BackgroundColor.parse_value("aé123"), None);
    }

    #[test]
    fn test_style_key_names_round_trip() {
        for key in StyleKey::ALL {
            assert_eq!(StyleKey::from_name(key.name()), Some(key));
        }
        assert_eq!(StyleKey::from_name("min-width"), None);
    }

    #[test]
    fn test_parse_value_matches_key_kind() {
        assert_eq!(
            StyleKey::BackgroundColor.parse_value("#E0E0E0"),
            Some(StyleValue::Color(Color::new(0xE0, 0xE0, 0xE0)))
        );
        assert_eq!(StyleKey::Visible.parse_value("false"), Some(StyleValue::Bool(false)));
        assert_eq!(StyleKey::FontSize.parse_value("12"), Some(StyleValue::Size(12)));
        assert_eq!(StyleKey::HAlign.parse_value("diagonal"), None);
    }

    #[test]
    fn test_style_sheet_falls_back_to_defaults() {
        let sheet = StyleSheet::new().with(StyleKey::Bold, StyleValue::Bool(true));
        assert_eq!(sheet.get(StyleKey::Bold), StyleValue::Bool(true));
        assert_eq!(sheet.get(StyleKey::Italic), StyleValue::Bool(false));
        assert!(sheet.is_visible());
        assert!(sheet.get_defined(StyleKey::Italic).is_none());
    }
}
