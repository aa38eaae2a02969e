//! FILENAME: core/fast-export/src/sink.rs
//! PURPOSE: Low-level writer interfaces the templates emit to.
//! CONTEXT: Concrete sinks (CSV bytes, XLSX workbook) live in the persistence
//! crate. Templates only see these traits.

use report_model::{
    BorderEdge, Color, StyleKey, StyleSheet, StyleValue, TextAlign, Value, VerticalAlign,
};

use crate::error::ExportResult;
use crate::snapshot::StyleSnapshot;

/// Field-oriented text output (CSV and similar).
pub trait TextSink {
    fn write_field(&mut self, text: &str) -> ExportResult<()>;

    fn write_empty_field(&mut self) -> ExportResult<()>;

    /// Terminates the current record.
    fn end_record(&mut self) -> ExportResult<()>;

    fn flush(&mut self) -> ExportResult<()>;
}

/// A rectangular cell range, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRange {
    pub first_row: u32,
    pub first_col: u16,
    pub last_row: u32,
    pub last_col: u16,
}

/// Cell-oriented spreadsheet output.
pub trait SheetSink {
    /// Native style handle.
    type Style;

    fn create_style(&mut self, spec: &CellFormatSpec) -> Self::Style;

    fn write_cell(&mut self, row: u32, col: u16, value: &Value, style: &Self::Style)
        -> ExportResult<()>;

    fn write_blank(&mut self, row: u32, col: u16, style: &Self::Style) -> ExportResult<()>;

    fn merge_cells(&mut self, range: CellRange, value: &Value, style: &Self::Style)
        -> ExportResult<()>;

    /// Width in design units (1/1000 pt).
    fn set_column_width(&mut self, col: u16, width: u32) -> ExportResult<()>;

    /// Height in design units (1/1000 pt).
    fn set_row_height(&mut self, row: u32, height: u32) -> ExportResult<()>;

    fn finish(&mut self) -> ExportResult<()>;
}

// ============================================================================
// RESOLVED CELL FORMAT
// ============================================================================

/// Everything a sink needs to build a native cell style.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CellFormatSpec {
    pub font_name: String,
    pub font_size: u8,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub text_color: Color,
    pub fill: Color,
    pub h_align: TextAlign,
    pub v_align: VerticalAlign,
    pub number_format: String,
    pub wrap_text: bool,
    pub border_top: BorderEdge,
    pub border_right: BorderEdge,
    pub border_bottom: BorderEdge,
    pub border_left: BorderEdge,
}

impl Default for CellFormatSpec {
    fn default() -> Self {
        CellFormatSpec::resolve(&StyleSnapshot::default(), &StyleSheet::default())
    }
}

impl CellFormatSpec {
    /// Dynamic values win over the element's design style, which wins over
    /// the key defaults.
    pub fn resolve(snapshot: &StyleSnapshot, style: &StyleSheet) -> Self {
        let get = |key: StyleKey| -> StyleValue {
            snapshot.get(key).cloned().unwrap_or_else(|| style.get(key))
        };
        let border = |key: StyleKey| get(key).as_border().unwrap_or_else(BorderEdge::none);

        CellFormatSpec {
            font_name: get(StyleKey::FontName)
                .as_text()
                .unwrap_or("Arial")
                .to_string(),
            font_size: get(StyleKey::FontSize).as_size().unwrap_or(10),
            bold: get(StyleKey::Bold).as_bool().unwrap_or(false),
            italic: get(StyleKey::Italic).as_bool().unwrap_or(false),
            underline: get(StyleKey::Underline).as_bool().unwrap_or(false),
            text_color: get(StyleKey::TextColor).as_color().unwrap_or_default(),
            fill: get(StyleKey::BackgroundColor)
                .as_color()
                .unwrap_or_else(Color::transparent),
            h_align: get(StyleKey::HAlign).as_align().unwrap_or_default(),
            v_align: get(StyleKey::VAlign).as_valign().unwrap_or_default(),
            number_format: get(StyleKey::NumberFormat)
                .as_text()
                .unwrap_or_default()
                .to_string(),
            wrap_text: get(StyleKey::WrapText).as_bool().unwrap_or(false),
            border_top: border(StyleKey::BorderTop),
            border_right: border(StyleKey::BorderRight),
            border_bottom: border(StyleKey::BorderBottom),
            border_left: border(StyleKey::BorderLeft),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_spec_uses_key_defaults() {
        let spec = CellFormatSpec::default();
        assert_eq!(spec.font_name, "Arial");
        assert_eq!(spec.font_size, 10);
        assert!(spec.fill.is_transparent());
        assert!(!spec.border_top.is_visible());
    }

    #[test]
    fn test_design_style_is_used_without_snapshot() {
        let style = StyleSheet::new()
            .with(StyleKey::Bold, StyleValue::Bool(true))
            .with(StyleKey::BorderTop, StyleValue::Border(BorderEdge::solid(1, Color::black())));
        let spec = CellFormatSpec::resolve(&StyleSnapshot::default(), &style);
        assert!(spec.bold);
        assert!(spec.border_top.is_visible());
    }
}
