//! FILENAME: core/persistence/src/xlsx_writer.rs
//! PURPOSE: `SheetSink` writing a single-sheet XLSX workbook.
//! CONTEXT: Cells go to an in-memory worksheet; `finish` serializes the
//! workbook into the target writer. Native styles are `Format`s built from
//! the resolved `CellFormatSpec`.

use std::io::Write;

use fast_export::{log_debug, CellFormatSpec, CellRange, ExportError, ExportResult, SheetSink};
use report_model::{BorderEdge, BorderLineStyle, Color, TextAlign, Value, VerticalAlign};
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, FormatUnderline, Workbook, Worksheet};

use crate::error::WriterResult;
use crate::options::XlsxOptions;
use crate::CATEGORY;

/// Excel caps column widths at 255 characters.
const MAX_COLUMN_WIDTH: f64 = 255.0;

pub struct XlsxSheetSink<W: Write> {
    writer: W,
    worksheet: Option<Worksheet>,
    units_per_character: u32,
}

impl<W: Write> XlsxSheetSink<W> {
    pub fn new(writer: W, options: &XlsxOptions) -> WriterResult<Self> {
        let mut worksheet = Worksheet::new();
        worksheet.set_name(&options.sheet_name)?;
        Ok(XlsxSheetSink {
            writer,
            worksheet: Some(worksheet),
            units_per_character: options.units_per_character.max(1),
        })
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn worksheet(&mut self) -> ExportResult<&mut Worksheet> {
        self.worksheet.as_mut().ok_or_else(|| {
            ExportError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "worksheet already written",
            ))
        })
    }
}

impl<W: Write> SheetSink for XlsxSheetSink<W> {
    type Style = Format;

    fn create_style(&mut self, spec: &CellFormatSpec) -> Format {
        convert_spec_to_format(spec)
    }

    fn write_cell(&mut self, row: u32, col: u16, value: &Value, style: &Format) -> ExportResult<()> {
        let worksheet = self.worksheet()?;
        match value {
            Value::Empty => worksheet.write_blank(row, col, style),
            Value::Number(n) => worksheet.write_number_with_format(row, col, *n, style),
            Value::Text(s) => worksheet.write_string_with_format(row, col, s, style),
            Value::Boolean(b) => worksheet.write_boolean_with_format(row, col, *b, style),
        }
        .map_err(ExportError::sink)?;
        Ok(())
    }

    fn write_blank(&mut self, row: u32, col: u16, style: &Format) -> ExportResult<()> {
        self.worksheet()?
            .write_blank(row, col, style)
            .map_err(ExportError::sink)?;
        Ok(())
    }

    fn merge_cells(&mut self, range: CellRange, value: &Value, style: &Format) -> ExportResult<()> {
        // merge_range only takes text; other values overwrite the origin afterwards.
        let text = match value {
            Value::Text(s) => s.as_str(),
            _ => "",
        };
        self.worksheet()?
            .merge_range(
                range.first_row,
                range.first_col,
                range.last_row,
                range.last_col,
                text,
                style,
            )
            .map_err(ExportError::sink)?;
        match value {
            Value::Text(_) | Value::Empty => Ok(()),
            _ => self.write_cell(range.first_row, range.first_col, value, style),
        }
    }

    fn set_column_width(&mut self, col: u16, width: u32) -> ExportResult<()> {
        let characters =
            (f64::from(width) / f64::from(self.units_per_character)).min(MAX_COLUMN_WIDTH);
        self.worksheet()?
            .set_column_width(col, characters)
            .map_err(ExportError::sink)?;
        Ok(())
    }

    fn set_row_height(&mut self, row: u32, height: u32) -> ExportResult<()> {
        // Design units are 1/1000 pt.
        let points = f64::from(height) / 1000.0;
        self.worksheet()?
            .set_row_height(row, points)
            .map_err(ExportError::sink)?;
        Ok(())
    }

    fn finish(&mut self) -> ExportResult<()> {
        let Some(worksheet) = self.worksheet.take() else {
            return Ok(());
        };
        let mut workbook = Workbook::new();
        workbook.push_worksheet(worksheet);
        let buffer = workbook.save_to_buffer().map_err(ExportError::sink)?;
        self.writer.write_all(&buffer)?;
        self.writer.flush()?;
        log_debug!(CATEGORY, "xlsx workbook written: {} byte(s)", buffer.len());
        Ok(())
    }
}

fn convert_spec_to_format(spec: &CellFormatSpec) -> Format {
    let mut format = Format::new();

    // Font settings
    if spec.bold {
        format = format.set_bold();
    }
    if spec.italic {
        format = format.set_italic();
    }
    if spec.underline {
        format = format.set_underline(FormatUnderline::Single);
    }
    format = format.set_font_size(f64::from(spec.font_size));
    format = format.set_font_name(&spec.font_name);

    // Colors
    if spec.text_color != Color::black() && !spec.text_color.is_transparent() {
        format = format.set_font_color(color_to_xlsx(&spec.text_color));
    }
    if !spec.fill.is_transparent() {
        format = format.set_background_color(color_to_xlsx(&spec.fill));
    }

    format = format.set_align(match spec.h_align {
        TextAlign::Left => FormatAlign::Left,
        TextAlign::Center => FormatAlign::Center,
        TextAlign::Right => FormatAlign::Right,
        TextAlign::Justify => FormatAlign::Justify,
    });
    format = format.set_align(match spec.v_align {
        VerticalAlign::Top => FormatAlign::Top,
        VerticalAlign::Middle => FormatAlign::VerticalCenter,
        VerticalAlign::Bottom => FormatAlign::Bottom,
    });

    if spec.wrap_text {
        format = format.set_text_wrap();
    }
    if !spec.number_format.is_empty() {
        format = format.set_num_format(&spec.number_format);
    }

    // Borders
    if spec.border_top.is_visible() {
        format = format
            .set_border_top(border_to_xlsx(&spec.border_top))
            .set_border_top_color(color_to_xlsx(&spec.border_top.color));
    }
    if spec.border_right.is_visible() {
        format = format
            .set_border_right(border_to_xlsx(&spec.border_right))
            .set_border_right_color(color_to_xlsx(&spec.border_right.color));
    }
    if spec.border_bottom.is_visible() {
        format = format
            .set_border_bottom(border_to_xlsx(&spec.border_bottom))
            .set_border_bottom_color(color_to_xlsx(&spec.border_bottom.color));
    }
    if spec.border_left.is_visible() {
        format = format
            .set_border_left(border_to_xlsx(&spec.border_left))
            .set_border_left_color(color_to_xlsx(&spec.border_left.color));
    }

    format
}

fn border_to_xlsx(edge: &BorderEdge) -> FormatBorder {
    match (edge.style, edge.width) {
        (BorderLineStyle::None, _) | (_, 0) => FormatBorder::None,
        (BorderLineStyle::Solid, 1) => FormatBorder::Thin,
        (BorderLineStyle::Solid, 2) => FormatBorder::Medium,
        (BorderLineStyle::Solid, _) => FormatBorder::Thick,
        (BorderLineStyle::Dashed, 1) => FormatBorder::Dashed,
        (BorderLineStyle::Dashed, _) => FormatBorder::MediumDashed,
        (BorderLineStyle::Dotted, _) => FormatBorder::Dotted,
        (BorderLineStyle::Double, _) => FormatBorder::Double,
    }
}

fn color_to_xlsx(color: &Color) -> rust_xlsxwriter::Color {
    rust_xlsxwriter::Color::RGB(color.to_rgb())
}
