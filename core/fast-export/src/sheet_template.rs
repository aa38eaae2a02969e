//! FILENAME: core/fast-export/src/sheet_template.rs
//! PURPOSE: Template writing bands as spreadsheet cells.
//! CONTEXT: Each written band is laid out on the shared column grid and
//! appended below the previous one. Span origins carry the value (merged when
//! the element spans several cells); covered cells get blank cells so that
//! borders and fill cover the whole span. Native styles come from the
//! `CellStyleCache`.

use std::rc::Rc;

use report_model::{Band, Color, ElementId, Report};

use crate::cell_style::{CellBackground, CellStyleCache, CellStyleKey};
use crate::context::RuntimeContext;
use crate::error::{ExportError, ExportResult};
use crate::layout::{placed_leaves, ColumnBreaks, GridLayout, GridSlot, PlacedLeaf, Span};
use crate::logging::CATEGORY;
use crate::sink::{CellFormatSpec, CellRange, SheetSink};
use crate::snapshot::{StyleChangeCache, StyleSnapshot};
use crate::template::Template;

pub struct SpreadsheetTemplate<S: SheetSink> {
    sink: S,
    columns: ColumnBreaks,
    changes: StyleChangeCache,
    styles: CellStyleCache<S::Style>,
    row_cursor: u32,
    measurement_pass: bool,
    finished: bool,
}

/// An element of the band being written, with its resolved styling.
struct BandLeaf<'a> {
    placed: PlacedLeaf<'a>,
    snapshot: Rc<StyleSnapshot>,
    spec: CellFormatSpec,
}

impl<S: SheetSink> SpreadsheetTemplate<S> {
    pub fn new(sink: S) -> Self {
        SpreadsheetTemplate {
            sink,
            columns: ColumnBreaks::from_edges([]),
            changes: StyleChangeCache::new(),
            styles: CellStyleCache::new(),
            row_cursor: 0,
            measurement_pass: false,
            finished: false,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Native styles constructed so far.
    pub fn styles_constructed(&self) -> usize {
        self.styles.constructed()
    }

    /// Sheet rows written so far.
    pub fn rows_written(&self) -> u32 {
        self.row_cursor
    }

    fn element_style(
        &mut self,
        fallback: ElementId,
        entry: &BandLeaf<'_>,
        background: CellBackground,
    ) -> Rc<S::Style> {
        let key = CellStyleKey::new(fallback, Some(entry.placed.leaf), background)
            .with_styling(&entry.snapshot);
        let mut spec = entry.spec.clone();
        background.apply_to(&mut spec);
        let sink = &mut self.sink;
        self.styles.get_or_create(key, || sink.create_style(&spec))
    }

    fn fill_style(
        &mut self,
        band: ElementId,
        band_snapshot: &StyleSnapshot,
        fill: Color,
    ) -> Rc<S::Style> {
        let background = CellBackground::filled(fill);
        let key = CellStyleKey::new(band, None, background).with_styling(band_snapshot);
        let mut spec = CellFormatSpec::default();
        background.apply_to(&mut spec);
        let sink = &mut self.sink;
        self.styles.get_or_create(key, || sink.create_style(&spec))
    }
}

/// Sheet row `offset` rows below `top`; fails instead of wrapping.
fn row_at(top: u32, offset: usize) -> ExportResult<u32> {
    u32::try_from(offset)
        .ok()
        .and_then(|offset| top.checked_add(offset))
        .ok_or_else(|| out_of_range("row", offset))
}

fn col_at(col: usize) -> ExportResult<u16> {
    u16::try_from(col).map_err(|_| out_of_range("column", col))
}

fn out_of_range(what: &str, index: usize) -> ExportError {
    ExportError::Sink(format!("sheet {} {} is out of range", what, index).into())
}

fn cell_range(top: u32, span: &Span) -> ExportResult<CellRange> {
    Ok(CellRange {
        first_row: row_at(top, span.row)?,
        first_col: col_at(span.col)?,
        last_row: row_at(top, span.last_row())?,
        last_col: col_at(span.last_col())?,
    })
}

impl<S: SheetSink> Template for SpreadsheetTemplate<S> {
    fn initialize(
        &mut self,
        report: &Report,
        _ctx: &RuntimeContext<'_>,
        is_measurement_pass: bool,
    ) -> ExportResult<()> {
        self.columns = ColumnBreaks::from_report(report);
        self.changes.clear();
        self.row_cursor = 0;
        self.measurement_pass = is_measurement_pass;
        self.finished = false;
        if is_measurement_pass {
            return Ok(());
        }

        for (col, width) in self.columns.widths().enumerate() {
            self.sink.set_column_width(col_at(col)?, width)?;
        }
        log_debug!(
            CATEGORY,
            "spreadsheet template for '{}': {} column(s)",
            report.name,
            self.columns.column_count()
        );
        Ok(())
    }

    fn write(&mut self, band: &Band, ctx: &RuntimeContext<'_>) -> ExportResult<()> {
        if self.measurement_pass {
            return Ok(());
        }

        let band_snapshot =
            self.changes
                .snapshot(band.id, ctx.dynamic_keys(band.id, band.id), ctx.styles);
        let band_fill = CellFormatSpec::resolve(&band_snapshot, &band.style).fill;

        let mut leaves = Vec::new();
        for placed in placed_leaves(band) {
            let keys = ctx.dynamic_keys(band.id, placed.leaf.id);
            let snapshot = self.changes.snapshot(placed.leaf.id, keys, ctx.styles);
            let mut spec = CellFormatSpec::resolve(&snapshot, &placed.leaf.style);
            if spec.fill.is_transparent() {
                spec.fill = band_fill;
            }
            leaves.push(BandLeaf {
                placed,
                snapshot,
                spec,
            });
        }

        let bounds: Vec<_> = leaves.iter().map(|entry| entry.placed.bounds).collect();
        // Hidden elements keep their rows; their cells are treated as empty.
        let layout = GridLayout::build_masked(&self.columns, &bounds, |item| {
            leaves[item].snapshot.is_visible()
        });
        let top = self.row_cursor;

        for row in 0..layout.rows() {
            let sheet_row = row_at(top, row)?;
            self.sink.set_row_height(sheet_row, layout.row_height(row))?;

            for col in 0..layout.columns() {
                let sheet_col = col_at(col)?;
                match layout.slot(row, col) {
                    GridSlot::Origin(item) => {
                        let (Some(span), Some(entry)) = (layout.span_of(item), leaves.get(item))
                        else {
                            continue;
                        };
                        let leaf = entry.placed.leaf;
                        let background = CellBackground::from_spec(&entry.spec).for_position(
                            0,
                            0,
                            span.row_span,
                            span.col_span,
                        );
                        let style = self.element_style(band.id, entry, background);
                        let value = ctx.value_of(leaf);
                        if span.is_merged() {
                            self.sink.merge_cells(cell_range(top, span)?, &value, &style)?;
                        } else {
                            self.sink.write_cell(sheet_row, sheet_col, &value, &style)?;
                        }
                    }
                    GridSlot::Covered(item) => {
                        let (Some(span), Some(entry)) = (layout.span_of(item), leaves.get(item))
                        else {
                            continue;
                        };
                        let background = CellBackground::from_spec(&entry.spec).for_position(
                            row - span.row,
                            col - span.col,
                            span.row_span,
                            span.col_span,
                        );
                        let style = self.element_style(band.id, entry, background);
                        self.sink.write_blank(sheet_row, sheet_col, &style)?;
                    }
                    GridSlot::Empty => {
                        if band_fill.is_transparent() {
                            continue;
                        }
                        let style = self.fill_style(band.id, &band_snapshot, band_fill);
                        self.sink.write_blank(sheet_row, sheet_col, &style)?;
                    }
                }
            }
        }

        self.row_cursor = row_at(top, layout.rows())?;
        Ok(())
    }

    fn finish(&mut self) -> ExportResult<()> {
        if self.finished || self.measurement_pass {
            return Ok(());
        }
        self.sink.finish()?;
        self.finished = true;
        log_debug!(
            CATEGORY,
            "spreadsheet template finished: {} row(s), {} style(s)",
            self.row_cursor,
            self.styles.constructed()
        );
        Ok(())
    }
}
