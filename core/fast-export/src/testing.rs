//! FILENAME: core/fast-export/src/testing.rs
//! PURPOSE: Shared fixtures and recording sinks for unit tests.

use std::collections::BTreeMap;

use report_model::{Band, BandKind, ComputedStyleTable, DataRow, ElementId, Report, Value};

use crate::analyzer::AnalysisStash;
use crate::context::RuntimeContext;
use crate::error::ExportResult;
use crate::sink::{CellFormatSpec, CellRange, SheetSink, TextSink};
use crate::template::Template;

/// Owns everything a `RuntimeContext` borrows.
pub struct Fixture {
    pub row: DataRow,
    pub row_number: usize,
    pub styles: ComputedStyleTable,
    pub stash: AnalysisStash,
}

impl Fixture {
    pub fn new() -> Self {
        Fixture {
            row: DataRow::new(),
            row_number: 0,
            styles: ComputedStyleTable::new(),
            stash: AnalysisStash::new(),
        }
    }

    /// Seeds styles and analysis from a report.
    pub fn for_report(report: &Report) -> Self {
        let mut fixture = Fixture::new();
        fixture.styles = ComputedStyleTable::from_report(report);
        fixture.stash.prepare(report).unwrap();
        fixture
    }

    pub fn ctx(&self) -> RuntimeContext<'_> {
        RuntimeContext::new(&self.row, self.row_number, &self.styles, &self.stash)
    }
}

// ============================================================================
// RECORDING TEMPLATE
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum TemplateCall {
    Initialize { measurement: bool },
    Write { band: ElementId, kind: BandKind },
    Finish,
}

#[derive(Debug, Default)]
pub struct RecordingTemplate {
    pub calls: Vec<TemplateCall>,
}

impl RecordingTemplate {
    pub fn written_kinds(&self) -> Vec<BandKind> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                TemplateCall::Write { kind, .. } => Some(*kind),
                _ => None,
            })
            .collect()
    }
}

impl Template for RecordingTemplate {
    fn initialize(
        &mut self,
        _report: &Report,
        _ctx: &RuntimeContext<'_>,
        is_measurement_pass: bool,
    ) -> ExportResult<()> {
        self.calls.push(TemplateCall::Initialize {
            measurement: is_measurement_pass,
        });
        Ok(())
    }

    fn write(&mut self, band: &Band, _ctx: &RuntimeContext<'_>) -> ExportResult<()> {
        self.calls.push(TemplateCall::Write {
            band: band.id,
            kind: band.kind,
        });
        Ok(())
    }

    fn finish(&mut self) -> ExportResult<()> {
        self.calls.push(TemplateCall::Finish);
        Ok(())
    }
}

// ============================================================================
// RECORDING SINKS
// ============================================================================

/// Renders fields joined by `,` with `\n` record ends.
#[derive(Debug, Default)]
pub struct StringTextSink {
    pub out: String,
    record_open: bool,
    pub flushed: bool,
}

impl TextSink for StringTextSink {
    fn write_field(&mut self, text: &str) -> ExportResult<()> {
        if self.record_open {
            self.out.push(',');
        }
        self.out.push_str(text);
        self.record_open = true;
        Ok(())
    }

    fn write_empty_field(&mut self) -> ExportResult<()> {
        self.write_field("")
    }

    fn end_record(&mut self) -> ExportResult<()> {
        self.out.push('\n');
        self.record_open = false;
        Ok(())
    }

    fn flush(&mut self) -> ExportResult<()> {
        self.flushed = true;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCell {
    pub value: Value,
    pub style: CellFormatSpec,
}

#[derive(Debug, Default)]
pub struct MemorySheetSink {
    pub cells: BTreeMap<(u32, u16), RecordedCell>,
    pub merges: Vec<CellRange>,
    pub column_widths: BTreeMap<u16, u32>,
    pub row_heights: BTreeMap<u32, u32>,
    pub styles_created: usize,
    pub finished: bool,
}

impl SheetSink for MemorySheetSink {
    type Style = CellFormatSpec;

    fn create_style(&mut self, spec: &CellFormatSpec) -> CellFormatSpec {
        self.styles_created += 1;
        spec.clone()
    }

    fn write_cell(&mut self, row: u32, col: u16, value: &Value, style: &CellFormatSpec)
        -> ExportResult<()> {
        self.cells.insert(
            (row, col),
            RecordedCell {
                value: value.clone(),
                style: style.clone(),
            },
        );
        Ok(())
    }

    fn write_blank(&mut self, row: u32, col: u16, style: &CellFormatSpec) -> ExportResult<()> {
        self.write_cell(row, col, &Value::Empty, style)
    }

    fn merge_cells(&mut self, range: CellRange, value: &Value, style: &CellFormatSpec)
        -> ExportResult<()> {
        self.merges.push(range);
        self.write_cell(range.first_row, range.first_col, value, style)
    }

    fn set_column_width(&mut self, col: u16, width: u32) -> ExportResult<()> {
        self.column_widths.insert(col, width);
        Ok(())
    }

    fn set_row_height(&mut self, row: u32, height: u32) -> ExportResult<()> {
        self.row_heights.insert(row, height);
        Ok(())
    }

    fn finish(&mut self) -> ExportResult<()> {
        self.finished = true;
        Ok(())
    }
}
