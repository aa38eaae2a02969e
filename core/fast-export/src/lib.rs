//! FILENAME: core/fast-export/src/lib.rs
//! Fast export pipeline for banded reports.
//!
//! Writes reports that need no page layout straight to row-oriented sinks
//! (CSV text, spreadsheet cells). Only a fixed allow-list of report features
//! is accepted; everything else belongs to the full layout engine.
//!
//! Layers:
//! - `validator`: Eligibility gate (CAN this report take the fast path)
//! - `analyzer`, `snapshot`: Which styles change at runtime, and change detection
//! - `processor`, `evaluator`, `events`: Report lifecycle over data rows
//! - `output`, `template`: Binding of the lifecycle to an output template
//! - `csv_template`, `sheet_template`: WHAT gets written per band
//! - `layout`, `placeholder`, `cell_style`: Grid, CSV templates and style caching
//! - `sink`: Output seams implemented by the persistence crate

#[macro_use]
pub mod logging;

pub mod analyzer;
pub mod cell_style;
pub mod conf;
pub mod context;
pub mod csv_template;
pub mod error;
pub mod evaluator;
pub mod events;
pub mod layout;
pub mod output;
pub mod placeholder;
pub mod processor;
pub mod run;
pub mod sheet_template;
pub mod sink;
pub mod snapshot;
pub mod template;
pub mod validator;

#[cfg(test)]
mod testing;

// Re-export commonly used types at the crate root
pub use analyzer::{analyze, AnalysisStash, DynamicStyleSet};
pub use cell_style::{CellBackground, CellStyleCache, CellStyleKey};
pub use context::RuntimeContext;
pub use csv_template::CsvTemplate;
pub use error::{ExportError, ExportResult};
pub use events::{EventKind, ReportEvent, ReportListener};
pub use layout::{ColumnBreaks, GridLayout, GridSlot, Span};
pub use output::OutputFunction;
pub use processor::{DataSource, InMemoryDataSource, ReportProcessor};
pub use run::run_fast_export;
pub use sheet_template::SpreadsheetTemplate;
pub use sink::{CellFormatSpec, CellRange, SheetSink, TextSink};
pub use snapshot::{StyleChangeCache, StyleSnapshot};
pub use template::Template;
pub use validator::{is_eligible, validate, Ineligibility};
