//! FILENAME: core/persistence/src/lib.rs
//! Report export writers.
//!
//! Concrete sinks and templates for the fast export pipeline: CSV text,
//! single-sheet XLSX workbooks and an XML table document, plus the export
//! entry points and their options.

mod csv_writer;
mod error;
mod options;
mod task;
mod xlsx_writer;
mod xml_table;

pub use csv_writer::CsvTextSink;
pub use error::{WriterError, WriterResult};
pub use options::{CsvOptions, ExportOptions, LineTerminator, XlsxOptions};
pub use task::{
    export_csv, export_csv_to_writer, export_to_path, export_xlsx, export_xlsx_to_writer,
    export_xml, export_xml_to_writer, load_report, ExportFormat,
};
pub use xlsx_writer::XlsxSheetSink;
pub use xml_table::XmlTableTemplate;

/// Log category of the writers.
pub const CATEGORY: &str = "PERSISTENCE";
