//! FILENAME: core/persistence/src/error.rs

use fast_export::{ExportError, Ineligibility};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WriterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XLSX write error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("XML write error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Invalid options: {0}")]
    Options(#[from] serde_json::Error),

    #[error("Invalid report definition: {0}")]
    Report(serde_json::Error),

    #[error("Invalid option value: {0}")]
    InvalidOptions(String),

    #[error("Report needs the layout engine ({} reason(s))", .reasons.len())]
    NotEligible { reasons: Vec<Ineligibility> },

    #[error("Export failed: {0}")]
    Export(ExportError),
}

impl From<ExportError> for WriterError {
    fn from(error: ExportError) -> Self {
        match error {
            ExportError::NotEligible { reasons } => WriterError::NotEligible { reasons },
            ExportError::Io(e) => WriterError::Io(e),
            other => WriterError::Export(other),
        }
    }
}

pub type WriterResult<T> = Result<T, WriterError>;
