//! FILENAME: core/fast-export/src/error.rs

use report_model::ElementId;
use thiserror::Error;

use crate::validator::Ineligibility;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Unknown style key '{key}' referenced by element {element}")]
    UnknownStyleKey { element: ElementId, key: String },

    #[error("Report is not eligible for fast export ({} reason(s))", .reasons.len())]
    NotEligible { reasons: Vec<Ineligibility> },

    #[error("Sink error: {0}")]
    Sink(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExportError {
    /// Wraps a writer-specific failure.
    pub fn sink<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ExportError::Sink(Box::new(error))
    }
}

pub type ExportResult<T> = Result<T, ExportError>;
