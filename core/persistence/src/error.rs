//! FILENAME: core/persistence/src/error.rs

use std::path::PathBuf;
use thiserror::Error;

/// Failures while turning a source into a `Table`.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("source file not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    #[error("unsupported source format: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<csv::Error> for LoadError {
    fn from(err: csv::Error) -> Self {
        LoadError::MalformedPayload(err.to_string())
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(err: serde_json::Error) -> Self {
        LoadError::MalformedPayload(err.to_string())
    }
}

impl From<calamine::Error> for LoadError {
    fn from(err: calamine::Error) -> Self {
        LoadError::MalformedPayload(err.to_string())
    }
}

/// Failures while writing an artifact.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XLSX write error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("PDF write error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("invalid style configuration: {0}")]
    InvalidStyle(#[from] engine::StyleError),
}
