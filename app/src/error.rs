//! FILENAME: app/src/error.rs

use persistence::{LoadError, RenderError};
use pivot_engine::PivotError;
use thiserror::Error;

/// Configuration problems. Only existence of keys is checked up front;
/// values are validated when they are used.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing configuration keys: {}", .0.join(", "))]
    MissingKeys(Vec<String>),

    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("config is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid configuration value: {0}")]
    Invalid(String),
}

/// Everything that can stop a report run.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Pivot(#[from] PivotError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

impl ReportError {
    /// True when the input referenced columns the data does not have.
    pub fn is_schema_error(&self) -> bool {
        matches!(self, ReportError::Pivot(e) if e.is_schema_error())
    }
}
