use std::path::PathBuf;
use thiserror::Error;

/// Mitrenize's error taxonomy. Every variant is fatal: the run aborts and the
/// process exits non-zero. Per-row problems are not errors, see
/// [`crate::types::RowWarning`].
#[derive(Debug, Error)]
pub enum MitrenizeError {
    #[error("input workbook not found: {path}")]
    InputNotFound { path: PathBuf },

    #[error("failed to read workbook {path}: {message}")]
    Workbook { path: PathBuf, message: String },

    #[error("workbook has no worksheet named \"{name}\" (worksheets present: {available})")]
    MissingSheet { name: String, available: String },

    #[error("worksheet \"{sheet}\" is missing required column \"{column}\"")]
    MissingColumn { sheet: String, column: String },

    #[error("worksheet \"{sheet}\" is empty, expected a header row")]
    EmptySheet { sheet: String },

    #[error("failed to write layer file {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MitrenizeError>;

impl MitrenizeError {
    pub fn input_not_found<P: Into<PathBuf>>(path: P) -> Self {
        Self::InputNotFound { path: path.into() }
    }

    pub fn workbook<P: Into<PathBuf>, S: Into<String>>(path: P, message: S) -> Self {
        Self::Workbook { path: path.into(), message: message.into() }
    }

    pub fn missing_sheet<S: Into<String>>(name: S, available: &[String]) -> Self {
        Self::MissingSheet { name: name.into(), available: available.join(", ") }
    }

    pub fn missing_column<S: Into<String>>(sheet: S, column: S) -> Self {
        Self::MissingColumn { sheet: sheet.into(), column: column.into() }
    }

    pub fn output_write<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        Self::OutputWrite { path: path.into(), source }
    }
}
