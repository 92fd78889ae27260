use std::path::PathBuf;
use thiserror::Error;

pub type XlResult<T> = Result<T, XlError>;

#[derive(Error, Debug)]
pub enum XlError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to open workbook '{}': {message}", path.display())]
    Workbook { path: PathBuf, message: String },

    #[error("Failed to serialize workbook: {0}")]
    Serialize(String),

    #[error("Cannot convert cell {cell} to text: {message}")]
    DataConversion { cell: String, message: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Key '{key}' not found in record {record}")]
    KeyNotFound { key: String, record: usize },

    #[error("Malformed input: {0}")]
    MalformedInput(String),
}

/// Failure categories surfaced to callers.
///
/// Several variants of [`XlError`] share a kind: a missing file and a
/// corrupt workbook are both an [`ErrorKind::IoFailure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    IoFailure,
    DataConversionFailure,
    InvalidInput,
    KeyNotFound,
    MalformedInput,
}

impl XlError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            XlError::Io(_) | XlError::Workbook { .. } | XlError::Serialize(_) => {
                ErrorKind::IoFailure
            }
            XlError::DataConversion { .. } => ErrorKind::DataConversionFailure,
            XlError::InvalidInput(_) => ErrorKind::InvalidInput,
            XlError::KeyNotFound { .. } => ErrorKind::KeyNotFound,
            XlError::MalformedInput(_) => ErrorKind::MalformedInput,
        }
    }

    /// True when the caller supplied bad data, as opposed to an I/O problem
    pub fn is_input_error(&self) -> bool {
        !matches!(self.kind(), ErrorKind::IoFailure)
    }
}
