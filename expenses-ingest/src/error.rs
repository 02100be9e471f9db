use std::path::PathBuf;

use thiserror::Error;

/// Fatal problems with a source export. Any of these aborts the whole file.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("pattern error: {0}")]
    Pattern(#[from] regex::Error),

    #[error("spreadsheet {path}: {message}")]
    Spreadsheet { path: PathBuf, message: String },

    #[error("no header row containing a {marker:?} column")]
    HeaderNotFound { marker: String },

    #[error("missing column {column:?} in header {header:?}")]
    MissingColumn { column: String, header: Vec<String> },

    #[error("row {row}: invalid date {value:?} in column {column:?}, want format {expected}")]
    InvalidDate {
        row: usize,
        column: String,
        value: String,
        expected: &'static str,
    },

    #[error("row {row}: invalid amount {value:?} in column {column:?}")]
    InvalidAmount {
        row: usize,
        column: String,
        value: String,
    },
}

pub type Result<T> = std::result::Result<T, IngestError>;
