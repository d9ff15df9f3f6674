use std::path::PathBuf;

use thiserror::Error;

/// Reading or writing the backing CSV snapshot failed.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed CSV in {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// An uploaded file could not be turned into a table.
#[derive(Debug, Error)]
pub enum ImportParseError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
    #[error("could not read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("could not read workbook: {0}")]
    Workbook(#[from] calamine::Error),
    #[error("workbook contains no worksheets")]
    NoWorksheet,
}

/// A manually entered row is missing a mandatory field.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is a required field")]
    MissingField(&'static str),
}
