//! Tabular feedback import.
//!
//! Reads a CSV file, picks the feedback column and drops empty cells. The
//! result is the ordered item list the digest pipeline consumes.

pub mod tabular;

pub use tabular::*;

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum InputError {
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Column '{column}' not found (available: {})", .available.join(", "))]
    ColumnNotFound {
        column: String,
        available: Vec<String>,
    },

    #[error("No feedback column detected (available: {}); pass --column", .available.join(", "))]
    NoFeedbackColumn { available: Vec<String> },

    #[error("CSV has no header row")]
    MissingHeader,
}
