use crate::types::quality::Stage;
use polars::prelude::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("Source file '{0}' not found")]
    SourceNotFound(PathBuf),

    #[error("I/O error on '{0}'")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Failed to read CSV file '{path}'")]
    CsvRead {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },

    #[error("Failed to write CSV file '{path}'")]
    CsvWrite {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },

    #[error("[{stage}] required column '{column}' not found")]
    MissingColumn { stage: Stage, column: String },

    #[error("[{stage}] column '{column}' cannot be read as {expected}")]
    ColumnType {
        stage: Stage,
        column: String,
        expected: &'static str,
        #[source]
        source: PolarsError,
    },

    #[error("[{stage}] row {row}: field '{column}' is empty")]
    MissingValue {
        stage: Stage,
        column: String,
        row: usize,
    },

    #[error("[{stage}] row {row}: field '{column}' has negative generation {value}")]
    NegativeValue {
        stage: Stage,
        column: String,
        row: usize,
        value: f64,
    },

    #[error("[{stage}] row {row}: year {year:?} / month {month:?} is not a calendar month")]
    InvalidMonth {
        stage: Stage,
        row: usize,
        year: Option<i64>,
        month: Option<i64>,
    },

    #[error("Failed building DataFrame: {0}")]
    Frame(#[from] PolarsError),
}

impl TableError {
    /// Whether the error means an input file was absent, as opposed to unreadable.
    pub fn is_source_not_found(&self) -> bool {
        matches!(self, TableError::SourceNotFound(_))
    }
}
