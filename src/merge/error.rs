use crate::table::error::TableError;
use crate::types::month::Month;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MergeError {
    #[error("[dataset-merge] join key column '{column}' is missing from the {side} table")]
    SchemaMismatch { side: &'static str, column: &'static str },

    #[error("[dataset-merge] {side} table has more than one row for {region} in {month}")]
    DuplicateKey {
        side: &'static str,
        region: String,
        month: Month,
    },

    #[error(transparent)]
    Table(#[from] TableError),
}
