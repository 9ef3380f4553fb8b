use crate::types::month::Month;
use crate::types::sources::EnergyVariable;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnergyError {
    #[error("[energy-reshape] row {row}: field 'State' is empty")]
    MissingRegion { row: usize },

    #[error("[energy-reshape] row {row} ({region}): field 'Date' value '{value}' is not a recognised date")]
    MalformedDate {
        row: usize,
        region: String,
        value: String,
    },

    #[error("[energy-reshape] duplicate '{variable}' rows for {region} in {month}")]
    DuplicateKey {
        region: String,
        month: Month,
        variable: EnergyVariable,
    },

    #[error("[energy-reshape] negative '{variable}' value {value} for {region} in {month}")]
    NegativeValue {
        region: String,
        month: Month,
        variable: EnergyVariable,
        value: f64,
    },
}
