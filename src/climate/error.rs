use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClimateError {
    #[error("[climate-aggregation] row {row}: field 'region' is empty")]
    MissingRegion { row: usize },

    #[error("[climate-aggregation] row {row} ({region}): field 'date' value '{value}' is not a YYYYMMDD or YYYY-MM-DD date")]
    MalformedDate {
        row: usize,
        region: String,
        value: String,
    },

    #[error("[climate-aggregation] duplicate observation for {region} on {date}")]
    DuplicateObservation { region: String, date: NaiveDate },
}
