use crate::climate::error::ClimateError;
use crate::config::ConfigError;
use crate::energy::error::EnergyError;
use crate::fetch::error::FetchError;
use crate::merge::error::MergeError;
use crate::table::error::TableError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Climate(#[from] ClimateError),

    #[error(transparent)]
    Energy(#[from] EnergyError),

    #[error(transparent)]
    Merge(#[from] MergeError),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Region '{0}' is not present in the master dataset")]
    UnknownRegion(String),
}

impl PipelineError {
    /// Whether a required input file was missing, which callers usually report as
    /// "run the earlier pipeline step first" rather than as a failure.
    pub fn is_source_not_found(&self) -> bool {
        match self {
            PipelineError::Table(e) | PipelineError::Merge(MergeError::Table(e)) => {
                e.is_source_not_found()
            }
            _ => false,
        }
    }
}
