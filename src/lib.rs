mod anomaly;
mod cache;
mod climate;
mod config;
mod correlation;
mod dates;
mod energy;
mod error;
mod fetch;
mod interpolation;
mod merge;
mod pipeline;
pub mod table;
mod types;

pub use error::PipelineError;
pub use pipeline::*;

pub use config::{ConfigError, DataPaths, PipelineConfig};

pub use climate::error::ClimateError;
pub use climate::{ClimateAggregation, ClimateAggregator};
pub use energy::error::EnergyError;
pub use energy::{EnergyReshape, EnergyReshaper, GENERATION_CATEGORY};
pub use merge::error::MergeError;
pub use merge::{DatasetMerger, MergeOutput, MergeReport, JOIN_KEY};

pub use anomaly::*;
pub use correlation::*;

pub use cache::MasterDatasetCache;
pub use table::error::TableError;

pub use fetch::error::FetchError;
pub use fetch::regions::{coordinates_for, LatLon, INDIAN_REGIONS};
pub use fetch::{
    parse_power_response, FetchConfig, FetchReport, WeatherFetcher, POWER_DAILY_POINT_URL,
};

pub use types::energy::*;
pub use types::master::*;
pub use types::month::Month;
pub use types::quality::*;
pub use types::region::Region;
pub use types::sources::*;
pub use types::weather::*;
