//! Pipeline stage names and the recoverable data-quality conditions stages report.

use crate::types::region::Region;
use std::fmt;

/// A processing stage, used to attribute errors and warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    ClimateAggregation,
    EnergyReshape,
    DatasetMerge,
    DatasetLoad,
}

impl Stage {
    pub fn name(self) -> &'static str {
        match self {
            Stage::ClimateAggregation => "climate-aggregation",
            Stage::EnergyReshape => "energy-reshape",
            Stage::DatasetMerge => "dataset-merge",
            Stage::DatasetLoad => "dataset-load",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A condition that was corrected or worked around instead of failing the stage.
#[derive(Debug, Clone, PartialEq)]
pub enum DataQualityWarning {
    /// A field had fewer than two observed points in a region, so gaps could not be
    /// interpolated and the rows missing it were left out.
    InsufficientData {
        stage: Stage,
        region: Region,
        field: &'static str,
        excluded_rows: usize,
    },
    /// Reported solar output exceeded reported total generation; shares were capped at 100.
    SolarShareCapped {
        region: Region,
        max_raw_share: f64,
        capped_rows: usize,
    },
}

impl DataQualityWarning {
    pub fn region(&self) -> &Region {
        match self {
            DataQualityWarning::InsufficientData { region, .. } => region,
            DataQualityWarning::SolarShareCapped { region, .. } => region,
        }
    }
}

impl fmt::Display for DataQualityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataQualityWarning::InsufficientData {
                stage,
                region,
                field,
                excluded_rows,
            } => write!(
                f,
                "[{stage}] {region}: fewer than two observed '{field}' values, {excluded_rows} row(s) left unresolved and excluded"
            ),
            DataQualityWarning::SolarShareCapped {
                region,
                max_raw_share,
                capped_rows,
            } => write!(
                f,
                "{region}: solar output exceeds reported generation (max share {max_raw_share:.1}%), {capped_rows} row(s) capped at 100%"
            ),
        }
    }
}
