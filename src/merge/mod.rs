//! Inner join of the monthly weather table with the wide energy table.
//!
//! Only (region, year, month) keys present on both sides survive. Rows found on one side
//! only are dropped without error; [`MergeReport`] carries the counts so the delta can be
//! inspected.

pub mod error;

use crate::merge::error::MergeError;
use crate::table;
use crate::table::columns::{MONTH, REGION, YEAR};
use crate::types::energy::{EnergyWideRecord, EnergyWideTable};
use crate::types::master::{MasterRecord, MasterTable};
use crate::types::month::Month;
use crate::types::region::Region;
use crate::types::weather::MonthlyWeatherRecord;
use log::{info, warn};
use polars::prelude::DataFrame;
use std::collections::{HashMap, HashSet};

/// Columns both sides must carry for the join.
pub const JOIN_KEY: [&str; 3] = [REGION, YEAR, MONTH];

/// Row counts of a merge, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MergeReport {
    pub weather_rows: usize,
    pub energy_rows: usize,
    pub joined_rows: usize,
}

impl MergeReport {
    /// Weather region-months with no energy counterpart.
    pub fn weather_only(&self) -> usize {
        self.weather_rows - self.joined_rows
    }

    /// Energy region-months with no weather counterpart.
    pub fn energy_only(&self) -> usize {
        self.energy_rows - self.joined_rows
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutput {
    pub table: MasterTable,
    pub report: MergeReport,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DatasetMerger;

impl DatasetMerger {
    /// Joins typed tables on (region, year, month).
    ///
    /// Region labels are already normalized by [`Region`], so spelling differences between
    /// the two sources do not prevent a match.
    ///
    /// # Errors
    ///
    /// Returns [`MergeError::DuplicateKey`] if either side has two rows for the same key.
    pub fn merge(
        &self,
        weather: &[MonthlyWeatherRecord],
        energy: &EnergyWideTable,
    ) -> Result<MergeOutput, MergeError> {
        let mut energy_by_key: HashMap<(&Region, Month), &EnergyWideRecord> =
            HashMap::with_capacity(energy.records.len());
        for record in &energy.records {
            if energy_by_key
                .insert((&record.region, record.month), record)
                .is_some()
            {
                return Err(MergeError::DuplicateKey {
                    side: "energy",
                    region: record.region.to_string(),
                    month: record.month,
                });
            }
        }

        let mut seen = HashSet::with_capacity(weather.len());
        let mut records = Vec::new();
        for record in weather {
            if !seen.insert((&record.region, record.month)) {
                return Err(MergeError::DuplicateKey {
                    side: "weather",
                    region: record.region.to_string(),
                    month: record.month,
                });
            }
            if let Some(energy_row) = energy_by_key.get(&(&record.region, record.month)) {
                records.push(MasterRecord::join(record, energy_row));
            }
        }
        records.sort_by(|a, b| (&a.region, a.month).cmp(&(&b.region, b.month)));

        let report = MergeReport {
            weather_rows: weather.len(),
            energy_rows: energy.records.len(),
            joined_rows: records.len(),
        };
        info!(
            "Merge complete: {} weather rows, {} energy rows, {} joined",
            report.weather_rows, report.energy_rows, report.joined_rows
        );
        if report.weather_only() > 0 || report.energy_only() > 0 {
            warn!(
                "Inner join dropped {} weather-only and {} energy-only region-months",
                report.weather_only(),
                report.energy_only()
            );
        }

        Ok(MergeOutput {
            table: MasterTable {
                sources: energy.sources,
                records,
            },
            report,
        })
    }

    /// Joins the persisted monthly weather and wide energy tables.
    ///
    /// The region key column may be named `region` or `state` in any case on either side.
    ///
    /// # Errors
    ///
    /// Returns [`MergeError::SchemaMismatch`] when a join-key column is absent from either
    /// frame, and [`MergeError::Table`] when the remaining columns cannot be read.
    pub fn merge_frames(
        &self,
        weather: &DataFrame,
        energy: &DataFrame,
    ) -> Result<MergeOutput, MergeError> {
        for (side, frame) in [("weather", weather), ("energy", energy)] {
            if let Some(column) = JOIN_KEY
                .into_iter()
                .find(|name| !table::columns::has_column(frame, name))
            {
                return Err(MergeError::SchemaMismatch { side, column });
            }
        }
        let weather = table::frames::monthly_weather_from_frame(weather)?;
        let energy = table::frames::energy_wide_from_frame(energy)?;
        self.merge(&weather, &energy)
    }
}
