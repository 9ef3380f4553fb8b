//! Cleaning and monthly aggregation of daily climate observations.
//!
//! Daily rows are grouped per region and sorted chronologically. Sentinel readings become
//! gaps, gaps are interpolated within the region's own series, and the cleaned rows are
//! rolled up to one [`MonthlyWeatherRecord`] per (region, year, month).

pub mod error;

use crate::climate::error::ClimateError;
use crate::dates::parse_observation_date;
use crate::interpolation::fill_linear;
use crate::types::month::Month;
use crate::types::quality::{DataQualityWarning, Stage};
use crate::types::region::Region;
use crate::types::weather::{ClimateField, DailyObservation, MonthlyWeatherRecord, MISSING_SENTINEL};
use chrono::{Datelike, NaiveDate};
use log::{debug, info, warn};
use std::collections::BTreeMap;

/// Output of [`ClimateAggregator::aggregate`].
#[derive(Debug, Clone, PartialEq)]
pub struct ClimateAggregation {
    /// One record per (region, year, month), sorted by region then month.
    pub records: Vec<MonthlyWeatherRecord>,
    pub warnings: Vec<DataQualityWarning>,
    /// Daily rows left out because a field could not be resolved.
    pub excluded_rows: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct ClimateAggregator {
    sentinel: f64,
}

impl Default for ClimateAggregator {
    fn default() -> Self {
        Self::new(MISSING_SENTINEL)
    }
}

struct CleanDay {
    date: NaiveDate,
    values: [Option<f64>; 4],
}

#[derive(Default)]
struct MonthAccumulator {
    max_temp_sum: f64,
    min_temp_sum: f64,
    humidity_sum: f64,
    precipitation_sum: f64,
    days: usize,
}

impl MonthAccumulator {
    fn add(&mut self, values: [f64; 4]) {
        self.max_temp_sum += values[0];
        self.min_temp_sum += values[1];
        self.humidity_sum += values[2];
        self.precipitation_sum += values[3];
        self.days += 1;
    }

    fn finish(&self, region: Region, month: Month) -> MonthlyWeatherRecord {
        let days = self.days as f64;
        MonthlyWeatherRecord {
            region,
            month,
            max_temp_mean: self.max_temp_sum / days,
            min_temp_mean: self.min_temp_sum / days,
            humidity_mean: self.humidity_sum / days,
            // Cumulative quantity: summed, not averaged.
            precipitation_total: self.precipitation_sum,
        }
    }
}

impl ClimateAggregator {
    pub fn new(sentinel: f64) -> Self {
        Self { sentinel }
    }

    fn clean(&self, value: Option<f64>) -> Option<f64> {
        value.filter(|v| v.is_finite() && (v - self.sentinel).abs() > f64::EPSILON)
    }

    /// Aggregates daily observations for any number of regions into monthly records.
    ///
    /// # Errors
    ///
    /// Returns [`ClimateError::MalformedDate`] when a date cannot be parsed,
    /// [`ClimateError::MissingRegion`] for a blank region label and
    /// [`ClimateError::DuplicateObservation`] when a region has two rows for the same day.
    /// Regions with too little data to interpolate are reported as warnings, not errors.
    pub fn aggregate(
        &self,
        observations: &[DailyObservation],
    ) -> Result<ClimateAggregation, ClimateError> {
        let mut by_region: BTreeMap<Region, Vec<CleanDay>> = BTreeMap::new();

        for (row, observation) in observations.iter().enumerate() {
            let region = Region::new(&observation.region)
                .ok_or(ClimateError::MissingRegion { row })?;
            let date = parse_observation_date(&observation.date).ok_or_else(|| {
                ClimateError::MalformedDate {
                    row,
                    region: region.to_string(),
                    value: observation.date.clone(),
                }
            })?;
            let values = ClimateField::ALL.map(|field| self.clean(field.value(observation)));
            by_region
                .entry(region)
                .or_default()
                .push(CleanDay { date, values });
        }

        let mut records = Vec::new();
        let mut warnings = Vec::new();
        let mut excluded_rows = 0;

        for (region, mut days) in by_region {
            days.sort_by_key(|d| d.date);
            if let Some(pair) = days.windows(2).find(|w| w[0].date == w[1].date) {
                return Err(ClimateError::DuplicateObservation {
                    region: region.to_string(),
                    date: pair[0].date,
                });
            }

            let positions: Vec<f64> = days
                .iter()
                .map(|d| f64::from(d.date.num_days_from_ce()))
                .collect();

            for (slot, field) in ClimateField::ALL.into_iter().enumerate() {
                let series: Vec<Option<f64>> = days.iter().map(|d| d.values[slot]).collect();
                let filled = fill_linear(&positions, &series);
                if filled.unresolved > 0 {
                    warn!(
                        "{}: only {} observed '{}' value(s), {} row(s) cannot be interpolated",
                        region,
                        series.iter().flatten().count(),
                        field.column_name(),
                        filled.unresolved
                    );
                    warnings.push(DataQualityWarning::InsufficientData {
                        stage: Stage::ClimateAggregation,
                        region: region.clone(),
                        field: field.column_name(),
                        excluded_rows: filled.unresolved,
                    });
                }
                for (day, value) in days.iter_mut().zip(filled.values) {
                    day.values[slot] = value;
                }
            }

            let mut months: BTreeMap<Month, MonthAccumulator> = BTreeMap::new();
            for day in &days {
                let [Some(max), Some(min), Some(humidity), Some(precipitation)] = day.values
                else {
                    excluded_rows += 1;
                    continue;
                };
                months
                    .entry(Month::from_date(day.date))
                    .or_default()
                    .add([max, min, humidity, precipitation]);
            }

            debug!(
                "{}: {} daily rows aggregated into {} months",
                region,
                days.len(),
                months.len()
            );
            records.extend(
                months
                    .into_iter()
                    .map(|(month, acc)| acc.finish(region.clone(), month)),
            );
        }

        info!(
            "Aggregated {} daily observations into {} monthly weather records ({} excluded)",
            observations.len(),
            records.len(),
            excluded_rows
        );

        Ok(ClimateAggregation {
            records,
            warnings,
            excluded_rows,
        })
    }
}
