//! Reshaping of the long-format generation release into a per-region-month wide table.

pub mod error;

use crate::dates::parse_release_month;
use crate::energy::error::EnergyError;
use crate::interpolation::fill_linear;
use crate::types::energy::{EnergyLongRecord, EnergyWideRecord, EnergyWideTable};
use crate::types::month::Month;
use crate::types::quality::{DataQualityWarning, Stage};
use crate::types::region::Region;
use crate::types::sources::{EnergyVariable, TrackedSources};
use log::{debug, info, warn};
use std::collections::BTreeMap;

/// Category label of the rows the reshaper keeps.
pub const GENERATION_CATEGORY: &str = "Electricity generation";

/// Output of [`EnergyReshaper::reshape`].
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyReshape {
    pub table: EnergyWideTable,
    pub warnings: Vec<DataQualityWarning>,
    /// Long rows outside the generation category or the tracked variable set.
    pub dropped_rows: usize,
    /// Region-months dropped because their total could not be interpolated.
    pub excluded_rows: usize,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EnergyReshaper {
    sources: TrackedSources,
}

type Pivot = BTreeMap<(Region, Month), [Option<f64>; 5]>;

impl EnergyReshaper {
    /// Creates a reshaper for the given variable set. The required variables are always tracked.
    pub fn new(sources: TrackedSources) -> Self {
        Self {
            sources: sources | TrackedSources::REQUIRED,
        }
    }

    pub fn sources(&self) -> TrackedSources {
        self.sources
    }

    fn tracked_variable(&self, record: &EnergyLongRecord) -> Option<EnergyVariable> {
        if record.category.trim() != GENERATION_CATEGORY {
            return None;
        }
        EnergyVariable::from_label(&record.variable).filter(|v| self.sources.contains(v.flag()))
    }

    /// Filters, pivots and gap-fills the long-format records.
    ///
    /// # Errors
    ///
    /// Returns [`EnergyError::MalformedDate`] for an unparseable date on a kept row,
    /// [`EnergyError::DuplicateKey`] when a (region, month, variable) appears twice and
    /// [`EnergyError::NegativeValue`] for negative generation.
    pub fn reshape(&self, records: &[EnergyLongRecord]) -> Result<EnergyReshape, EnergyError> {
        let mut pivot = Pivot::new();
        let mut dropped_rows = 0;

        for (row, record) in records.iter().enumerate() {
            let Some(variable) = self.tracked_variable(record) else {
                dropped_rows += 1;
                continue;
            };
            let region =
                Region::new(&record.region).ok_or(EnergyError::MissingRegion { row })?;
            let month = parse_release_month(&record.date).ok_or_else(|| {
                EnergyError::MalformedDate {
                    row,
                    region: region.to_string(),
                    value: record.date.clone(),
                }
            })?;
            let Some(value) = record.value.filter(|v| v.is_finite()) else {
                continue;
            };
            if value < 0.0 {
                return Err(EnergyError::NegativeValue {
                    region: region.to_string(),
                    month,
                    variable,
                    value,
                });
            }

            let slots = pivot.entry((region, month)).or_default();
            let slot = &mut slots[variable.slot()];
            if slot.is_some() {
                return Err(EnergyError::DuplicateKey {
                    region: record.region.trim().to_string(),
                    month,
                    variable,
                });
            }
            *slot = Some(value);
        }

        let mut by_region: BTreeMap<Region, Vec<(Month, [Option<f64>; 5])>> = BTreeMap::new();
        for ((region, month), slots) in pivot {
            by_region.entry(region).or_default().push((month, slots));
        }

        let track_hydro = self.sources.contains(TrackedSources::HYDRO);
        let mut wide = Vec::new();
        let mut warnings = Vec::new();
        let mut excluded_rows = 0;

        for (region, rows) in by_region {
            let before = wide.len();
            let positions: Vec<f64> = rows.iter().map(|(m, _)| m.index() as f64).collect();
            let totals: Vec<Option<f64>> = rows
                .iter()
                .map(|(_, slots)| slots[EnergyVariable::TotalGeneration.slot()])
                .collect();
            let filled = fill_linear(&positions, &totals);
            if filled.unresolved > 0 {
                warn!(
                    "{}: total generation cannot be interpolated, {} month(s) excluded",
                    region, filled.unresolved
                );
                warnings.push(DataQualityWarning::InsufficientData {
                    stage: Stage::EnergyReshape,
                    region: region.clone(),
                    field: EnergyVariable::TotalGeneration.label(),
                    excluded_rows: filled.unresolved,
                });
                excluded_rows += filled.unresolved;
            }

            for ((month, slots), total) in rows.into_iter().zip(filled.values) {
                let Some(total_generation) = total else {
                    continue;
                };
                let source = |v: EnergyVariable| slots[v.slot()].unwrap_or(0.0);
                wide.push(EnergyWideRecord {
                    region: region.clone(),
                    month,
                    total_generation,
                    coal: source(EnergyVariable::Coal),
                    solar: source(EnergyVariable::Solar),
                    wind: source(EnergyVariable::Wind),
                    hydro: track_hydro.then(|| source(EnergyVariable::Hydro)),
                });
            }
            debug!("{}: reshaped into {} wide rows", region, wide.len() - before);
        }

        info!(
            "Reshaped {} long energy records into {} wide rows ({} dropped, {} excluded)",
            records.len(),
            wide.len(),
            dropped_rows,
            excluded_rows
        );

        Ok(EnergyReshape {
            table: EnergyWideTable {
                sources: self.sources,
                records: wide,
            },
            warnings,
            dropped_rows,
            excluded_rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn long(region: &str, date: &str, variable: &str, value: f64) -> EnergyLongRecord {
        EnergyLongRecord {
            region: region.to_string(),
            date: date.to_string(),
            category: GENERATION_CATEGORY.to_string(),
            variable: variable.to_string(),
            value: Some(value),
        }
    }

    fn wide(region: &str, month: Month, values: [f64; 4]) -> EnergyWideRecord {
        EnergyWideRecord {
            region: Region::new(region).unwrap(),
            month,
            total_generation: values[0],
            coal: values[1],
            solar: values[2],
            wind: values[3],
            hydro: None,
        }
    }

    #[test]
    fn pivot_reproduces_hand_built_wide_table() -> Result<(), EnergyError> {
        let records = vec![
            long("Goa", "2024-01-01", "Total Generation", 100.0),
            long("Goa", "2024-01-01", "Coal", 60.0),
            long("Goa", "2024-01-01", "Solar", 25.0),
            long("Goa", "2024-01-01", "Wind", 5.0),
            // No Wind row for February: expected to come out as 0, not missing.
            long("Goa", "2024-02-01", "Total Generation", 90.0),
            long("Goa", "2024-02-01", "Coal", 50.0),
            long("Goa", "2024-02-01", "Solar", 30.0),
            long("Bihar", "2024-01-01", "Total Generation", 400.0),
            long("Bihar", "2024-01-01", "Coal", 380.0),
        ];
        let reshaped = EnergyReshaper::default().reshape(&records)?;
        let expected = vec![
            wide("Bihar", Month::new(1, 2024), [400.0, 380.0, 0.0, 0.0]),
            wide("Goa", Month::new(1, 2024), [100.0, 60.0, 25.0, 5.0]),
            wide("Goa", Month::new(2, 2024), [90.0, 50.0, 30.0, 0.0]),
        ];
        assert_eq!(reshaped.table.records, expected);
        assert_eq!(reshaped.table.sources, TrackedSources::REQUIRED);
        assert!(reshaped.warnings.is_empty());
        Ok(())
    }

    #[test]
    fn untracked_rows_are_dropped_silently() -> Result<(), EnergyError> {
        let mut capacity = long("Goa", "not a date", "Solar", 1.0);
        capacity.category = "Capacity".to_string();
        let records = vec![
            long("Goa", "2024-01-01", "Total Generation", 100.0),
            long("Goa", "2024-01-01", "Gas", 10.0),
            long("Goa", "2024-01-01", "Hydro", 10.0),
            capacity,
        ];
        let reshaped = EnergyReshaper::default().reshape(&records)?;
        assert_eq!(reshaped.dropped_rows, 3);
        assert_eq!(reshaped.table.records.len(), 1);
        assert_eq!(reshaped.table.records[0].hydro, None);
        Ok(())
    }

    #[test]
    fn missing_total_is_interpolated_within_region_only() -> Result<(), EnergyError> {
        let records = vec![
            long("Goa", "2024-01-01", "Total Generation", 100.0),
            long("Goa", "2024-02-01", "Solar", 10.0),
            long("Goa", "2024-03-01", "Total Generation", 140.0),
            long("Kerala", "2024-02-01", "Total Generation", 9000.0),
            long("Kerala", "2024-03-01", "Total Generation", 9000.0),
        ];
        let reshaped = EnergyReshaper::default().reshape(&records)?;
        let february = reshaped
            .table
            .records
            .iter()
            .find(|r| r.region.name() == "Goa" && r.month == Month::new(2, 2024))
            .unwrap();
        assert_eq!(february.total_generation, 120.0);
        assert_eq!(february.solar, 10.0);
        Ok(())
    }

    #[test]
    fn region_with_single_total_is_warned() -> Result<(), EnergyError> {
        let records = vec![
            long("Sikkim", "2024-01-01", "Total Generation", 50.0),
            long("Sikkim", "2024-02-01", "Solar", 1.0),
        ];
        let reshaped = EnergyReshaper::default().reshape(&records)?;
        assert_eq!(reshaped.table.records.len(), 1);
        assert_eq!(reshaped.excluded_rows, 1);
        assert_eq!(reshaped.warnings.len(), 1);
        Ok(())
    }

    #[test]
    fn hydro_is_filled_only_when_tracked() -> Result<(), EnergyError> {
        let records = vec![
            long("Kerala", "2024-01-01", "Total Generation", 100.0),
            long("Kerala", "2024-01-01", "Hydro", 70.0),
            long("Kerala", "2024-02-01", "Total Generation", 100.0),
        ];
        let reshaped = EnergyReshaper::new(TrackedSources::HYDRO).reshape(&records)?;
        let hydro: Vec<_> = reshaped.table.records.iter().map(|r| r.hydro).collect();
        assert_eq!(hydro, vec![Some(70.0), Some(0.0)]);
        assert!(reshaped.table.sources.contains(TrackedSources::ALL));
        Ok(())
    }

    #[test]
    fn duplicate_pivot_key_fails_fast() {
        let records = vec![
            long("Goa", "2024-01-01", "Solar", 10.0),
            long("goa", "2024-01-15", "Solar", 11.0),
        ];
        let err = EnergyReshaper::default().reshape(&records).unwrap_err();
        assert!(matches!(
            err,
            EnergyError::DuplicateKey {
                variable: EnergyVariable::Solar,
                ..
            }
        ));
    }

    #[test]
    fn malformed_date_on_kept_row_is_fatal() {
        let records = vec![long("Goa", "Jan 2024", "Coal", 10.0)];
        let err = EnergyReshaper::default().reshape(&records).unwrap_err();
        assert!(matches!(err, EnergyError::MalformedDate { row: 0, .. }));
    }
}
