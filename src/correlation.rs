//! Pearson correlation between temperature and generation, and its interpretation.

use crate::types::master::{MasterField, MasterRecord};
use crate::types::region::Region;
use log::{debug, info};
use ordered_float::OrderedFloat;
use std::collections::HashSet;
use std::fmt;

/// Above this a coefficient is [`CorrelationTier::High`].
pub const HIGH_THRESHOLD: f64 = 0.7;
/// Above this (and at or below [`HIGH_THRESHOLD`]) a coefficient is [`CorrelationTier::Moderate`].
pub const MODERATE_THRESHOLD: f64 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CorrelationTier {
    High,
    Moderate,
    Low,
}

impl CorrelationTier {
    pub fn classify(coefficient: f64) -> Self {
        if coefficient > HIGH_THRESHOLD {
            CorrelationTier::High
        } else if coefficient > MODERATE_THRESHOLD {
            CorrelationTier::Moderate
        } else {
            CorrelationTier::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CorrelationTier::High => "High Correlation",
            CorrelationTier::Moderate => "Moderate Correlation",
            CorrelationTier::Low => "Low Correlation",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            CorrelationTier::High => {
                "Energy demand is strongly driven by temperature spikes (likely high AC/cooling usage)."
            }
            CorrelationTier::Moderate => {
                "Temperature is a significant factor, but industrial cycles or seasonal shifts also play a role."
            }
            CorrelationTier::Low => {
                "Energy demand appears driven by industrial activity or base load rather than weather fluctuations."
            }
        }
    }
}

impl fmt::Display for CorrelationTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Either a finite coefficient in [-1, 1] with its tier, or no coefficient at all.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Correlation {
    Defined { coefficient: f64, tier: CorrelationTier },
    /// One of the series has fewer than two distinct values.
    InsufficientVariance,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationResult {
    pub region: Region,
    pub correlation: Correlation,
}

impl CorrelationResult {
    pub fn coefficient(&self) -> Option<f64> {
        match self.correlation {
            Correlation::Defined { coefficient, .. } => Some(coefficient),
            Correlation::InsufficientVariance => None,
        }
    }

    pub fn tier(&self) -> Option<CorrelationTier> {
        match self.correlation {
            Correlation::Defined { tier, .. } => Some(tier),
            Correlation::InsufficientVariance => None,
        }
    }
}

impl fmt::Display for CorrelationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.correlation {
            Correlation::Defined { coefficient, tier } => write!(
                f,
                "The Pearson correlation between heat and energy demand in {} is {:.2}. {}: {}",
                self.region,
                coefficient,
                tier.label(),
                tier.description()
            ),
            Correlation::InsufficientVariance => write!(
                f,
                "Insufficient variance in {} data to calculate a Pearson correlation.",
                self.region
            ),
        }
    }
}

fn distinct_values(values: &[f64]) -> usize {
    values
        .iter()
        .map(|&v| OrderedFloat(v))
        .collect::<HashSet<_>>()
        .len()
}

/// Pearson's r, or `None` when it is undefined.
///
/// Undefined covers mismatched lengths, fewer than two distinct values on either side and
/// non-finite input. A defined result is clamped to [-1, 1] against rounding drift.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || distinct_values(xs) < 2 || distinct_values(ys) < 2 {
        return None;
    }
    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let (mut covariance, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (&x, &y) in xs.iter().zip(ys) {
        let (dx, dy) = (x - mean_x, y - mean_y);
        covariance += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    let r = covariance / (var_x.sqrt() * var_y.sqrt());
    r.is_finite().then(|| r.clamp(-1.0, 1.0))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CorrelationAnalyzer;

impl CorrelationAnalyzer {
    /// Correlates mean max temperature with total generation across a region's rows.
    pub fn analyze(&self, region: &Region, subset: &[MasterRecord]) -> CorrelationResult {
        let temperature: Vec<f64> = subset.iter().map(|r| r.max_temp_mean).collect();
        let generation: Vec<f64> = subset.iter().map(|r| r.total_generation).collect();

        let correlation = match pearson(&temperature, &generation) {
            Some(coefficient) => Correlation::Defined {
                coefficient,
                tier: CorrelationTier::classify(coefficient),
            },
            None => Correlation::InsufficientVariance,
        };
        match correlation {
            Correlation::Defined { coefficient, tier } => {
                info!("{}: r = {:.3} ({})", region, coefficient, tier)
            }
            Correlation::InsufficientVariance => info!(
                "{}: insufficient variance across {} rows for a correlation",
                region,
                subset.len()
            ),
        }

        CorrelationResult {
            region: region.clone(),
            correlation,
        }
    }
}

/// Pairwise correlations between a set of master-table columns.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub fields: Vec<MasterField>,
    /// Row-major, `fields.len()` squared; `None` where a pair has insufficient variance.
    pub cells: Vec<Option<f64>>,
}

impl CorrelationMatrix {
    pub fn get(&self, row: MasterField, column: MasterField) -> Option<f64> {
        let i = self.fields.iter().position(|&f| f == row)?;
        let j = self.fields.iter().position(|&f| f == column)?;
        self.cells[i * self.fields.len() + j]
    }
}

/// Correlates every pair of `fields` over the rows that carry both values.
pub fn correlation_matrix(records: &[MasterRecord], fields: &[MasterField]) -> CorrelationMatrix {
    let mut cells = Vec::with_capacity(fields.len() * fields.len());
    for &a in fields {
        for &b in fields {
            let (xs, ys): (Vec<f64>, Vec<f64>) = records
                .iter()
                .filter_map(|r| a.value(r).zip(b.value(r)))
                .unzip();
            cells.push(pearson(&xs, &ys));
        }
    }
    debug!(
        "Correlation matrix over {} fields and {} rows",
        fields.len(),
        records.len()
    );
    CorrelationMatrix {
        fields: fields.to_vec(),
        cells,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::month::Month;

    fn row(month: u32, max_temp: f64, total: f64) -> MasterRecord {
        MasterRecord {
            region: Region::new("Delhi").unwrap(),
            month: Month::new(month, 2024),
            max_temp_mean: max_temp,
            min_temp_mean: max_temp - 10.0,
            humidity_mean: 50.0,
            precipitation_total: f64::from(month),
            total_generation: total,
            coal: total * 0.7,
            solar: total * 0.1,
            wind: 0.0,
            hydro: None,
            solar_share: None,
        }
    }

    #[test]
    fn tiers_use_exclusive_lower_bounds() {
        assert_eq!(CorrelationTier::classify(0.71), CorrelationTier::High);
        assert_eq!(CorrelationTier::classify(0.7), CorrelationTier::Moderate);
        assert_eq!(CorrelationTier::classify(0.41), CorrelationTier::Moderate);
        assert_eq!(CorrelationTier::classify(0.4), CorrelationTier::Low);
        assert_eq!(CorrelationTier::classify(-0.9), CorrelationTier::Low);
    }

    #[test]
    fn constant_generation_is_insufficient_variance() {
        let region = Region::new("Delhi").unwrap();
        let subset = vec![row(1, 20.0, 500.0), row(2, 30.0, 500.0), row(3, 40.0, 500.0)];
        let result = CorrelationAnalyzer.analyze(&region, &subset);
        assert_eq!(result.correlation, Correlation::InsufficientVariance);
        assert_eq!(result.coefficient(), None);
        assert!(result.to_string().contains("Insufficient variance"));
    }

    #[test]
    fn single_row_and_empty_subsets_are_undefined() {
        let region = Region::new("Delhi").unwrap();
        let single = CorrelationAnalyzer.analyze(&region, &[row(1, 20.0, 100.0)]);
        assert_eq!(single.correlation, Correlation::InsufficientVariance);
        let empty = CorrelationAnalyzer.analyze(&region, &[]);
        assert_eq!(empty.correlation, Correlation::InsufficientVariance);
    }

    #[test]
    fn linear_relationship_is_high() {
        let region = Region::new("Delhi").unwrap();
        let subset: Vec<_> = (1..=6)
            .map(|m| row(m, 20.0 + f64::from(m), 100.0 + 10.0 * f64::from(m)))
            .collect();
        let result = CorrelationAnalyzer.analyze(&region, &subset);
        let r = result.coefficient().unwrap();
        assert!((r - 1.0).abs() < 1e-9);
        assert!(r <= 1.0);
        assert_eq!(result.tier(), Some(CorrelationTier::High));
    }

    #[test]
    fn inverse_relationship_is_low() {
        let r = pearson(&[1.0, 2.0, 3.0, 4.0], &[8.0, 6.0, 4.0, 2.0]).unwrap();
        assert!((r + 1.0).abs() < 1e-9);
        assert_eq!(CorrelationTier::classify(r), CorrelationTier::Low);
    }

    #[test]
    fn mismatched_lengths_are_undefined() {
        assert_eq!(pearson(&[1.0, 2.0], &[1.0, 2.0, 3.0]), None);
    }

    #[test]
    fn matrix_is_symmetric_with_unit_diagonal() {
        let subset: Vec<_> = (1..=6)
            .map(|m| row(m, 20.0 + f64::from(m * m), 100.0 + 10.0 * f64::from(m)))
            .collect();
        let matrix = correlation_matrix(&subset, &MasterField::HEATMAP);
        let temp = MasterField::MaxTemp;
        let total = MasterField::TotalGeneration;
        assert!((matrix.get(temp, temp).unwrap() - 1.0).abs() < 1e-9);
        assert_eq!(matrix.get(temp, total), matrix.get(total, temp));
        // Humidity is constant in the fixture.
        assert_eq!(matrix.get(MasterField::Humidity, temp), None);
        assert_eq!(matrix.get(MasterField::Hydro, temp), None);
    }
}
