//! Solar-share derivation and the cap applied when reported solar output exceeds total
//! generation.

use crate::config::ConfigError;
use crate::types::master::MasterRecord;
use crate::types::quality::DataQualityWarning;
use crate::types::region::Region;
use log::{debug, warn};

/// Added to the denominator so a zero total generation never divides by zero.
pub const DEFAULT_SHARE_EPSILON: f64 = 1e-6;

/// Upper bound of a solar share, in percent.
pub const SHARE_CAP: f64 = 100.0;

/// A region subset with its solar share populated and capped.
#[derive(Debug, Clone, PartialEq)]
pub struct SolarShareCorrection {
    pub region: Region,
    pub records: Vec<MasterRecord>,
    /// Set when any raw share in the region exceeded [`SHARE_CAP`].
    pub anomaly: bool,
    /// Largest share before capping; `None` for an empty subset.
    pub max_raw_share: Option<f64>,
    pub capped_rows: usize,
}

impl SolarShareCorrection {
    /// The warning to surface for this region, if its shares were capped.
    pub fn warning(&self) -> Option<DataQualityWarning> {
        match (self.anomaly, self.max_raw_share) {
            (true, Some(max_raw_share)) => Some(DataQualityWarning::SolarShareCapped {
                region: self.region.clone(),
                max_raw_share,
                capped_rows: self.capped_rows,
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AnomalyCorrector {
    epsilon: f64,
}

impl Default for AnomalyCorrector {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_SHARE_EPSILON,
        }
    }
}

impl AnomalyCorrector {
    /// # Errors
    ///
    /// [`ConfigError::InvalidEpsilon`] unless `epsilon` is positive and finite; a zero
    /// epsilon turns a zero-generation month into `0 / 0`.
    pub fn new(epsilon: f64) -> Result<Self, ConfigError> {
        if epsilon.is_finite() && epsilon > 0.0 {
            Ok(Self { epsilon })
        } else {
            Err(ConfigError::InvalidEpsilon(epsilon))
        }
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    fn share(&self, solar: f64, total: f64) -> f64 {
        solar / (total + self.epsilon) * SHARE_CAP
    }

    /// Populates `solar_share` on a single region's rows.
    ///
    /// Shares above 100 are set to exactly 100 and the region is flagged; shares at or
    /// below 100 keep their computed value. Row order is preserved.
    pub fn correct(&self, region: &Region, subset: &[MasterRecord]) -> SolarShareCorrection {
        let raw: Vec<f64> = subset
            .iter()
            .map(|r| self.share(r.solar, r.total_generation))
            .collect();
        let max_raw_share = raw.iter().copied().reduce(f64::max);
        let anomaly = max_raw_share.is_some_and(|max| max > SHARE_CAP);

        let mut capped_rows = 0;
        let records: Vec<MasterRecord> = subset
            .iter()
            .zip(raw)
            .map(|(record, share)| {
                let share = if share > SHARE_CAP {
                    capped_rows += 1;
                    SHARE_CAP
                } else {
                    share
                };
                MasterRecord {
                    solar_share: Some(share),
                    ..record.clone()
                }
            })
            .collect();

        if anomaly {
            warn!(
                "{}: solar output exceeds reported generation (max share {:.1}%), {} row(s) capped",
                region,
                max_raw_share.unwrap_or(SHARE_CAP),
                capped_rows
            );
        } else {
            debug!("{}: solar shares within bounds", region);
        }

        SolarShareCorrection {
            region: region.clone(),
            records,
            anomaly,
            max_raw_share,
            capped_rows,
        }
    }

    /// Region-level solar contribution, `sum(solar) / sum(total)` in percent, capped at 100.
    ///
    /// Computed from the raw generation figures, independently of any per-row capping.
    /// `None` for an empty subset.
    pub fn solar_contribution(&self, subset: &[MasterRecord]) -> Option<f64> {
        if subset.is_empty() {
            return None;
        }
        let solar: f64 = subset.iter().map(|r| r.solar).sum();
        let total: f64 = subset.iter().map(|r| r.total_generation).sum();
        Some(self.share(solar, total).min(SHARE_CAP))
    }
}
