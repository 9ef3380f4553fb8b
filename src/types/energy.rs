use crate::types::month::Month;
use crate::types::region::Region;
use crate::types::sources::{EnergyVariable, TrackedSources};

/// One (region, month, variable) measurement from the long-format generation release.
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyLongRecord {
    pub region: String,
    pub date: String,
    pub category: String,
    pub variable: String,
    pub value: Option<f64>,
}

/// Generation for one region-month broken out by source, in GWh.
///
/// `hydro` is `None` when hydro is not tracked by the owning table.
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyWideRecord {
    pub region: Region,
    pub month: Month,
    pub total_generation: f64,
    pub coal: f64,
    pub solar: f64,
    pub wind: f64,
    pub hydro: Option<f64>,
}

impl EnergyWideRecord {
    pub fn value(&self, variable: EnergyVariable) -> Option<f64> {
        match variable {
            EnergyVariable::TotalGeneration => Some(self.total_generation),
            EnergyVariable::Coal => Some(self.coal),
            EnergyVariable::Solar => Some(self.solar),
            EnergyVariable::Wind => Some(self.wind),
            EnergyVariable::Hydro => self.hydro,
        }
    }
}

/// The wide energy table together with the set of variables it tracks.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EnergyWideTable {
    pub sources: TrackedSources,
    pub records: Vec<EnergyWideRecord>,
}

impl EnergyWideTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
