use crate::types::energy::EnergyWideRecord;
use crate::types::month::Month;
use crate::types::region::Region;
use crate::types::sources::{EnergyVariable, TrackedSources};
use crate::types::weather::MonthlyWeatherRecord;
use std::collections::BTreeSet;
use std::fmt;

/// A joined climate + energy row for one region-month.
///
/// `solar_share` stays `None` until the [`crate::AnomalyCorrector`] has run over the region.
#[derive(Debug, Clone, PartialEq)]
pub struct MasterRecord {
    pub region: Region,
    pub month: Month,
    pub max_temp_mean: f64,
    pub min_temp_mean: f64,
    pub humidity_mean: f64,
    pub precipitation_total: f64,
    pub total_generation: f64,
    pub coal: f64,
    pub solar: f64,
    pub wind: f64,
    pub hydro: Option<f64>,
    pub solar_share: Option<f64>,
}

impl MasterRecord {
    pub fn join(weather: &MonthlyWeatherRecord, energy: &EnergyWideRecord) -> Self {
        Self {
            region: weather.region.clone(),
            month: weather.month,
            max_temp_mean: weather.max_temp_mean,
            min_temp_mean: weather.min_temp_mean,
            humidity_mean: weather.humidity_mean,
            precipitation_total: weather.precipitation_total,
            total_generation: energy.total_generation,
            coal: energy.coal,
            solar: energy.solar,
            wind: energy.wind,
            hydro: energy.hydro,
            solar_share: None,
        }
    }

    pub fn source_value(&self, variable: EnergyVariable) -> Option<f64> {
        match variable {
            EnergyVariable::TotalGeneration => Some(self.total_generation),
            EnergyVariable::Coal => Some(self.coal),
            EnergyVariable::Solar => Some(self.solar),
            EnergyVariable::Wind => Some(self.wind),
            EnergyVariable::Hydro => self.hydro,
        }
    }
}

/// Numeric columns of the master dataset that can enter a correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MasterField {
    MaxTemp,
    MinTemp,
    Humidity,
    Precipitation,
    TotalGeneration,
    Coal,
    Solar,
    Wind,
    Hydro,
    SolarShare,
}

impl MasterField {
    /// Weather drivers against generation mix, the set explored in the dataset-wide heatmap.
    pub const HEATMAP: [MasterField; 6] = [
        MasterField::MaxTemp,
        MasterField::Humidity,
        MasterField::Precipitation,
        MasterField::TotalGeneration,
        MasterField::Coal,
        MasterField::Solar,
    ];

    pub fn column_name(self) -> &'static str {
        match self {
            MasterField::MaxTemp => "T2M_MAX",
            MasterField::MinTemp => "T2M_MIN",
            MasterField::Humidity => "RH2M",
            MasterField::Precipitation => "PRECTOTCORR",
            MasterField::TotalGeneration => "Total Generation",
            MasterField::Coal => "Coal",
            MasterField::Solar => "Solar",
            MasterField::Wind => "Wind",
            MasterField::Hydro => "Hydro",
            MasterField::SolarShare => "Solar_Share",
        }
    }

    pub fn value(self, record: &MasterRecord) -> Option<f64> {
        match self {
            MasterField::MaxTemp => Some(record.max_temp_mean),
            MasterField::MinTemp => Some(record.min_temp_mean),
            MasterField::Humidity => Some(record.humidity_mean),
            MasterField::Precipitation => Some(record.precipitation_total),
            MasterField::TotalGeneration => Some(record.total_generation),
            MasterField::Coal => Some(record.coal),
            MasterField::Solar => Some(record.solar),
            MasterField::Wind => Some(record.wind),
            MasterField::Hydro => record.hydro,
            MasterField::SolarShare => record.solar_share,
        }
    }
}

impl fmt::Display for MasterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

/// The master dataset: one row per (region, month) present in both sources.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MasterTable {
    pub sources: TrackedSources,
    pub records: Vec<MasterRecord>,
}

impl MasterTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct regions in sorted order, as offered for selection.
    pub fn regions(&self) -> Vec<Region> {
        self.records
            .iter()
            .map(|r| r.region.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Looks up a region by any spelling of its name.
    pub fn find_region(&self, name: &str) -> Option<Region> {
        let wanted = Region::new(name)?;
        self.records
            .iter()
            .find(|r| r.region == wanted)
            .map(|r| r.region.clone())
    }

    /// The region's rows, sorted by (year, month).
    pub fn region_subset(&self, region: &Region) -> Vec<MasterRecord> {
        let mut subset: Vec<MasterRecord> = self
            .records
            .iter()
            .filter(|r| &r.region == region)
            .cloned()
            .collect();
        subset.sort_by_key(|r| r.month);
        subset
    }
}
