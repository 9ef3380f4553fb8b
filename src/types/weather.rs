use crate::types::month::Month;
use crate::types::region::Region;

/// Reserved value the weather source writes for "no reading".
pub const MISSING_SENTINEL: f64 = -999.0;

/// One day's raw climate reading for one region, as delivered by the weather source.
///
/// `date` is kept as text (`YYYYMMDD` or ISO `YYYY-MM-DD`) and numeric fields may still
/// carry the sentinel; both are resolved by the [`crate::ClimateAggregator`].
#[derive(Debug, Clone, PartialEq)]
pub struct DailyObservation {
    pub region: String,
    pub date: String,
    pub max_temp: Option<f64>,      // T2M_MAX
    pub min_temp: Option<f64>,      // T2M_MIN
    pub humidity: Option<f64>,      // RH2M
    pub precipitation: Option<f64>, // PRECTOTCORR
}

/// The numeric climate fields carried by a [`DailyObservation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClimateField {
    MaxTemp,
    MinTemp,
    Humidity,
    Precipitation,
}

impl ClimateField {
    pub const ALL: [ClimateField; 4] = [
        ClimateField::MaxTemp,
        ClimateField::MinTemp,
        ClimateField::Humidity,
        ClimateField::Precipitation,
    ];

    /// Column name used by the weather source and the persisted monthly table.
    pub fn column_name(self) -> &'static str {
        match self {
            ClimateField::MaxTemp => "T2M_MAX",
            ClimateField::MinTemp => "T2M_MIN",
            ClimateField::Humidity => "RH2M",
            ClimateField::Precipitation => "PRECTOTCORR",
        }
    }

    pub fn value(self, observation: &DailyObservation) -> Option<f64> {
        match self {
            ClimateField::MaxTemp => observation.max_temp,
            ClimateField::MinTemp => observation.min_temp,
            ClimateField::Humidity => observation.humidity,
            ClimateField::Precipitation => observation.precipitation,
        }
    }
}

/// Aggregated climate for one region-month: means of the point samples, sum of precipitation.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyWeatherRecord {
    pub region: Region,
    pub month: Month,
    pub max_temp_mean: f64,
    pub min_temp_mean: f64,
    pub humidity_mean: f64,
    pub precipitation_total: f64,
}
