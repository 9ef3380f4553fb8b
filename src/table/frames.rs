//! Conversions between the typed tables and polars `DataFrame`s.

use crate::table::columns::{
    float_values, int_values, optional_float_values, string_values, CATEGORY, DATE, MONTH,
    REGION, VALUE, VARIABLE, YEAR,
};
use crate::table::error::TableError;
use crate::types::energy::{EnergyLongRecord, EnergyWideRecord, EnergyWideTable};
use crate::types::master::{MasterField, MasterRecord, MasterTable};
use crate::types::month::Month;
use crate::types::quality::Stage;
use crate::types::region::Region;
use crate::types::sources::{EnergyVariable, TrackedSources};
use crate::types::weather::{ClimateField, DailyObservation, MonthlyWeatherRecord};
use polars::prelude::*;

struct KeyColumns {
    stage: Stage,
    regions: Vec<Option<String>>,
    years: Vec<Option<i64>>,
    months: Vec<Option<i64>>,
}

impl KeyColumns {
    fn read(frame: &DataFrame, stage: Stage) -> Result<Self, TableError> {
        Ok(Self {
            stage,
            regions: string_values(frame, stage, REGION)?,
            years: int_values(frame, stage, YEAR)?,
            months: int_values(frame, stage, MONTH)?,
        })
    }

    fn key(&self, row: usize) -> Result<(Region, Month), TableError> {
        let region = self.regions[row]
            .as_deref()
            .and_then(Region::new)
            .ok_or_else(|| TableError::MissingValue {
                stage: self.stage,
                column: REGION.to_string(),
                row,
            })?;
        let (year, month) = (self.years[row], self.months[row]);
        let month = year
            .zip(month)
            .and_then(|(y, m)| Month::checked(y, m))
            .ok_or(TableError::InvalidMonth {
                stage: self.stage,
                row,
                year,
                month,
            })?;
        Ok((region, month))
    }
}

fn required(
    values: &[Option<f64>],
    row: usize,
    stage: Stage,
    column: &str,
) -> Result<f64, TableError> {
    values[row].ok_or_else(|| TableError::MissingValue {
        stage,
        column: column.to_string(),
        row,
    })
}

fn key_columns<'a>(keys: impl Iterator<Item = (&'a Region, Month)>) -> Vec<Column> {
    let mut regions = Vec::new();
    let mut years = Vec::new();
    let mut months = Vec::new();
    for (region, month) in keys {
        regions.push(region.name().to_string());
        years.push(i64::from(month.year()));
        months.push(i64::from(month.month()));
    }
    vec![
        Column::new(REGION.into(), regions),
        Column::new(YEAR.into(), years),
        Column::new(MONTH.into(), months),
    ]
}

fn float_column<T>(name: &str, records: &[T], value: impl Fn(&T) -> f64) -> Column {
    Column::new(name.into(), records.iter().map(value).collect::<Vec<f64>>())
}

/// Raw daily weather rows. Region and date are passed through as text; their validation
/// belongs to the aggregator.
pub fn daily_observations_from_frame(
    frame: &DataFrame,
) -> Result<Vec<DailyObservation>, TableError> {
    let stage = Stage::ClimateAggregation;
    let regions = string_values(frame, stage, REGION)?;
    let dates = string_values(frame, stage, DATE)?;
    let max_temp = float_values(frame, stage, ClimateField::MaxTemp.column_name())?;
    let min_temp = float_values(frame, stage, ClimateField::MinTemp.column_name())?;
    let humidity = float_values(frame, stage, ClimateField::Humidity.column_name())?;
    let precipitation = float_values(frame, stage, ClimateField::Precipitation.column_name())?;

    Ok((0..frame.height())
        .map(|row| DailyObservation {
            region: regions[row].clone().unwrap_or_default(),
            date: dates[row].clone().unwrap_or_default(),
            max_temp: max_temp[row],
            min_temp: min_temp[row],
            humidity: humidity[row],
            precipitation: precipitation[row],
        })
        .collect())
}

pub fn daily_observations_to_frame(
    observations: &[DailyObservation],
) -> Result<DataFrame, TableError> {
    let mut columns = vec![
        Column::new(
            REGION.into(),
            observations
                .iter()
                .map(|o| o.region.clone())
                .collect::<Vec<_>>(),
        ),
        Column::new(
            DATE.into(),
            observations
                .iter()
                .map(|o| o.date.clone())
                .collect::<Vec<_>>(),
        ),
    ];
    for field in ClimateField::ALL {
        columns.push(Column::new(
            field.column_name().into(),
            observations
                .iter()
                .map(|o| field.value(o))
                .collect::<Vec<_>>(),
        ));
    }
    Ok(DataFrame::new(columns)?)
}

/// Long-format generation release rows, with every other column of the release ignored.
pub fn energy_long_from_frame(frame: &DataFrame) -> Result<Vec<EnergyLongRecord>, TableError> {
    let stage = Stage::EnergyReshape;
    let regions = string_values(frame, stage, REGION)?;
    let dates = string_values(frame, stage, DATE)?;
    let categories = string_values(frame, stage, CATEGORY)?;
    let variables = string_values(frame, stage, VARIABLE)?;
    let values = float_values(frame, stage, VALUE)?;

    Ok((0..frame.height())
        .map(|row| EnergyLongRecord {
            region: regions[row].clone().unwrap_or_default(),
            date: dates[row].clone().unwrap_or_default(),
            category: categories[row].clone().unwrap_or_default(),
            variable: variables[row].clone().unwrap_or_default(),
            value: values[row],
        })
        .collect())
}

pub fn monthly_weather_from_frame(
    frame: &DataFrame,
) -> Result<Vec<MonthlyWeatherRecord>, TableError> {
    let stage = Stage::DatasetMerge;
    let keys = KeyColumns::read(frame, stage)?;
    let fields = ClimateField::ALL.map(|f| f.column_name());
    let [max_temp, min_temp, humidity, precipitation] = [
        float_values(frame, stage, fields[0])?,
        float_values(frame, stage, fields[1])?,
        float_values(frame, stage, fields[2])?,
        float_values(frame, stage, fields[3])?,
    ];

    (0..frame.height())
        .map(|row| {
            let (region, month) = keys.key(row)?;
            Ok(MonthlyWeatherRecord {
                region,
                month,
                max_temp_mean: required(&max_temp, row, stage, fields[0])?,
                min_temp_mean: required(&min_temp, row, stage, fields[1])?,
                humidity_mean: required(&humidity, row, stage, fields[2])?,
                precipitation_total: required(&precipitation, row, stage, fields[3])?,
            })
        })
        .collect()
}

pub fn monthly_weather_to_frame(records: &[MonthlyWeatherRecord]) -> Result<DataFrame, TableError> {
    let mut columns = key_columns(records.iter().map(|r| (&r.region, r.month)));
    columns.extend([
        float_column(ClimateField::MaxTemp.column_name(), records, |r| r.max_temp_mean),
        float_column(ClimateField::MinTemp.column_name(), records, |r| r.min_temp_mean),
        float_column(ClimateField::Humidity.column_name(), records, |r| r.humidity_mean),
        float_column(ClimateField::Precipitation.column_name(), records, |r| {
            r.precipitation_total
        }),
    ]);
    Ok(DataFrame::new(columns)?)
}

struct EnergyColumns {
    total: Vec<Option<f64>>,
    coal: Vec<Option<f64>>,
    solar: Vec<Option<f64>>,
    wind: Vec<Option<f64>>,
    hydro: Option<Vec<Option<f64>>>,
}

impl EnergyColumns {
    fn read(frame: &DataFrame, stage: Stage) -> Result<Self, TableError> {
        Ok(Self {
            total: float_values(frame, stage, EnergyVariable::TotalGeneration.label())?,
            coal: float_values(frame, stage, EnergyVariable::Coal.label())?,
            solar: float_values(frame, stage, EnergyVariable::Solar.label())?,
            wind: float_values(frame, stage, EnergyVariable::Wind.label())?,
            hydro: optional_float_values(frame, stage, EnergyVariable::Hydro.label())?,
        })
    }

    /// An absent `Hydro` column means hydro is not tracked, never that it was zero.
    fn sources(&self) -> TrackedSources {
        TrackedSources::with_hydro(self.hydro.is_some())
    }

    fn record(
        &self,
        row: usize,
        stage: Stage,
        region: Region,
        month: Month,
    ) -> Result<EnergyWideRecord, TableError> {
        let source = |values: &[Option<f64>], variable: EnergyVariable| {
            non_negative(values[row].unwrap_or(0.0), row, stage, variable)
        };
        let total = EnergyVariable::TotalGeneration;
        Ok(EnergyWideRecord {
            region,
            month,
            total_generation: non_negative(
                required(&self.total, row, stage, total.label())?,
                row,
                stage,
                total,
            )?,
            coal: source(&self.coal, EnergyVariable::Coal)?,
            solar: source(&self.solar, EnergyVariable::Solar)?,
            wind: source(&self.wind, EnergyVariable::Wind)?,
            hydro: self
                .hydro
                .as_deref()
                .map(|values| source(values, EnergyVariable::Hydro))
                .transpose()?,
        })
    }
}

fn non_negative(
    value: f64,
    row: usize,
    stage: Stage,
    variable: EnergyVariable,
) -> Result<f64, TableError> {
    if value < 0.0 {
        return Err(TableError::NegativeValue {
            stage,
            column: variable.label().to_string(),
            row,
            value,
        });
    }
    Ok(value)
}

fn energy_columns<T>(
    sources: TrackedSources,
    records: &[T],
    value: impl Fn(&T, EnergyVariable) -> Option<f64>,
) -> Vec<Column> {
    EnergyVariable::ALL
        .into_iter()
        .filter(|variable| sources.contains(variable.flag()))
        .map(|variable| {
            let values: Vec<f64> = records
                .iter()
                .map(|r| value(r, variable).unwrap_or(0.0))
                .collect();
            Column::new(variable.label().into(), values)
        })
        .collect()
}

pub fn energy_wide_from_frame(frame: &DataFrame) -> Result<EnergyWideTable, TableError> {
    let stage = Stage::DatasetMerge;
    let keys = KeyColumns::read(frame, stage)?;
    let energy = EnergyColumns::read(frame, stage)?;

    let records = (0..frame.height())
        .map(|row| {
            let (region, month) = keys.key(row)?;
            energy.record(row, stage, region, month)
        })
        .collect::<Result<Vec<_>, TableError>>()?;
    Ok(EnergyWideTable {
        sources: energy.sources(),
        records,
    })
}

pub fn energy_wide_to_frame(table: &EnergyWideTable) -> Result<DataFrame, TableError> {
    let mut columns = key_columns(table.records.iter().map(|r| (&r.region, r.month)));
    columns.extend(energy_columns(table.sources, &table.records, |r, v| r.value(v)));
    Ok(DataFrame::new(columns)?)
}

pub fn master_from_frame(frame: &DataFrame) -> Result<MasterTable, TableError> {
    let stage = Stage::DatasetLoad;
    let keys = KeyColumns::read(frame, stage)?;
    let energy = EnergyColumns::read(frame, stage)?;
    let weather = ClimateField::ALL.map(|f| f.column_name());
    let [max_temp, min_temp, humidity, precipitation] = [
        float_values(frame, stage, weather[0])?,
        float_values(frame, stage, weather[1])?,
        float_values(frame, stage, weather[2])?,
        float_values(frame, stage, weather[3])?,
    ];
    let solar_share = optional_float_values(frame, stage, MasterField::SolarShare.column_name())?;

    let records = (0..frame.height())
        .map(|row| {
            let (region, month) = keys.key(row)?;
            let energy_row = energy.record(row, stage, region.clone(), month)?;
            Ok(MasterRecord {
                region,
                month,
                max_temp_mean: required(&max_temp, row, stage, weather[0])?,
                min_temp_mean: required(&min_temp, row, stage, weather[1])?,
                humidity_mean: required(&humidity, row, stage, weather[2])?,
                precipitation_total: required(&precipitation, row, stage, weather[3])?,
                total_generation: energy_row.total_generation,
                coal: energy_row.coal,
                solar: energy_row.solar,
                wind: energy_row.wind,
                hydro: energy_row.hydro,
                solar_share: solar_share.as_ref().and_then(|shares| shares[row]),
            })
        })
        .collect::<Result<Vec<_>, TableError>>()?;
    Ok(MasterTable {
        sources: energy.sources(),
        records,
    })
}

pub fn master_to_frame(table: &MasterTable) -> Result<DataFrame, TableError> {
    let records = &table.records;
    let mut columns = key_columns(records.iter().map(|r| (&r.region, r.month)));
    for field in [
        MasterField::MaxTemp,
        MasterField::MinTemp,
        MasterField::Humidity,
        MasterField::Precipitation,
    ] {
        columns.push(Column::new(
            field.column_name().into(),
            records
                .iter()
                .map(|r| field.value(r))
                .collect::<Vec<_>>(),
        ));
    }
    columns.extend(energy_columns(table.sources, records, |r, v| r.source_value(v)));
    columns.push(Column::new(
        MasterField::SolarShare.column_name().into(),
        records.iter().map(|r| r.solar_share).collect::<Vec<_>>(),
    ));
    Ok(DataFrame::new(columns)?)
}
