//! CSV persistence of the raw inputs and the three intermediate artifacts.

pub mod columns;
pub mod error;
pub mod frames;

use crate::table::error::TableError;
use crate::types::energy::{EnergyLongRecord, EnergyWideTable};
use crate::types::master::MasterTable;
use crate::types::weather::{DailyObservation, MonthlyWeatherRecord};
use log::{debug, info};
use polars::prelude::*;
use std::fs::{self, File};
use std::path::Path;

/// Reads a headered CSV file into a `DataFrame`.
///
/// # Errors
///
/// [`TableError::SourceNotFound`] when the file does not exist, [`TableError::CsvRead`]
/// when it cannot be parsed.
pub fn read_frame(path: &Path) -> Result<DataFrame, TableError> {
    if !path.is_file() {
        return Err(TableError::SourceNotFound(path.to_path_buf()));
    }
    let frame = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|source| TableError::CsvRead {
            path: path.to_path_buf(),
            source,
        })?
        .finish()
        .map_err(|source| TableError::CsvRead {
            path: path.to_path_buf(),
            source,
        })?;
    debug!(
        "Read {} rows x {} columns from {}",
        frame.height(),
        frame.width(),
        path.display()
    );
    Ok(frame)
}

/// Writes `frame` as a headered CSV file, creating parent directories as needed.
pub fn write_frame(path: &Path, frame: &mut DataFrame) -> Result<(), TableError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| TableError::Io(parent.to_path_buf(), e))?;
    }
    let mut file = File::create(path).map_err(|e| TableError::Io(path.to_path_buf(), e))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(frame)
        .map_err(|source| TableError::CsvWrite {
            path: path.to_path_buf(),
            source,
        })?;
    info!("Wrote {} rows to {}", frame.height(), path.display());
    Ok(())
}

pub fn read_daily_observations(path: &Path) -> Result<Vec<DailyObservation>, TableError> {
    frames::daily_observations_from_frame(&read_frame(path)?)
}

pub fn write_daily_observations(
    path: &Path,
    observations: &[DailyObservation],
) -> Result<(), TableError> {
    write_frame(path, &mut frames::daily_observations_to_frame(observations)?)
}

pub fn read_energy_long(path: &Path) -> Result<Vec<EnergyLongRecord>, TableError> {
    frames::energy_long_from_frame(&read_frame(path)?)
}

pub fn read_monthly_weather(path: &Path) -> Result<Vec<MonthlyWeatherRecord>, TableError> {
    frames::monthly_weather_from_frame(&read_frame(path)?)
}

pub fn write_monthly_weather(
    path: &Path,
    records: &[MonthlyWeatherRecord],
) -> Result<(), TableError> {
    write_frame(path, &mut frames::monthly_weather_to_frame(records)?)
}

pub fn read_energy_wide(path: &Path) -> Result<EnergyWideTable, TableError> {
    frames::energy_wide_from_frame(&read_frame(path)?)
}

pub fn write_energy_wide(path: &Path, table: &EnergyWideTable) -> Result<(), TableError> {
    write_frame(path, &mut frames::energy_wide_to_frame(table)?)
}

pub fn read_master(path: &Path) -> Result<MasterTable, TableError> {
    frames::master_from_frame(&read_frame(path)?)
}

pub fn write_master(path: &Path, table: &MasterTable) -> Result<(), TableError> {
    write_frame(path, &mut frames::master_to_frame(table)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::energy::EnergyWideRecord;
    use crate::types::month::Month;
    use crate::types::region::Region;
    use crate::types::sources::TrackedSources;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn missing_source_file_is_reported() {
        let err = read_energy_long(Path::new("no/such/india_energy.csv")).unwrap_err();
        assert!(err.is_source_not_found());
    }

    #[test]
    fn raw_weather_csv_with_bom_and_state_header() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("weather.csv");
        let mut file = File::create(&path)?;
        write!(
            file,
            "\u{feff}state,date,T2M_MAX,T2M_MIN,RH2M,PRECTOTCORR\n\
             Goa,20240101,31.2,22.1,70.5,0.0\n\
             Goa,20240102,-999.0,21.9,71.0,1.5\n"
        )?;
        drop(file);

        let rows = read_daily_observations(&path)?;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].region, "Goa");
        assert_eq!(rows[0].date, "20240101");
        assert_eq!(rows[1].max_temp, Some(-999.0));
        assert_eq!(rows[1].precipitation, Some(1.5));
        Ok(())
    }

    #[test]
    fn energy_wide_round_trips_through_csv() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("processed").join("energy_wide.csv");
        let table = EnergyWideTable {
            sources: TrackedSources::ALL,
            records: vec![
                EnergyWideRecord {
                    region: Region::new("Himachal Pradesh").unwrap(),
                    month: Month::new(6, 2024),
                    total_generation: 1500.0,
                    coal: 0.0,
                    solar: 25.5,
                    wind: 0.0,
                    hydro: Some(1450.0),
                },
                EnergyWideRecord {
                    region: Region::new("Himachal Pradesh").unwrap(),
                    month: Month::new(7, 2024),
                    total_generation: 1800.0,
                    coal: 0.0,
                    solar: 20.0,
                    wind: 0.0,
                    hydro: Some(1775.0),
                },
            ],
        };
        write_energy_wide(&path, &table)?;
        assert_eq!(read_energy_wide(&path)?, table);
        Ok(())
    }

    #[test]
    fn raw_energy_release_with_empty_values() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("release.csv");
        fs::write(
            &path,
            "State,Date,Category,Variable,Unit,Value\n\
             Goa,2024-01-01,Electricity generation,Solar,GWh,12.5\n\
             Goa,2024-01-01,Electricity generation,Wind,GWh,\n",
        )?;
        let rows = read_energy_long(&path)?;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].variable, "Solar");
        assert_eq!(rows[0].value, Some(12.5));
        assert_eq!(rows[1].value, None);
        Ok(())
    }

    #[test]
    fn master_csv_with_negative_solar_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("master.csv");
        fs::write(
            &path,
            "region,year,month,T2M_MAX,T2M_MIN,RH2M,PRECTOTCORR,Total Generation,Coal,Solar,Wind,Solar_Share\n\
             Goa,2024,1,31.0,22.0,70.0,0.0,100.0,80.0,-5.0,0.0,\n",
        )?;
        let err = read_master(&path).unwrap_err();
        match err {
            TableError::NegativeValue {
                column, row, value, ..
            } => {
                assert_eq!(column, "Solar");
                assert_eq!(row, 0);
                assert_eq!(value, -5.0);
            }
            other => panic!("unexpected error: {other}"),
        }
        Ok(())
    }
}
