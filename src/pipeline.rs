//! Orchestration of the stages: climate aggregation and energy reshaping feed the merge,
//! the merged table gets its solar share, and single regions are analyzed on demand.

use crate::anomaly::{AnomalyCorrector, SolarShareCorrection};
use crate::climate::{ClimateAggregation, ClimateAggregator};
use crate::config::{ConfigError, PipelineConfig};
use crate::correlation::{Correlation, CorrelationAnalyzer, CorrelationResult};
use crate::energy::{EnergyReshape, EnergyReshaper};
use crate::error::PipelineError;
use crate::fetch::{FetchReport, WeatherFetcher};
use crate::merge::{DatasetMerger, MergeReport};
use crate::table;
use crate::types::energy::{EnergyLongRecord, EnergyWideTable};
use crate::types::master::{MasterRecord, MasterTable};
use crate::types::month::Month;
use crate::types::quality::DataQualityWarning;
use crate::types::region::Region;
use crate::types::sources::EnergyVariable;
use crate::types::weather::{DailyObservation, MonthlyWeatherRecord};
use log::info;
use std::fmt;

/// Per-region result of the solar-share correction.
#[derive(Debug, Clone, PartialEq)]
pub struct AnomalySummary {
    pub region: Region,
    pub anomaly: bool,
    pub max_raw_share: Option<f64>,
    pub capped_rows: usize,
}

impl From<&SolarShareCorrection> for AnomalySummary {
    fn from(correction: &SolarShareCorrection) -> Self {
        Self {
            region: correction.region.clone(),
            anomaly: correction.anomaly,
            max_raw_share: correction.max_raw_share,
            capped_rows: correction.capped_rows,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    pub monthly_weather: Vec<MonthlyWeatherRecord>,
    pub energy: EnergyWideTable,
    /// Master table with `solar_share` populated for every row.
    pub master: MasterTable,
    pub merge_report: MergeReport,
    pub anomalies: Vec<AnomalySummary>,
    pub warnings: Vec<DataQualityWarning>,
}

/// Result of the on-disk merge step.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedMaster {
    pub master: MasterTable,
    pub report: MergeReport,
    pub anomalies: Vec<AnomalySummary>,
    pub warnings: Vec<DataQualityWarning>,
}

/// Headline figures for one region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionMetrics {
    pub mean_max_temp: f64,
    /// Summed total generation, GWh.
    pub total_generation: f64,
    /// `sum(solar) / sum(total)` in percent, capped at 100.
    pub solar_contribution: f64,
    pub mean_humidity: f64,
}

/// Monthly generation of one source.
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyMixSeries {
    pub variable: EnergyVariable,
    pub points: Vec<(Month, f64)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Info,
}

/// Something the presentation layer should tell the user about a region.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    AnomalyCorrected { region: Region, max_raw_share: f64 },
    InsufficientVariance { region: Region },
}

impl Notice {
    pub fn severity(&self) -> Severity {
        match self {
            Notice::AnomalyCorrected { .. } => Severity::Warning,
            Notice::InsufficientVariance { .. } => Severity::Info,
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::AnomalyCorrected { region, .. } => write!(
                f,
                "In {region}, internal solar data exceeds reported generation. Share has been capped at 100% for analysis."
            ),
            Notice::InsufficientVariance { region } => write!(
                f,
                "Insufficient variance in {region} data to calculate Pearson correlation."
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegionAnalysis {
    pub region: Region,
    /// The region's rows sorted by month, with corrected solar share.
    pub records: Vec<MasterRecord>,
    pub anomaly: bool,
    pub max_raw_share: Option<f64>,
    pub correlation: CorrelationResult,
    pub metrics: RegionMetrics,
    /// One series per tracked source, in display order.
    pub energy_mix: Vec<EnergyMixSeries>,
}

impl RegionAnalysis {
    pub fn notices(&self) -> Vec<Notice> {
        let mut notices = Vec::new();
        if let (true, Some(max_raw_share)) = (self.anomaly, self.max_raw_share) {
            notices.push(Notice::AnomalyCorrected {
                region: self.region.clone(),
                max_raw_share,
            });
        }
        if self.correlation.correlation == Correlation::InsufficientVariance {
            notices.push(Notice::InsufficientVariance {
                region: self.region.clone(),
            });
        }
        notices
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    corrector: AnomalyCorrector,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self {
            config: PipelineConfig::default(),
            corrector: AnomalyCorrector::default(),
        }
    }
}

impl Pipeline {
    /// # Errors
    ///
    /// [`ConfigError::InvalidEpsilon`] when the configured share epsilon is not positive.
    pub fn new(config: PipelineConfig) -> Result<Self, ConfigError> {
        let corrector = AnomalyCorrector::new(config.share_epsilon)?;
        Ok(Self { config, corrector })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Runs aggregation, reshaping, merge and solar-share correction on in-memory inputs.
    pub fn run(
        &self,
        daily: &[DailyObservation],
        energy: &[EnergyLongRecord],
    ) -> Result<PipelineOutput, PipelineError> {
        let climate = ClimateAggregator::new(self.config.sentinel).aggregate(daily)?;
        let reshaped = EnergyReshaper::new(self.config.tracked_sources()).reshape(energy)?;
        let merged = DatasetMerger.merge(&climate.records, &reshaped.table)?;

        let mut warnings = climate.warnings;
        warnings.extend(reshaped.warnings);
        let (master, anomalies) = self.apply_solar_share(merged.table, &mut warnings);

        Ok(PipelineOutput {
            monthly_weather: climate.records,
            energy: reshaped.table,
            master,
            merge_report: merged.report,
            anomalies,
            warnings,
        })
    }

    /// Populates the solar share of every region of a merged table.
    fn apply_solar_share(
        &self,
        table: MasterTable,
        warnings: &mut Vec<DataQualityWarning>,
    ) -> (MasterTable, Vec<AnomalySummary>) {
        let corrector = self.corrector;
        let mut records = Vec::with_capacity(table.len());
        let mut anomalies = Vec::new();
        for region in table.regions() {
            let correction = corrector.correct(&region, &table.region_subset(&region));
            warnings.extend(correction.warning());
            anomalies.push(AnomalySummary::from(&correction));
            records.extend(correction.records);
        }
        let flagged = anomalies.iter().filter(|a| a.anomaly).count();
        info!(
            "Solar share computed for {} regions, {} flagged",
            anomalies.len(),
            flagged
        );
        (
            MasterTable {
                sources: table.sources,
                records,
            },
            anomalies,
        )
    }

    /// Reads the raw weather file and writes the monthly weather table.
    pub fn preprocess_weather(&self) -> Result<ClimateAggregation, PipelineError> {
        let paths = &self.config.paths;
        let daily = table::read_daily_observations(&paths.raw_weather)?;
        let climate = ClimateAggregator::new(self.config.sentinel).aggregate(&daily)?;
        table::write_monthly_weather(&paths.monthly_weather, &climate.records)?;
        Ok(climate)
    }

    /// Reads the raw generation release and writes the wide energy table.
    pub fn process_energy(&self) -> Result<EnergyReshape, PipelineError> {
        let paths = &self.config.paths;
        let long = table::read_energy_long(&paths.raw_energy)?;
        let reshaped = EnergyReshaper::new(self.config.tracked_sources()).reshape(&long)?;
        table::write_energy_wide(&paths.energy_wide, &reshaped.table)?;
        Ok(reshaped)
    }

    /// Joins the two processed tables on disk and writes the master table.
    pub fn merge_processed(&self) -> Result<MergedMaster, PipelineError> {
        let paths = &self.config.paths;
        let weather = table::read_frame(&paths.monthly_weather)?;
        let energy = table::read_frame(&paths.energy_wide)?;
        let merged = DatasetMerger.merge_frames(&weather, &energy)?;
        let mut warnings = Vec::new();
        let (master, anomalies) = self.apply_solar_share(merged.table, &mut warnings);
        table::write_master(&paths.master, &master)?;
        Ok(MergedMaster {
            master,
            report: merged.report,
            anomalies,
            warnings,
        })
    }

    /// Runs the full pipeline from the configured raw files and persists the weather,
    /// energy and master tables.
    pub fn run_files(&self) -> Result<PipelineOutput, PipelineError> {
        let paths = &self.config.paths;
        let daily = table::read_daily_observations(&paths.raw_weather)?;
        let long = table::read_energy_long(&paths.raw_energy)?;
        let output = self.run(&daily, &long)?;

        table::write_monthly_weather(&paths.monthly_weather, &output.monthly_weather)?;
        table::write_energy_wide(&paths.energy_wide, &output.energy)?;
        table::write_master(&paths.master, &output.master)?;
        Ok(output)
    }

    /// Fetches daily weather for the built-in regions and writes the raw weather file.
    pub async fn fetch_raw_weather(
        &self,
        fetcher: &WeatherFetcher,
    ) -> Result<FetchReport, PipelineError> {
        let report = fetcher.fetch_known_regions().await;
        table::write_daily_observations(&self.config.paths.raw_weather, &report.observations)?;
        Ok(report)
    }

    /// Everything shown for a single region: corrected rows, correlation, key metrics and
    /// the energy mix.
    ///
    /// # Errors
    ///
    /// [`PipelineError::UnknownRegion`] when no row of `master` belongs to `region`.
    pub fn analyze_region(
        &self,
        master: &MasterTable,
        region: &str,
    ) -> Result<RegionAnalysis, PipelineError> {
        let region = master
            .find_region(region)
            .ok_or_else(|| PipelineError::UnknownRegion(region.trim().to_string()))?;
        let subset = master.region_subset(&region);
        let corrector = self.corrector;
        let correction = corrector.correct(&region, &subset);
        let correlation = CorrelationAnalyzer.analyze(&region, &subset);

        let metrics = RegionMetrics {
            mean_max_temp: mean(subset.iter().map(|r| r.max_temp_mean)),
            total_generation: subset.iter().map(|r| r.total_generation).sum(),
            solar_contribution: corrector.solar_contribution(&subset).unwrap_or(0.0),
            mean_humidity: mean(subset.iter().map(|r| r.humidity_mean)),
        };
        let energy_mix = master
            .sources
            .source_variables()
            .into_iter()
            .map(|variable| EnergyMixSeries {
                variable,
                points: subset
                    .iter()
                    .filter_map(|r| r.source_value(variable).map(|v| (r.month, v)))
                    .collect(),
            })
            .collect();

        Ok(RegionAnalysis {
            region,
            records: correction.records,
            anomaly: correction.anomaly,
            max_raw_share: correction.max_raw_share,
            correlation,
            metrics,
            energy_mix,
        })
    }
}
