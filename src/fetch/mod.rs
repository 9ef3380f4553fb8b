//! Retrieval of daily point weather from the NASA POWER API.
//!
//! Requests go out one region at a time with a fixed pause between them, each bounded by
//! its own timeout. A region that keeps failing is recorded and skipped; the rest of the
//! batch still runs.

pub mod error;
pub mod regions;

use crate::fetch::error::FetchError;
use crate::fetch::regions::{coordinates_for, LatLon, INDIAN_REGIONS};
use crate::types::weather::{ClimateField, DailyObservation};
use bon::{bon, Builder};
use log::{debug, info, warn};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::time::Duration;

pub const POWER_DAILY_POINT_URL: &str = "https://power.larc.nasa.gov/api/temporal/daily/point";
const POWER_COMMUNITY: &str = "SB";

/// Request settings for [`WeatherFetcher`].
///
/// ```
/// use climate_energy::FetchConfig;
/// use std::time::Duration;
///
/// let config = FetchConfig::builder()
///     .start("20240601")
///     .retries(2)
///     .build();
/// assert_eq!(config.end, "20250101");
/// assert_eq!(config.timeout, Duration::from_secs(30));
/// ```
#[derive(Debug, Clone, Builder)]
pub struct FetchConfig {
    #[builder(default = POWER_DAILY_POINT_URL.to_string(), into)]
    pub base_url: String,
    /// First day, `YYYYMMDD`.
    #[builder(default = "20240101".to_string(), into)]
    pub start: String,
    /// Last day, `YYYYMMDD`.
    #[builder(default = "20250101".to_string(), into)]
    pub end: String,
    #[builder(default = Duration::from_secs(30))]
    pub timeout: Duration,
    /// Pause between consecutive requests.
    #[builder(default = Duration::from_millis(500))]
    pub pacing: Duration,
    /// Extra attempts per region after the first failure.
    #[builder(default)]
    pub retries: u32,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[derive(Debug, Deserialize)]
struct PowerResponse {
    properties: PowerProperties,
}

#[derive(Debug, Deserialize)]
struct PowerProperties {
    parameter: HashMap<String, BTreeMap<String, Option<f64>>>,
}

/// Outcome of a batch fetch.
#[derive(Debug, Default)]
pub struct FetchReport {
    pub observations: Vec<DailyObservation>,
    pub fetched: Vec<String>,
    pub failed: Vec<(String, FetchError)>,
}

/// Converts a POWER daily point response into one observation per day.
///
/// Sentinel values are kept as delivered; resolving them is the aggregator's job.
pub fn parse_power_response(
    region: &str,
    body: &str,
) -> Result<Vec<DailyObservation>, FetchError> {
    let response: PowerResponse =
        serde_json::from_str(body).map_err(|source| FetchError::InvalidPayload {
            region: region.to_string(),
            source,
        })?;
    let parameter = &response.properties.parameter;

    let mut series = Vec::with_capacity(ClimateField::ALL.len());
    for field in ClimateField::ALL {
        let values = parameter
            .get(field.column_name())
            .ok_or(FetchError::MissingParameter {
                region: region.to_string(),
                parameter: field.column_name(),
            })?;
        series.push(values);
    }
    let days: BTreeSet<&String> = series.iter().flat_map(|s| s.keys()).collect();
    let value = |i: usize, day: &String| series[i].get(day).copied().flatten();

    Ok(days
        .into_iter()
        .map(|day| DailyObservation {
            region: region.to_string(),
            date: day.clone(),
            max_temp: value(0, day),
            min_temp: value(1, day),
            humidity: value(2, day),
            precipitation: value(3, day),
        })
        .collect())
}

pub struct WeatherFetcher {
    client: reqwest::Client,
    config: FetchConfig,
}

#[bon]
impl WeatherFetcher {
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(FetchError::ClientBuild)?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    async fn request(
        &self,
        region: &str,
        location: LatLon,
    ) -> Result<Vec<DailyObservation>, FetchError> {
        let url = &self.config.base_url;
        let parameters = ClimateField::ALL.map(|f| f.column_name()).join(",");
        let query = [
            ("parameters", parameters),
            ("community", POWER_COMMUNITY.to_string()),
            ("longitude", location.1.to_string()),
            ("latitude", location.0.to_string()),
            ("start", self.config.start.clone()),
            ("end", self.config.end.clone()),
            ("format", "JSON".to_string()),
        ];
        debug!("Requesting {} for {} at {:?}", url, region, location);

        let response = self
            .client
            .get(url)
            .query(&query)
            .send()
            .await
            .map_err(|e| FetchError::NetworkRequest(url.clone(), e))?;
        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {} ({}): {:?}", url, region, e);
                return Err(match e.status() {
                    Some(status) => FetchError::HttpStatus {
                        url: url.clone(),
                        status,
                        source: e,
                    },
                    None => FetchError::NetworkRequest(url.clone(), e),
                });
            }
        };
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::NetworkRequest(url.clone(), e))?;
        parse_power_response(region, &body)
    }

    /// Fetches one region, retrying up to the configured number of times.
    ///
    /// # Errors
    ///
    /// The error of the last attempt: [`FetchError::NetworkRequest`] or
    /// [`FetchError::HttpStatus`] for transport failures, [`FetchError::InvalidPayload`]
    /// or [`FetchError::MissingParameter`] for a response that cannot be used.
    pub async fn fetch_region(
        &self,
        region: &str,
        location: LatLon,
    ) -> Result<Vec<DailyObservation>, FetchError> {
        let mut attempt = 0;
        loop {
            match self.request(region, location).await {
                Ok(observations) => return Ok(observations),
                Err(e) if attempt < self.config.retries => {
                    attempt += 1;
                    warn!(
                        "Fetch for {} failed ({}), retry {}/{}",
                        region, e, attempt, self.config.retries
                    );
                    tokio::time::sleep(self.config.pacing).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Fetches a region of the built-in coordinate table by name.
    ///
    /// # Errors
    ///
    /// [`FetchError::UnknownRegion`] when the name has no known coordinates, otherwise as
    /// [`WeatherFetcher::fetch_region`].
    pub async fn fetch_named_region(
        &self,
        region: &str,
    ) -> Result<Vec<DailyObservation>, FetchError> {
        let location =
            coordinates_for(region).ok_or_else(|| FetchError::UnknownRegion(region.to_string()))?;
        self.fetch_region(region.trim(), location).await
    }

    /// Fetches every region in order, pausing between requests.
    ///
    /// Failed regions are logged and listed in [`FetchReport::failed`]; they never abort
    /// the batch.
    ///
    /// # Arguments
    ///
    /// * `.regions(Vec<(String, LatLon)>)`: **Required.** Region names and sampling points.
    /// * `.stop_after_failures(usize)`: Optional. Gives up on the remaining regions once
    ///   this many have failed. Unlimited by default.
    #[builder]
    pub async fn fetch_all(
        &self,
        regions: Vec<(String, LatLon)>,
        stop_after_failures: Option<usize>,
    ) -> FetchReport {
        info!("Starting weather fetch for {} regions", regions.len());
        let mut report = FetchReport::default();
        let total = regions.len();

        for (index, (region, location)) in regions.into_iter().enumerate() {
            if index > 0 {
                tokio::time::sleep(self.config.pacing).await;
            }
            match self.fetch_region(&region, location).await {
                Ok(observations) => {
                    info!("Fetched {} days for {}", observations.len(), region);
                    report.observations.extend(observations);
                    report.fetched.push(region);
                }
                Err(e) => {
                    warn!("Skipping {}: {}", region, e);
                    report.failed.push((region, e));
                    if stop_after_failures.is_some_and(|limit| report.failed.len() >= limit) {
                        warn!(
                            "Stopping after {} failures, {} region(s) not attempted",
                            report.failed.len(),
                            total - index - 1
                        );
                        break;
                    }
                }
            }
        }

        info!(
            "Weather fetch finished: {} fetched, {} failed, {} observations",
            report.fetched.len(),
            report.failed.len(),
            report.observations.len()
        );
        report
    }

    /// Fetches all regions of the built-in coordinate table.
    pub async fn fetch_known_regions(&self) -> FetchReport {
        let regions = INDIAN_REGIONS
            .iter()
            .map(|&(name, location)| (name.to_string(), location))
            .collect();
        self.fetch_all().regions(regions).call().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::weather::MISSING_SENTINEL;

    const BODY: &str = r#"{
        "type": "Feature",
        "properties": {
            "parameter": {
                "T2M_MAX": {"20240101": 29.8, "20240102": -999.0},
                "T2M_MIN": {"20240101": 21.3, "20240102": 20.9},
                "RH2M": {"20240101": 68.1, "20240102": 70.4},
                "PRECTOTCORR": {"20240101": 0.0, "20240102": 1.2}
            }
        }
    }"#;

    #[test]
    fn power_payload_becomes_daily_rows() -> Result<(), FetchError> {
        let rows = parse_power_response("Goa", BODY)?;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date, "20240101");
        assert_eq!(rows[0].region, "Goa");
        assert_eq!(rows[0].max_temp, Some(29.8));
        assert_eq!(rows[1].max_temp, Some(MISSING_SENTINEL));
        assert_eq!(rows[1].precipitation, Some(1.2));
        Ok(())
    }

    #[test]
    fn payload_without_a_parameter_is_rejected() {
        let body = r#"{"properties": {"parameter": {"T2M_MAX": {}}}}"#;
        let err = parse_power_response("Goa", body).unwrap_err();
        assert!(matches!(
            err,
            FetchError::MissingParameter {
                parameter: "T2M_MIN",
                ..
            }
        ));
    }

    #[test]
    fn garbage_is_an_invalid_payload() {
        let err = parse_power_response("Goa", "<html>").unwrap_err();
        assert!(matches!(err, FetchError::InvalidPayload { .. }));
    }

    #[test]
    fn default_config_matches_power_daily_endpoint() {
        let config = FetchConfig::default();
        assert_eq!(config.base_url, POWER_DAILY_POINT_URL);
        assert_eq!(config.start, "20240101");
        assert_eq!(config.pacing, Duration::from_millis(500));
        assert_eq!(config.retries, 0);
    }

    #[tokio::test]
    async fn unreachable_regions_are_skipped() -> Result<(), FetchError> {
        let config = FetchConfig::builder()
            .base_url("http://127.0.0.1:9/api/temporal/daily/point")
            .timeout(Duration::from_secs(2))
            .pacing(Duration::from_millis(1))
            .retries(1)
            .build();
        let fetcher = WeatherFetcher::new(config)?;
        let report = fetcher
            .fetch_all()
            .regions(vec![
                ("Goa".to_string(), LatLon(15.4909, 73.8278)),
                ("Kerala".to_string(), LatLon(8.5241, 76.9366)),
            ])
            .call()
            .await;
        assert!(report.observations.is_empty());
        assert!(report.fetched.is_empty());
        let failed: Vec<_> = report.failed.iter().map(|(r, _)| r.as_str()).collect();
        assert_eq!(failed, vec!["Goa", "Kerala"]);
        Ok(())
    }

    #[tokio::test]
    async fn batch_can_stop_early() -> Result<(), FetchError> {
        let config = FetchConfig::builder()
            .base_url("http://127.0.0.1:9/")
            .timeout(Duration::from_secs(2))
            .pacing(Duration::from_millis(1))
            .build();
        let fetcher = WeatherFetcher::new(config)?;
        let report = fetcher
            .fetch_all()
            .regions(vec![
                ("Goa".to_string(), LatLon(15.4909, 73.8278)),
                ("Kerala".to_string(), LatLon(8.5241, 76.9366)),
            ])
            .stop_after_failures(1)
            .call()
            .await;
        assert_eq!(report.failed.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn unknown_region_name_is_rejected_before_any_request() -> Result<(), FetchError> {
        let config = FetchConfig::builder()
            .base_url("http://127.0.0.1:9/")
            .timeout(Duration::from_secs(2))
            .build();
        let fetcher = WeatherFetcher::new(config)?;
        let err = fetcher.fetch_named_region("Atlantis").await.unwrap_err();
        assert!(matches!(err, FetchError::UnknownRegion(name) if name == "Atlantis"));

        let err = fetcher.fetch_named_region("goa").await.unwrap_err();
        assert!(matches!(err, FetchError::NetworkRequest(..)));
        Ok(())
    }
}
