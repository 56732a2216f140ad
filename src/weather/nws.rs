//! National Weather Service client (api.weather.gov)
//!
//! All endpoints answer GeoJSON. Only the fields the dashboard reads are
//! decoded; entries whose timestamps do not parse are dropped.

use super::{PointMetadata, WeatherSource};
use crate::config::WeatherConfig;
use crate::models::{RawForecastPeriod, RawGridValue, RawObservation};
use crate::{Result, TempBoardError};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

const GEO_JSON: &str = "application/geo+json";

/// NWS API client
#[derive(Debug, Clone)]
pub struct NwsClient {
    client: Client,
    base_url: String,
}

impl NwsClient {
    /// Create a client from the weather configuration
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GEO_JSON));

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .build()
            .map_err(|e| TempBoardError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// GET `url` and decode the JSON body, failing on any non-success status
    #[instrument(skip(self))]
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let start_time = Instant::now();
        let response = self.client.get(url).send().await?;
        let status = response.status();

        debug!(
            "HTTP response received: {} in {:.3}s",
            status,
            start_time.elapsed().as_secs_f64()
        );

        if !status.is_success() {
            warn!("NWS request failed with HTTP {}", status.as_u16());
            return Err(TempBoardError::upstream(format!(
                "HTTP {} from {}",
                status.as_u16(),
                url
            )));
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl WeatherSource for NwsClient {
    #[instrument(skip(self))]
    async fn observations(
        &self,
        station: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<RawObservation>> {
        let url = format!(
            "{}/stations/{}/observations?start={}&end={}",
            self.base_url,
            urlencoding::encode(station),
            urlencoding::encode(&start.to_rfc3339_opts(SecondsFormat::Secs, true)),
            urlencoding::encode(&end.to_rfc3339_opts(SecondsFormat::Secs, true)),
        );

        let collection: geojson::ObservationCollection = self.get_json(&url).await?;
        let observations: Vec<RawObservation> = collection
            .features
            .into_iter()
            .filter_map(|feature| feature.properties.into_observation())
            .collect();

        info!("Fetched {} observations for {}", observations.len(), station);
        Ok(observations)
    }

    #[instrument(skip(self))]
    async fn point(&self, latitude: f64, longitude: f64) -> Result<PointMetadata> {
        let url = format!("{}/points/{:.4},{:.4}", self.base_url, latitude, longitude);

        let point: geojson::PointResponse = self.get_json(&url).await?;
        let properties = point.properties;

        match (properties.forecast_hourly, properties.forecast_grid_data) {
            (Some(forecast_hourly), Some(forecast_grid_data)) => Ok(PointMetadata {
                forecast_hourly,
                forecast_grid_data,
            }),
            _ => Err(TempBoardError::upstream(format!(
                "No forecast endpoints for point {latitude:.4},{longitude:.4}"
            ))),
        }
    }

    #[instrument(skip(self))]
    async fn hourly_forecast(&self, url: &str) -> Result<Vec<RawForecastPeriod>> {
        let forecast: geojson::HourlyForecast = self.get_json(url).await?;
        let periods: Vec<RawForecastPeriod> = forecast
            .properties
            .periods
            .into_iter()
            .filter_map(geojson::Period::into_forecast_period)
            .collect();

        debug!("Fetched {} hourly periods", periods.len());
        Ok(periods)
    }

    #[instrument(skip(self))]
    async fn grid_temperatures(&self, url: &str) -> Result<Vec<RawGridValue>> {
        let grid: geojson::GridData = self.get_json(url).await?;
        let values: Vec<RawGridValue> = grid
            .properties
            .temperature
            .map(|series| series.values)
            .unwrap_or_default()
            .into_iter()
            .map(|value| RawGridValue {
                valid_time: value.valid_time,
                value_c: value.value,
            })
            .collect();

        debug!("Fetched {} grid temperature values", values.len());
        Ok(values)
    }
}

/// NWS GeoJSON response structures
mod geojson {
    use super::{DateTime, Deserialize, RawForecastPeriod, RawObservation, Utc};

    fn parse_time(value: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(value)
            .ok()
            .map(|time| time.with_timezone(&Utc))
    }

    #[derive(Debug, Deserialize)]
    pub struct ObservationCollection {
        #[serde(default)]
        pub features: Vec<ObservationFeature>,
    }

    #[derive(Debug, Deserialize)]
    pub struct ObservationFeature {
        pub properties: ObservationProperties,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ObservationProperties {
        pub timestamp: Option<String>,
        #[serde(default)]
        pub temperature: Option<QuantitativeValue>,
        #[serde(default)]
        pub raw_message: Option<String>,
    }

    impl ObservationProperties {
        pub fn into_observation(self) -> Option<RawObservation> {
            let timestamp = parse_time(self.timestamp.as_deref()?)?;
            Some(RawObservation {
                timestamp,
                temperature_c: self.temperature.and_then(|t| t.value),
                has_raw_message: self
                    .raw_message
                    .is_some_and(|message| !message.is_empty()),
            })
        }
    }

    #[derive(Debug, Deserialize)]
    pub struct QuantitativeValue {
        pub value: Option<f64>,
    }

    #[derive(Debug, Deserialize)]
    pub struct PointResponse {
        pub properties: PointProperties,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PointProperties {
        pub forecast_hourly: Option<String>,
        pub forecast_grid_data: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    pub struct HourlyForecast {
        pub properties: HourlyProperties,
    }

    #[derive(Debug, Deserialize)]
    pub struct HourlyProperties {
        #[serde(default)]
        pub periods: Vec<Period>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Period {
        pub start_time: String,
        pub temperature: Option<f64>,
    }

    impl Period {
        pub fn into_forecast_period(self) -> Option<RawForecastPeriod> {
            Some(RawForecastPeriod {
                start_time: parse_time(&self.start_time)?,
                temperature: self.temperature?,
            })
        }
    }

    #[derive(Debug, Deserialize)]
    pub struct GridData {
        pub properties: GridProperties,
    }

    #[derive(Debug, Deserialize)]
    pub struct GridProperties {
        #[serde(default)]
        pub temperature: Option<GridSeries>,
    }

    #[derive(Debug, Deserialize)]
    pub struct GridSeries {
        #[serde(default)]
        pub values: Vec<GridValue>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GridValue {
        pub valid_time: String,
        pub value: Option<f64>,
    }
}
