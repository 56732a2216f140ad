//! Weather data sources
//!
//! The dashboard needs four feeds per location: station observations, the
//! point metadata that names a location's forecast endpoints, the hourly
//! forecast and the raw grid forecast. [`WeatherSource`] abstracts them so the
//! dashboard can be exercised without network access.

pub mod nws;

use crate::Result;
use crate::models::{RawForecastPeriod, RawGridValue, RawObservation};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use nws::NwsClient;

/// Forecast endpoints advertised for a coordinate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointMetadata {
    pub forecast_hourly: String,
    pub forecast_grid_data: String,
}

#[async_trait]
pub trait WeatherSource: Send + Sync {
    /// Observations reported by `station` between `start` and `end`
    async fn observations(
        &self,
        station: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<RawObservation>>;

    /// Forecast endpoints for a coordinate
    async fn point(&self, latitude: f64, longitude: f64) -> Result<PointMetadata>;

    /// Hourly forecast periods from the `forecast_hourly` endpoint
    async fn hourly_forecast(&self, url: &str) -> Result<Vec<RawForecastPeriod>>;

    /// Temperature series from the `forecast_grid_data` endpoint
    async fn grid_temperatures(&self, url: &str) -> Result<Vec<RawGridValue>>;
}
