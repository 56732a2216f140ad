//! Raw readings as delivered by the weather fetchers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A station observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawObservation {
    pub timestamp: DateTime<Utc>,
    /// Temperature in Celsius, absent when the station did not report one
    pub temperature_c: Option<f64>,
    /// Whether the observation came with a non-empty METAR message
    pub has_raw_message: bool,
}

/// A grid forecast value tagged with an ISO-8601 interval such as
/// `2026-01-25T19:00:00+00:00/PT1H`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawGridValue {
    pub valid_time: String,
    /// Temperature in Celsius
    pub value_c: Option<f64>,
}

impl RawGridValue {
    /// Start instant of the validity interval, `None` if it does not parse
    #[must_use]
    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        let start = self.valid_time.split('/').next()?;
        DateTime::parse_from_rfc3339(start.trim())
            .ok()
            .map(|time| time.with_timezone(&Utc))
    }
}

/// One period of the hourly forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawForecastPeriod {
    pub start_time: DateTime<Utc>,
    /// Temperature in the display unit (Fahrenheit)
    pub temperature: f64,
}
