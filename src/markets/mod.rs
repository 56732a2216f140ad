//! Prediction market quotes for daily high-temperature events
//!
//! Market data is optional decoration on the dashboard. A source answers
//! `None` whenever it has nothing to show, whether the location has no series,
//! markets are disabled or the request failed.

pub mod kalshi;

use crate::models::MarketQuote;
use async_trait::async_trait;
use chrono::NaiveDate;

pub use kalshi::KalshiClient;

#[async_trait]
pub trait MarketSource: Send + Sync {
    /// Open markets of the location's daily high event on `date`
    async fn markets(&self, station_code: &str, date: NaiveDate) -> Option<Vec<MarketQuote>>;
}

/// Kalshi series of the daily high-temperature event for a station
#[must_use]
pub fn series_ticker(station_code: &str) -> Option<&'static str> {
    match station_code.to_ascii_uppercase().as_str() {
        "KDEN" => Some("KXHIGHDEN"),
        "KLAX" => Some("KXHIGHLAX"),
        "KNYC" => Some("KXHIGHNY"),
        "KMDW" => Some("KXHIGHCHI"),
        "KIAH" | "KHOU" => Some("KXHOUHIGH"),
        "KAUS" => Some("KXHIGHAUS"),
        "KMIA" => Some("KXHIGHMIA"),
        _ => None,
    }
}

/// Event ticker of `series` on `date`: `KXHIGHAUS-26JAN28`
#[must_use]
pub fn event_ticker(series: &str, date: NaiveDate) -> String {
    format!("{}-{}", series, date.format("%y%b%d").to_string().to_uppercase())
}
