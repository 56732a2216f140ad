//! Prediction market quotes for daily high-temperature contracts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One contract of a daily temperature event, as returned by Kalshi
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketQuote {
    pub ticker: String,
    /// Strike temperature in °F
    #[serde(default, rename = "floor_strike")]
    pub strike_temperature: Option<f64>,
    /// Contract description such as "83° or above"
    #[serde(default)]
    pub yes_sub_title: Option<String>,
    /// Yes ask in cents
    #[serde(default)]
    pub yes_ask: i64,
    /// No ask in cents
    #[serde(default)]
    pub no_ask: i64,
    #[serde(default)]
    pub volume: i64,
    #[serde(default)]
    pub open_interest: i64,
    #[serde(default)]
    pub close_time: Option<DateTime<Utc>>,
}

impl MarketQuote {
    /// Short contract label: `>83°` when the subtitle names a temperature
    #[must_use]
    pub fn contract_label(&self) -> String {
        let Some(subtitle) = &self.yes_sub_title else {
            return "N/A".to_string();
        };

        // first run of digits directly followed by a degree sign
        let mut digits_start = None;
        for (idx, ch) in subtitle.char_indices() {
            if ch.is_ascii_digit() {
                digits_start.get_or_insert(idx);
            } else {
                if ch == '°' {
                    if let Some(start) = digits_start {
                        return format!(">{}°", &subtitle[start..idx]);
                    }
                }
                digits_start = None;
            }
        }
        subtitle.clone()
    }

    /// Yes price for display, `-` for degenerate quotes
    #[must_use]
    pub fn yes_display(&self) -> String {
        format_price(self.yes_ask)
    }

    /// No price for display, `-` for degenerate quotes
    #[must_use]
    pub fn no_display(&self) -> String {
        format_price(self.no_ask)
    }
}

fn format_price(cents: i64) -> String {
    match cents {
        0 | 1 | 100 => "-".to_string(),
        cents => format!("{cents}¢"),
    }
}
