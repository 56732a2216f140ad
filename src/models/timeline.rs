//! Merged timeline samples and the statistics derived from them

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which feed a sample was taken from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleSource {
    Observation,
    Grid,
    Forecast,
}

/// One slot of the local-day timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    pub time: DateTime<Utc>,
    /// Fahrenheit, rounded to one decimal at ingestion
    pub temperature_f: f64,
    pub source: SampleSource,
    pub is_past: bool,
    pub is_current: bool,
    pub is_high_confidence: bool,
    pub is_max: bool,
    pub is_min: bool,
    pub is_observed_max: bool,
}

impl Sample {
    #[must_use]
    pub fn new(
        time: DateTime<Utc>,
        temperature_f: f64,
        source: SampleSource,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            time,
            temperature_f,
            source,
            is_past: time <= now,
            is_current: false,
            is_high_confidence: false,
            is_max: false,
            is_min: false,
            is_observed_max: false,
        }
    }

    #[must_use]
    pub fn high_confidence(mut self, flag: bool) -> Self {
        self.is_high_confidence = flag;
        self
    }

    /// Value and time of this sample
    #[must_use]
    pub fn reading(&self) -> Reading {
        Reading {
            temperature_f: self.temperature_f,
            time: self.time,
        }
    }
}

/// Direction the temperature is heading around "now"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Increasing,
    Decreasing,
    #[default]
    Stable,
}

impl Trend {
    /// Arrow used by the dashboard
    #[must_use]
    pub fn arrow(self) -> &'static str {
        match self {
            Trend::Increasing => "↗",
            Trend::Decreasing => "↘",
            Trend::Stable => "→",
        }
    }

    /// Human label used by the dashboard
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Trend::Increasing => "Rising",
            Trend::Decreasing => "Falling",
            Trend::Stable => "Stable",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Trend::Increasing => "increasing",
            Trend::Decreasing => "decreasing",
            Trend::Stable => "stable",
        };
        f.write_str(text)
    }
}

/// A temperature together with the time of the sample it came from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    pub temperature_f: f64,
    pub time: DateTime<Utc>,
}

/// Aggregates over a timeline. Every reading is `None` for an empty timeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineStats {
    pub max: Option<Reading>,
    pub min: Option<Reading>,
    pub current: Option<Reading>,
    pub observed_max: Option<Reading>,
    pub trend: Trend,
}

/// Samples of one local day, sorted by time, plus their statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub samples: Vec<Sample>,
    pub stats: TimelineStats,
}

impl Timeline {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// The sample flagged as closest to "now"
    #[must_use]
    pub fn current_sample(&self) -> Option<&Sample> {
        self.samples.iter().find(|sample| sample.is_current)
    }
}
