//! Timeline builder
//!
//! Merges station observations, grid forecast values and hourly forecast
//! periods into one sample per time slot of the local day. Feeds are ingested
//! in that order and a sample is only added when no accepted sample lies
//! within [`SLOT_TOLERANCE_MINUTES`], so observations win over grid values and
//! grid values win over forecast periods.

pub mod stats;

use crate::day_window::DayWindow;
use crate::models::{
    Location, RawForecastPeriod, RawGridValue, RawObservation, Sample, SampleSource, Timeline,
};
use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeSet;
use std::ops::Bound::Excluded;
use tracing::{debug, instrument};

/// Two samples closer than this occupy the same slot
pub const SLOT_TOLERANCE_MINUTES: i64 = 30;

/// Celsius to Fahrenheit, rounded to one decimal
#[must_use]
pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    round_tenth(celsius * 9.0 / 5.0 + 32.0)
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Samples accepted so far, with an index of their instants for slot lookups
struct Accumulator {
    samples: Vec<Sample>,
    instants: BTreeSet<DateTime<Utc>>,
    tolerance: Duration,
}

impl Accumulator {
    fn new() -> Self {
        Self {
            samples: Vec::new(),
            instants: BTreeSet::new(),
            tolerance: Duration::minutes(SLOT_TOLERANCE_MINUTES),
        }
    }

    /// Whether an accepted sample lies strictly within the tolerance of `time`
    fn slot_taken(&self, time: DateTime<Utc>) -> bool {
        self.instants
            .range((Excluded(time - self.tolerance), Excluded(time + self.tolerance)))
            .next()
            .is_some()
    }

    fn push(&mut self, sample: Sample) {
        self.instants.insert(sample.time);
        self.samples.push(sample);
    }
}

/// Merge the three feeds for `location` into a sorted, deduplicated timeline
/// and derive its statistics. Entries outside `window` or without a
/// temperature are dropped silently.
#[instrument(skip_all, fields(location = location.code))]
pub fn build_timeline(
    location: &Location,
    window: &DayWindow,
    observations: &[RawObservation],
    grid_values: &[RawGridValue],
    forecast_periods: &[RawForecastPeriod],
) -> Timeline {
    let now = window.now;
    let mut acc = Accumulator::new();

    for observation in observations {
        if !window.contains(observation.timestamp) {
            continue;
        }
        let Some(celsius) = observation.temperature_c else {
            continue;
        };
        acc.push(
            Sample::new(
                observation.timestamp,
                celsius_to_fahrenheit(celsius),
                SampleSource::Observation,
                now,
            )
            .high_confidence(observation.has_raw_message),
        );
    }
    let observed = acc.samples.len();

    for value in grid_values {
        let Some(start) = value.start_time() else {
            debug!("Skipping grid value with malformed interval {:?}", value.valid_time);
            continue;
        };
        if !window.contains(start) || acc.slot_taken(start) {
            continue;
        }
        if let Some(celsius) = value.value_c {
            acc.push(Sample::new(
                start,
                celsius_to_fahrenheit(celsius),
                SampleSource::Grid,
                now,
            ));
        }
    }
    let gridded = acc.samples.len() - observed;

    for period in forecast_periods {
        if !window.contains(period.start_time) || acc.slot_taken(period.start_time) {
            continue;
        }
        acc.push(Sample::new(
            period.start_time,
            period.temperature,
            SampleSource::Forecast,
            now,
        ));
    }
    let forecast = acc.samples.len() - observed - gridded;

    debug!(
        "Merged {} observations, {} grid values, {} forecast periods",
        observed, gridded, forecast
    );

    let mut samples = acc.samples;
    samples.sort_by_key(|sample| sample.time);
    let stats = stats::summarize(&mut samples, now);

    Timeline { samples, stats }
}
