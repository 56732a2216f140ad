//! Current sample, trend and extrema of a sorted timeline

use crate::models::{Sample, TimelineStats, Trend};
use chrono::{DateTime, Utc};

/// Average change per step above which the temperature counts as moving
const TREND_THRESHOLD_F: f64 = 1.0;

/// Flag the current, max, min and observed-max samples of a time-sorted
/// slice and return the matching statistics.
pub fn summarize(samples: &mut [Sample], now: DateTime<Utc>) -> TimelineStats {
    let Some(current) = nearest_index(samples, now) else {
        return TimelineStats::default();
    };
    samples[current].is_current = true;

    let trend = trend_at(samples, current);

    let max = first_extreme(samples, |candidate, best| candidate > best, |_| true);
    let min = first_extreme(samples, |candidate, best| candidate < best, |_| true);
    let observed_max = first_extreme(samples, |candidate, best| candidate > best, |s| s.is_past);

    if let Some(idx) = max {
        samples[idx].is_max = true;
    }
    if let Some(idx) = min {
        samples[idx].is_min = true;
    }
    if let Some(idx) = observed_max {
        samples[idx].is_observed_max = true;
    }

    TimelineStats {
        max: max.map(|idx| samples[idx].reading()),
        min: min.map(|idx| samples[idx].reading()),
        current: Some(samples[current].reading()),
        observed_max: observed_max.map(|idx| samples[idx].reading()),
        trend,
    }
}

/// Index of the sample closest to `now`; the earliest wins a tie
fn nearest_index(samples: &[Sample], now: DateTime<Utc>) -> Option<usize> {
    let mut best: Option<(usize, i64)> = None;
    for (idx, sample) in samples.iter().enumerate() {
        let distance = (sample.time - now).num_milliseconds().abs();
        if best.is_none_or(|(_, best_distance)| distance < best_distance) {
            best = Some((idx, distance));
        }
    }
    best.map(|(idx, _)| idx)
}

/// Trend around the sample at `current`
#[must_use]
pub fn trend_at(samples: &[Sample], current: usize) -> Trend {
    let temp = |idx: usize| samples[idx].temperature_f;
    let has_previous = current > 0;
    let has_next = current + 1 < samples.len();

    match (has_previous, has_next) {
        (true, true) => {
            let average_change = ((temp(current) - temp(current - 1))
                + (temp(current + 1) - temp(current)))
                / 2.0;
            if average_change > TREND_THRESHOLD_F {
                Trend::Increasing
            } else if average_change < -TREND_THRESHOLD_F {
                Trend::Decreasing
            } else {
                Trend::Stable
            }
        }
        (false, true) => direction(temp(current), temp(current + 1)),
        (true, false) => direction(temp(current - 1), temp(current)),
        (false, false) => Trend::Stable,
    }
}

fn direction(earlier: f64, later: f64) -> Trend {
    if later > earlier {
        Trend::Increasing
    } else if later < earlier {
        Trend::Decreasing
    } else {
        Trend::Stable
    }
}

/// First sample matching `eligible` whose temperature no other eligible sample beats
fn first_extreme(
    samples: &[Sample],
    beats: impl Fn(f64, f64) -> bool,
    eligible: impl Fn(&Sample) -> bool,
) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (idx, sample) in samples.iter().enumerate() {
        if !eligible(sample) {
            continue;
        }
        match best {
            Some(best_idx) if !beats(sample.temperature_f, samples[best_idx].temperature_f) => {}
            _ => best = Some(idx),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SampleSource;
    use chrono::{Duration, TimeZone};
    use rstest::rstest;

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 28, 12, 0, 0).unwrap()
    }

    /// Hourly samples starting at `base()`, `now` placed at `now_hour`
    fn series(temps: &[f64], now_hour: i64) -> (Vec<Sample>, DateTime<Utc>) {
        let now = base() + Duration::hours(now_hour);
        let samples = temps
            .iter()
            .enumerate()
            .map(|(i, t)| {
                let hour = i64::try_from(i).unwrap();
                Sample::new(base() + Duration::hours(hour), *t, SampleSource::Grid, now)
            })
            .collect();
        (samples, now)
    }

    #[rstest]
    #[case(&[60.0, 62.0, 64.0], 1, Trend::Increasing)]
    #[case(&[64.0, 62.0, 60.0], 1, Trend::Decreasing)]
    #[case(&[60.0, 60.0, 60.0], 1, Trend::Stable)]
    #[case(&[60.0, 61.0, 61.5], 1, Trend::Stable)]
    #[case(&[60.0, 59.0, 58.0], 1, Trend::Stable)]
    #[case(&[60.0, 60.5], 0, Trend::Increasing)]
    #[case(&[60.0, 59.9], 0, Trend::Decreasing)]
    #[case(&[60.0, 60.0], 0, Trend::Stable)]
    #[case(&[60.0, 60.2], 1, Trend::Increasing)]
    #[case(&[60.0, 59.5], 1, Trend::Decreasing)]
    #[case(&[60.0], 0, Trend::Stable)]
    fn test_trend(#[case] temps: &[f64], #[case] now_hour: i64, #[case] expected: Trend) {
        let (mut samples, now) = series(temps, now_hour);
        let stats = summarize(&mut samples, now);
        assert_eq!(stats.trend, expected);
    }

    #[test]
    fn test_extrema_flags() {
        let (mut samples, now) = series(&[70.0, 75.0, 68.0], 0);
        let stats = summarize(&mut samples, now);

        assert_eq!(stats.max.unwrap().temperature_f, 75.0);
        assert_eq!(stats.max.unwrap().time, samples[1].time);
        assert_eq!(stats.min.unwrap().temperature_f, 68.0);
        assert_eq!(stats.min.unwrap().time, samples[2].time);

        let max_flags: Vec<bool> = samples.iter().map(|s| s.is_max).collect();
        let min_flags: Vec<bool> = samples.iter().map(|s| s.is_min).collect();
        assert_eq!(max_flags, vec![false, true, false]);
        assert_eq!(min_flags, vec![false, false, true]);
    }

    #[test]
    fn test_extrema_ties_mark_first() {
        let (mut samples, now) = series(&[70.0, 75.0, 75.0, 68.0, 68.0], 0);
        summarize(&mut samples, now);
        assert_eq!(samples.iter().position(|s| s.is_max), Some(1));
        assert_eq!(samples.iter().position(|s| s.is_min), Some(3));
        assert_eq!(samples.iter().filter(|s| s.is_max).count(), 1);
        assert_eq!(samples.iter().filter(|s| s.is_min).count(), 1);
    }

    #[test]
    fn test_observed_max_ignores_future() {
        let (mut samples, now) = series(&[70.0, 72.0, 90.0], 1);
        let past: Vec<bool> = samples.iter().map(|s| s.is_past).collect();
        assert_eq!(past, vec![true, true, false]);

        let stats = summarize(&mut samples, now);
        assert_eq!(stats.observed_max.unwrap().temperature_f, 72.0);
        assert_eq!(stats.max.unwrap().temperature_f, 90.0);
        assert!(samples[1].is_observed_max);
        assert!(!samples[2].is_observed_max);
    }

    #[test]
    fn test_observed_max_absent_without_past_samples() {
        let (mut samples, now) = series(&[70.0, 72.0], -2);
        let stats = summarize(&mut samples, now);
        assert!(stats.observed_max.is_none());
        assert!(samples.iter().all(|s| !s.is_observed_max));
        assert!(samples[0].is_current);
    }

    #[test]
    fn test_current_tie_goes_to_earlier_sample() {
        let (mut samples, _) = series(&[50.0, 52.0], 0);
        let halfway = base() + Duration::minutes(30);
        let stats = summarize(&mut samples, halfway);
        assert!(samples[0].is_current);
        assert!(!samples[1].is_current);
        assert_eq!(stats.current.unwrap().temperature_f, 50.0);
    }

    #[test]
    fn test_empty_slice() {
        let mut samples: Vec<Sample> = Vec::new();
        let stats = summarize(&mut samples, base());
        assert_eq!(stats, TimelineStats::default());
    }
}
