//! Loads one location's snapshot: day window, weather feeds, market quotes
//! and the merged timeline.

use crate::Result;
use crate::day_window::{DayWindow, resolve_day_window};
use crate::markets::MarketSource;
use crate::models::{Location, MarketQuote, Reading, Timeline};
use crate::timeline::build_timeline;
use crate::weather::WeatherSource;
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument};

/// Everything rendered for one location
#[derive(Debug, Clone)]
pub struct LocationReport {
    pub location: &'static Location,
    pub window: DayWindow,
    pub timeline: Timeline,
    /// `None` when market data is unavailable
    pub markets: Option<Vec<MarketQuote>>,
    pub generated_at: DateTime<Utc>,
}

/// Data sources the dashboard loads from
#[derive(Clone)]
pub struct Dashboard {
    weather: Arc<dyn WeatherSource>,
    markets: Arc<dyn MarketSource>,
}

impl Dashboard {
    pub fn new(weather: Arc<dyn WeatherSource>, markets: Arc<dyn MarketSource>) -> Self {
        Self { weather, markets }
    }

    /// Fetch all feeds for `location` and build its report as of `now`.
    ///
    /// Fails if any weather request fails. Market failures only leave
    /// `markets` empty.
    #[instrument(skip(self, location), fields(location = location.code))]
    pub async fn load(
        &self,
        location: &'static Location,
        now: DateTime<Utc>,
    ) -> Result<LocationReport> {
        let start_time = Instant::now();
        let window = resolve_day_window(location.time_zone, now);

        let observations = self
            .weather
            .observations(location.code, window.start_of_day, now)
            .await?;
        let point = self
            .weather
            .point(location.latitude, location.longitude)
            .await?;

        let (hourly, grid, markets) = tokio::join!(
            self.weather.hourly_forecast(&point.forecast_hourly),
            self.weather.grid_temperatures(&point.forecast_grid_data),
            self.markets.markets(location.code, now.date_naive()),
        );
        let hourly = hourly?;
        let grid = grid?;

        let timeline = build_timeline(location, &window, &observations, &grid, &hourly);

        info!(
            "Loaded {} samples for {} in {:.3}s",
            timeline.samples.len(),
            location.code,
            start_time.elapsed().as_secs_f64()
        );

        Ok(LocationReport {
            location,
            window,
            timeline,
            markets,
            generated_at: now,
        })
    }
}

impl fmt::Display for LocationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tz = self.location.time_zone;
        let local_time =
            |time: DateTime<Utc>| time.with_timezone(&tz).format("%I:%M %p").to_string();
        let reading = |label: &str, reading: Option<Reading>| match reading {
            Some(r) => format!("{label:<14}{:.1}°F at {}", r.temperature_f, local_time(r.time)),
            None => format!("{label:<14}--"),
        };

        writeln!(
            f,
            "{} ({}) {}",
            self.location.name,
            self.location.code,
            self.window.now.with_timezone(&tz).format("%A, %B %-d %Y")
        )?;

        let stats = &self.timeline.stats;
        writeln!(f, "{}", reading("Observed max", stats.observed_max))?;
        writeln!(f, "{}", reading("24h max", stats.max))?;
        match stats.current {
            Some(r) => writeln!(
                f,
                "{:<14}{:.1}°F {} {}",
                "Current",
                r.temperature_f,
                stats.trend.arrow(),
                stats.trend.label()
            )?,
            None => writeln!(f, "{:<14}--", "Current")?,
        }
        writeln!(f, "{}", reading("24h min", stats.min))?;

        match &self.markets {
            Some(markets) if !markets.is_empty() => {
                writeln!(f)?;
                for market in markets {
                    writeln!(
                        f,
                        "  {:<8} yes {:>4}  no {:>4}",
                        market.contract_label(),
                        market.yes_display(),
                        market.no_display()
                    )?;
                }
            }
            _ => writeln!(f, "\nNo active markets available for {}", self.location.name)?,
        }

        writeln!(f)?;
        for sample in &self.timeline.samples {
            let status = if sample.is_current {
                "NOW"
            } else if sample.is_past {
                "PAST"
            } else {
                "FORECAST"
            };
            let mut flags = Vec::new();
            if sample.is_high_confidence {
                flags.push("METAR");
            }
            if sample.is_observed_max {
                flags.push("OBSERVED MAX");
            }
            if sample.is_max {
                flags.push("MAX");
            }
            if sample.is_min {
                flags.push("MIN");
            }
            writeln!(
                f,
                "{:<9}{}  {:>6.1}°F  {}",
                status,
                local_time(sample.time),
                sample.temperature_f,
                flags.join(" ")
            )?;
        }
        Ok(())
    }
}
