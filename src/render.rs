//! Server-side HTML for the dashboard page

use crate::dashboard::LocationReport;
use crate::models::{LOCATIONS, Location, MarketQuote, Reading, Sample, SampleSource};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use std::fmt::Write;

const STYLE: &str = r#"
body { font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", sans-serif; background: #0f172a; color: #e2e8f0; margin: 0; padding: 24px; }
h1 { margin: 0 0 16px; font-size: 1.5em; }
.location-buttons { display: flex; flex-wrap: wrap; gap: 8px; margin-bottom: 16px; }
.location-buttons a, .refresh { padding: 6px 12px; border-radius: 6px; background: #1e293b; color: #e2e8f0; text-decoration: none; }
.location-buttons a.active { background: #3b82f6; }
.airport-card { background: #1e293b; border-radius: 12px; padding: 16px; max-width: 720px; }
.airport-header { display: flex; justify-content: space-between; font-size: 1.3em; margin-bottom: 12px; }
.stats-bar { display: flex; gap: 16px; margin-bottom: 16px; }
a.stat { color: inherit; text-decoration: none; }
.stat-label { font-size: 0.75em; color: #94a3b8; }
.stat-value { font-size: 1.4em; font-weight: bold; }
.stat-value.max { color: #ff4444; } .stat-value.min { color: #4444ff; } .stat-value.observed { color: #f59e0b; }
.stat-time { font-size: 0.75em; color: #94a3b8; }
.timeline-item { display: flex; justify-content: space-between; padding: 6px 8px; border-bottom: 1px solid #334155; }
.timeline-item.current { background: #1d4ed8; }
.timeline-item.past { opacity: 0.7; }
.label-badge { font-size: 0.75em; padding: 2px 6px; border-radius: 4px; background: #475569; margin-left: 4px; }
.label-badge.high-confidence { background: #10b981; } .label-badge.observed-max { background: #f59e0b; }
.label-badge.max { background: #ff4444; } .label-badge.min { background: #4444ff; }
.kalshi-section { margin: 16px 0; padding: 12px; background: #0f172a; border-radius: 8px; }
.orderbook-table { width: 100%; border-collapse: collapse; }
.orderbook-table td, .orderbook-table th { padding: 4px 8px; text-align: left; }
.market-stats { display: flex; flex-wrap: wrap; gap: 16px; margin-top: 8px; font-size: 0.85em; }
.error { background: #7f1d1d; padding: 12px; border-radius: 8px; max-width: 720px; }
"#;

/// Escape text for use in HTML content and attribute values
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn local_time(time: DateTime<Utc>, tz: Tz) -> String {
    time.with_timezone(&tz).format("%I:%M %p").to_string()
}

/// `1234567` -> `1,234,567`
fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::new();
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if value < 0 {
        grouped.insert(0, '-');
    }
    grouped
}

/// Full page with the location selector; `body` is already rendered HTML
#[must_use]
pub fn page(selected: &Location, body: &str) -> String {
    let mut buttons = String::new();
    for location in LOCATIONS {
        let class = if location.code == selected.code { " class=\"active\"" } else { "" };
        let _ = write!(
            buttons,
            "<a href=\"/?location={}\"{} title=\"{}\">{}</a>",
            location.code,
            class,
            escape_html(location.name),
            location.short_code()
        );
    }

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>Temperature Dashboard - {name}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
         <h1>Airport Temperatures</h1>\n\
         <div class=\"location-buttons\">{buttons}</div>\n\
         <p><a class=\"refresh\" href=\"/?location={code}\">Refresh</a></p>\n\
         {body}\n</body>\n</html>\n",
        name = escape_html(selected.name),
        code = selected.code,
    )
}

/// Message shown in place of the card when a load fails
#[must_use]
pub fn error_message(message: &str) -> String {
    format!("<div class=\"error\">{}</div>", escape_html(message))
}

/// The airport card: stats bar, market section and timeline rows
#[must_use]
pub fn report_card(report: &LocationReport) -> String {
    let location = report.location;
    format!(
        "<div class=\"airport-card\">\n\
         <div class=\"airport-header\"><div class=\"airport-name\">{}</div><div class=\"airport-code\">{}</div></div>\n\
         <div class=\"stat-time\">{}</div>\n\
         {}\n{}\n<div class=\"timeline\">\n{}</div>\n</div>",
        escape_html(location.name),
        location.short_code(),
        location.format_coordinates(),
        stats_bar(report),
        market_section(report.markets.as_deref(), location),
        timeline_rows(&report.timeline.samples, location.time_zone),
    )
}

/// A stats-bar entry; present readings link to their timeline row
fn stat(
    label: &str,
    class: &str,
    anchor: &str,
    reading: Option<Reading>,
    detail: &str,
) -> String {
    let inner = match reading {
        Some(r) => format!("{:.1}°F", r.temperature_f),
        None => "--".to_string(),
    };
    let content = format!(
        "<div class=\"stat-label\">{label}</div>\
         <div class=\"stat-value {class}\">{inner}</div>{detail}"
    );
    if reading.is_some() {
        format!("<a class=\"stat\" href=\"#{anchor}\">{content}</a>")
    } else {
        format!("<div class=\"stat\">{content}</div>")
    }
}

/// `hh:mm AM (past)` or `hh:mm AM (forecast)` relative to `now`
fn stat_time(reading: Reading, now: DateTime<Utc>, tz: Tz) -> String {
    let tag = if reading.time <= now { "past" } else { "forecast" };
    format!(
        "<div class=\"stat-time\">{} ({tag})</div>",
        local_time(reading.time, tz)
    )
}

fn stats_bar(report: &LocationReport) -> String {
    let tz = report.location.time_zone;
    let now = report.window.now;
    let stats = &report.timeline.stats;
    let detail =
        |reading: Option<Reading>| reading.map_or_else(String::new, |r| stat_time(r, now, tz));
    let mut bar = String::from("<div class=\"stats-bar\">");

    if stats.observed_max.is_some() {
        bar.push_str(&stat(
            "OBSERVED MAX",
            "observed",
            "temp-observed-max",
            stats.observed_max,
            &detail(stats.observed_max),
        ));
    }

    bar.push_str(&stat("24hr MAX", "max", "temp-max", stats.max, &detail(stats.max)));

    let label = if stats.current.is_some() {
        format!(
            "CURRENT <span class=\"trend trend-{}\">{} {}</span>",
            stats.trend,
            stats.trend.arrow(),
            stats.trend.label()
        )
    } else {
        "CURRENT".to_string()
    };
    bar.push_str(&stat(&label, "current", "temp-current", stats.current, ""));
    bar.push_str(&stat("24hr MIN", "min", "temp-min", stats.min, &detail(stats.min)));

    bar.push_str("</div>");
    bar
}

fn market_section(markets: Option<&[MarketQuote]>, location: &Location) -> String {
    let name = escape_html(location.name);
    let Some(top) = markets.and_then(<[MarketQuote]>::first) else {
        return format!(
            "<div class=\"kalshi-section\"><div class=\"kalshi-header\">\
             <div class=\"kalshi-title\">Prediction Markets</div><div class=\"kalshi-logo\">KALSHI</div></div>\
             <div class=\"no-markets\">No active markets available for {name}</div></div>"
        );
    };

    let mut rows = String::new();
    for market in markets.unwrap_or_default() {
        let _ = write!(
            rows,
            "<tr><td class=\"contract-range\">{}</td>\
             <td class=\"price-cell price-yes\">{}</td>\
             <td class=\"price-cell price-no\">{}</td></tr>",
            escape_html(&market.contract_label()),
            market.yes_display(),
            market.no_display()
        );
    }

    let close_time = top.close_time.map_or_else(
        || "N/A".to_string(),
        |time| {
            time.with_timezone(&location.time_zone)
                .format("%b %-d, %I:%M %p %Z")
                .to_string()
        },
    );

    format!(
        "<div class=\"kalshi-section\"><div class=\"kalshi-header\">\
         <div class=\"kalshi-title\">{name} Temperature Markets</div><div class=\"kalshi-logo\">KALSHI</div></div>\
         <table class=\"orderbook-table\"><thead><tr><th>Contract</th><th>Yes</th><th>No</th></tr></thead>\
         <tbody>{rows}</tbody></table>\
         <div class=\"market-stats\">\
         <div class=\"market-stat-item\"><div class=\"market-stat-label\">Total Volume</div><div class=\"market-stat-value\">{}</div></div>\
         <div class=\"market-stat-item\"><div class=\"market-stat-label\">Open Interest</div><div class=\"market-stat-value\">{}</div></div>\
         <div class=\"market-stat-item\"><div class=\"market-stat-label\">Close Time</div><div class=\"market-stat-value\">{}</div></div>\
         <div class=\"market-stat-item\"><div class=\"market-stat-label\">Market Ticker</div><div class=\"market-stat-value\">{}</div></div>\
         </div></div>",
        group_thousands(top.volume),
        group_thousands(top.open_interest),
        close_time,
        escape_html(&top.ticker),
    )
}

fn timeline_rows(samples: &[Sample], tz: Tz) -> String {
    let mut rows = String::new();
    for sample in samples {
        let (class, badge) = if sample.is_current {
            ("timeline-item current", "<span class=\"label-badge current\">NOW</span>")
        } else if sample.is_past {
            ("timeline-item past", "<span class=\"label-badge past\">PAST</span>")
        } else {
            ("timeline-item", "<span class=\"label-badge\">FORECAST</span>")
        };

        let mut anchors = String::new();
        for (flag, id) in [
            (sample.is_current, "temp-current"),
            (sample.is_observed_max, "temp-observed-max"),
            (sample.is_max, "temp-max"),
            (sample.is_min, "temp-min"),
        ] {
            if flag {
                let _ = write!(anchors, "<span id=\"{id}\"></span>");
            }
        }

        let mut extra = String::new();
        if sample.is_high_confidence {
            extra.push_str("<span class=\"label-badge high-confidence\">(high confidence)</span>");
        }
        if sample.is_observed_max {
            extra.push_str("<span class=\"label-badge observed-max\">OBSERVED MAX</span>");
        }
        if sample.is_max {
            extra.push_str("<span class=\"label-badge max\">MAX</span>");
        }
        if sample.is_min {
            extra.push_str("<span class=\"label-badge min\">MIN</span>");
        }

        let _ = writeln!(
            rows,
            "<div class=\"{class}\" data-source=\"{}\">{anchors}<div class=\"time-label\">{badge} {}{extra}</div>\
             <div class=\"temp-value\">{:.1}°F</div></div>",
            match sample.source {
                SampleSource::Observation => "observation",
                SampleSource::Grid => "grid",
                SampleSource::Forecast => "forecast",
            },
            local_time(sample.time, tz),
            sample.temperature_f,
        );
    }
    rows
}
