//! `TempBoard` - airport temperature dashboard
//!
//! Merges NWS station observations, grid forecasts and hourly forecasts into
//! one timeline per local day, and shows it next to Kalshi high-temperature
//! market quotes.

pub mod api;
pub mod config;
pub mod dashboard;
pub mod day_window;
pub mod error;
pub mod logging;
pub mod markets;
pub mod models;
pub mod render;
pub mod timeline;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use config::AppConfig;
pub use dashboard::{Dashboard, LocationReport};
pub use day_window::{DayWindow, resolve_day_window};
pub use error::TempBoardError;
pub use markets::{KalshiClient, MarketSource};
pub use models::{Location, MarketQuote, Sample, Timeline, TimelineStats, Trend};
pub use timeline::build_timeline;
pub use weather::{NwsClient, WeatherSource};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, TempBoardError>;
