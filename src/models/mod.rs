//! Data models for the TempBoard dashboard
//!
//! This module contains the core domain models organized by concern:
//! - Location: the fixed set of airport stations
//! - Observation: raw readings as fetched from the weather service
//! - Timeline: merged samples and derived statistics
//! - Market: prediction market quotes

pub mod location;
pub mod market;
pub mod observation;
pub mod timeline;

// Re-export all public types for convenient access
pub use location::{LOCATIONS, Location};
pub use market::MarketQuote;
pub use observation::{RawForecastPeriod, RawGridValue, RawObservation};
pub use timeline::{Reading, Sample, SampleSource, Timeline, TimelineStats, Trend};
