//! Airport locations the dashboard knows about

use chrono_tz::Tz;
use chrono_tz::America;

/// An airport weather station
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    /// ICAO station identifier, also used for NWS observations
    pub code: &'static str,
    /// Display name
    pub name: &'static str,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// IANA time zone the station's "today" is computed in
    pub time_zone: Tz,
}

impl Location {
    /// Short label for selector buttons ("KAUS" -> "AUS")
    #[must_use]
    pub fn short_code(&self) -> &'static str {
        self.code.strip_prefix('K').unwrap_or(self.code)
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Every selectable location, in selector order
pub static LOCATIONS: &[Location] = &[
    Location {
        code: "KLAX",
        name: "Los Angeles",
        latitude: 33.9425,
        longitude: -118.4081,
        time_zone: America::Los_Angeles,
    },
    Location {
        code: "KNYC",
        name: "New York Central Park",
        latitude: 40.7789,
        longitude: -73.9692,
        time_zone: America::New_York,
    },
    Location {
        code: "KSFO",
        name: "San Francisco",
        latitude: 37.6213,
        longitude: -122.3790,
        time_zone: America::Los_Angeles,
    },
    Location {
        code: "KMIA",
        name: "Miami",
        latitude: 25.7959,
        longitude: -80.2870,
        time_zone: America::New_York,
    },
    Location {
        code: "KDEN",
        name: "Denver",
        latitude: 39.8561,
        longitude: -104.6737,
        time_zone: America::Denver,
    },
    Location {
        code: "KHOU",
        name: "Houston Hobby",
        latitude: 29.6454,
        longitude: -95.2789,
        time_zone: America::Chicago,
    },
    Location {
        code: "KSEA",
        name: "Seattle",
        latitude: 47.4502,
        longitude: -122.3088,
        time_zone: America::Los_Angeles,
    },
    Location {
        code: "KAUS",
        name: "Austin",
        latitude: 30.1945,
        longitude: -97.6699,
        time_zone: America::Chicago,
    },
    Location {
        code: "KDFW",
        name: "Dallas Fort Worth",
        latitude: 32.8968,
        longitude: -97.0380,
        time_zone: America::Chicago,
    },
    Location {
        code: "KMDW",
        name: "Chicago Midway",
        latitude: 41.7868,
        longitude: -87.7522,
        time_zone: America::Chicago,
    },
];

/// Look up a location by station code, ignoring case
#[must_use]
pub fn find(code: &str) -> Option<&'static Location> {
    LOCATIONS
        .iter()
        .find(|location| location.code.eq_ignore_ascii_case(code.trim()))
}
