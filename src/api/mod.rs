use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use crate::dashboard::LocationReport;
use crate::day_window::DayWindow;
use crate::models::{LOCATIONS, Location, MarketQuote, Sample, TimelineStats, location};
use crate::web::AppState;

pub mod relay;

/// JSON error body `{"error": "..."}` with a status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new<S: Into<String>>(status: StatusCode, message: S) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiLocation {
    pub code: String,
    pub short_code: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub time_zone: String,
}

impl From<&Location> for ApiLocation {
    fn from(location: &Location) -> Self {
        Self {
            code: location.code.to_string(),
            short_code: location.short_code().to_string(),
            name: location.name.to_string(),
            latitude: location.latitude,
            longitude: location.longitude,
            time_zone: location.time_zone.name().to_string(),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiReport {
    pub location: ApiLocation,
    pub window: DayWindow,
    pub samples: Vec<Sample>,
    pub stats: TimelineStats,
    pub markets: Option<Vec<MarketQuote>>,
    pub generated_at: DateTime<Utc>,
}

impl From<LocationReport> for ApiReport {
    fn from(report: LocationReport) -> Self {
        Self {
            location: ApiLocation::from(report.location),
            window: report.window,
            samples: report.timeline.samples,
            stats: report.timeline.stats,
            markets: report.markets,
            generated_at: report.generated_at,
        }
    }
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/locations", get(get_locations))
        .route("/timeline/{code}", get(get_timeline))
        .route("/relay", get(relay::relay))
}

async fn get_locations() -> Json<Vec<ApiLocation>> {
    Json(LOCATIONS.iter().map(ApiLocation::from).collect())
}

async fn get_timeline(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Json<ApiReport>, ApiError> {
    let location = location::find(&code).ok_or_else(|| {
        ApiError::new(StatusCode::NOT_FOUND, format!("Unknown location '{code}'"))
    })?;

    let report = state
        .dashboard
        .load(location, Utc::now())
        .await
        .map_err(|e| {
            warn!("Failed to load {}: {}", location.code, e);
            ApiError::new(StatusCode::BAD_GATEWAY, e.user_message())
        })?;

    Ok(Json(ApiReport::from(report)))
}
