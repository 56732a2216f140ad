use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::Html,
    routing::get,
};
use chrono::Utc;
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::dashboard::Dashboard;
use crate::markets::KalshiClient;
use crate::models::{Location, location};
use crate::weather::NwsClient;
use crate::{TempBoardError, api, render};

/// Shared, immutable state of every handler
pub struct AppState {
    pub dashboard: Dashboard,
    /// Client used by the relay endpoint
    pub http: reqwest::Client,
    /// The relay only forwards to this origin
    pub relay_origin: reqwest::Url,
    pub default_location: &'static Location,
}

impl AppState {
    /// Build the NWS and Kalshi clients described by `config`
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let weather = NwsClient::new(&config.weather)?;
        let markets = KalshiClient::new(&config.markets, config.weather.timeout_seconds)?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.weather.timeout_seconds.into()))
            .build()
            .with_context(|| "Failed to create relay HTTP client")?;

        let relay_origin = reqwest::Url::parse(&config.markets.base_url).map_err(|e| {
            TempBoardError::config(format!(
                "Invalid markets.base_url '{}': {e}",
                config.markets.base_url
            ))
        })?;

        let default_location = location::find(&config.defaults.location).ok_or_else(|| {
            TempBoardError::config(format!(
                "Unknown default location '{}'",
                config.defaults.location
            ))
        })?;

        Ok(Self {
            dashboard: Dashboard::new(Arc::new(weather), Arc::new(markets)),
            http,
            relay_origin,
            default_location,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub location: Option<String>,
}

/// Router with the dashboard page, the JSON API under `/api`, permissive CORS
/// and request tracing
pub fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(dashboard_page))
        .nest("/api", api::router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn dashboard_page(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PageParams>,
) -> (StatusCode, Html<String>) {
    let selected = match params.location.as_deref() {
        None | Some("") => state.default_location,
        Some(code) => match location::find(code) {
            Some(found) => found,
            None => {
                let body = render::error_message(&format!("Unknown location '{code}'"));
                return (
                    StatusCode::NOT_FOUND,
                    Html(render::page(state.default_location, &body)),
                );
            }
        },
    };

    match state.dashboard.load(selected, Utc::now()).await {
        Ok(report) => (
            StatusCode::OK,
            Html(render::page(selected, &render::report_card(&report))),
        ),
        Err(e) => {
            warn!("Failed to load {}: {}", selected.code, e);
            let body = render::error_message(&e.user_message());
            (StatusCode::BAD_GATEWAY, Html(render::page(selected, &body)))
        }
    }
}

/// Bind and serve until the process is stopped
pub async fn run(config: &AppConfig) -> Result<()> {
    let state = Arc::new(AppState::from_config(config)?);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Web server running at http://{}", addr);

    axum::serve(listener, app(state))
        .await
        .with_context(|| "Web server terminated")?;
    Ok(())
}
