//! End-to-end tests: router and dashboard against mocked NWS and Kalshi servers

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use chrono::{Duration, SecondsFormat, Utc};
use http_body_util::BodyExt;
use httpmock::prelude::*;
use serde_json::{Value, json};
use tempboard::config::AppConfig;
use tempboard::models::location;
use tempboard::resolve_day_window;
use tempboard::web::{AppState, app};
use tower::ServiceExt;

const GRID_PATH: &str = "/gridpoints/EWX/159,88";
const HOURLY_PATH: &str = "/gridpoints/EWX/159,88/forecast/hourly";

fn iso(time: chrono::DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// NWS mocks for Austin with one sample per feed, spread over today
async fn mock_nws(server: &MockServer, grid_status: u16) {
    let window = resolve_day_window(location::find("KAUS").unwrap().time_zone, Utc::now());
    let start = window.start_of_day;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/stations/KAUS/observations");
            then.status(200).json_body(json!({
                "features": [{"properties": {
                    "timestamp": iso(start + Duration::hours(2)),
                    "temperature": {"value": 4.0},
                    "rawMessage": "KAUS 280753Z 00000KT 10SM CLR 04/M02 A3020"
                }}]
            }));
        })
        .await;

    let hourly_url = server.url(HOURLY_PATH);
    let grid_url = server.url(GRID_PATH);
    server
        .mock_async(|when, then| {
            when.method(GET).path("/points/30.1945,-97.6699");
            then.status(200).json_body(json!({
                "properties": {
                    "forecastHourly": hourly_url,
                    "forecastGridData": grid_url
                }
            }));
        })
        .await;

    server
        .mock_async(|when, then| {
            when.method(GET).path(HOURLY_PATH);
            then.status(200).json_body(json!({
                "properties": {"periods": [
                    {"startTime": iso(start + Duration::hours(14)), "temperature": 66},
                    {"startTime": iso(start + Duration::hours(14) + Duration::minutes(10)), "temperature": 67}
                ]}
            }));
        })
        .await;

    server
        .mock_async(|when, then| {
            when.method(GET).path(GRID_PATH);
            if grid_status == 200 {
                then.status(200).json_body(json!({
                    "properties": {"temperature": {"values": [
                        {"validTime": format!("{}/PT1H", iso(start + Duration::hours(8))), "value": 10.0},
                        {"validTime": format!("{}/PT1H", iso(start + Duration::hours(2))), "value": 99.0}
                    ]}}
                }));
            } else {
                then.status(grid_status).body("upstream down");
            }
        })
        .await;
}

async fn mock_kalshi(server: &MockServer, status: u16) {
    server
        .mock_async(|when, then| {
            when.method(GET).path("/kalshi/markets").query_param("status", "open");
            if status == 200 {
                then.status(200).json_body(json!({"markets": [
                    {"ticker": "KXHIGHAUS-T70", "floor_strike": 70, "yes_sub_title": "70° or above", "yes_ask": 30, "no_ask": 72},
                    {"ticker": "KXHIGHAUS-T74", "floor_strike": 74, "yes_sub_title": "74° or above", "yes_ask": 8, "no_ask": 94}
                ]}));
            } else {
                then.status(status).body("nope");
            }
        })
        .await;
}

fn config(server: &MockServer) -> AppConfig {
    let mut config = AppConfig::default();
    config.weather.base_url = server.base_url();
    config.markets.base_url = server.url("/kalshi");
    config
}

fn router(server: &MockServer) -> axum::Router {
    app(Arc::new(AppState::from_config(&config(server)).unwrap()))
}

async fn get(router: axum::Router, uri: &str) -> (StatusCode, String) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn test_timeline_endpoint_merges_feeds() {
    let server = MockServer::start_async().await;
    mock_nws(&server, 200).await;
    mock_kalshi(&server, 200).await;

    let (status, body) = get(router(&server), "/api/timeline/kaus").await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let report: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(report["location"]["code"], "KAUS");
    assert_eq!(report["location"]["timeZone"], "America/Chicago");

    let samples = report["samples"].as_array().unwrap();
    let sources: Vec<&str> = samples.iter().map(|s| s["source"].as_str().unwrap()).collect();
    assert_eq!(sources, vec!["observation", "grid", "forecast"]);
    assert_eq!(samples[0]["temperatureF"], 39.2);
    assert_eq!(samples[0]["isHighConfidence"], true);
    assert_eq!(samples[1]["temperatureF"], 50.0);
    assert_eq!(samples[2]["temperatureF"], 66.0);
    assert_eq!(
        samples.iter().filter(|s| s["isCurrent"] == true).count(),
        1
    );
    assert_eq!(report["stats"]["max"]["temperatureF"], 66.0);
    assert_eq!(report["stats"]["min"]["temperatureF"], 39.2);

    let markets = report["markets"].as_array().unwrap();
    assert_eq!(markets[0]["ticker"], "KXHIGHAUS-T74");
    assert_eq!(markets[1]["ticker"], "KXHIGHAUS-T70");
}

#[tokio::test]
async fn test_timeline_unknown_location_is_404() {
    let server = MockServer::start_async().await;
    let (status, body) = get(router(&server), "/api/timeline/KXYZ").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let error: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(error, json!({"error": "Unknown location 'KXYZ'"}));
}

#[tokio::test]
async fn test_weather_failure_is_502() {
    let server = MockServer::start_async().await;
    mock_nws(&server, 500).await;
    mock_kalshi(&server, 200).await;

    let (status, body) = get(router(&server), "/api/timeline/KAUS").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    let error: Value = serde_json::from_str(&body).unwrap();
    let message = error["error"].as_str().unwrap();
    assert!(message.starts_with("Failed to load weather data"), "{message}");
    assert!(message.contains("HTTP 500"), "{message}");
}

#[tokio::test]
async fn test_market_failure_keeps_timeline() {
    let server = MockServer::start_async().await;
    mock_nws(&server, 200).await;
    mock_kalshi(&server, 503).await;

    let (status, body) = get(router(&server), "/api/timeline/KAUS").await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let report: Value = serde_json::from_str(&body).unwrap();
    assert!(report["markets"].is_null());
    assert_eq!(report["samples"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_dashboard_page() {
    let server = MockServer::start_async().await;
    mock_nws(&server, 200).await;
    mock_kalshi(&server, 200).await;

    let (status, html) = get(router(&server), "/?location=KAUS").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("<a href=\"/?location=KAUS\" class=\"active\""));
    assert!(html.contains("Austin Temperature Markets"));
    assert!(html.contains("&gt;74°"));
    assert!(html.contains("39.2°F"));
    assert!(html.contains("(high confidence)"));
}

#[tokio::test]
async fn test_dashboard_page_defaults_to_configured_location() {
    let server = MockServer::start_async().await;
    mock_nws(&server, 200).await;
    mock_kalshi(&server, 200).await;

    let (status, html) = get(router(&server), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("<a href=\"/?location=KAUS\" class=\"active\""));
}

#[tokio::test]
async fn test_dashboard_page_errors() {
    let server = MockServer::start_async().await;
    mock_nws(&server, 500).await;

    let (status, html) = get(router(&server), "/?location=nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(html.contains("Unknown location &#39;nope&#39;"));

    let (status, html) = get(router(&server), "/?location=KAUS").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(html.contains("<div class=\"error\">Failed to load weather data"));
    assert!(!html.contains("<div class=\"airport-card\">"));
}

#[tokio::test]
async fn test_locations_endpoint_with_cors() {
    let server = MockServer::start_async().await;
    let response = router(&server)
        .oneshot(
            Request::builder()
                .uri("/api/locations")
                .header(header::ORIGIN, "https://example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let locations: Vec<Value> = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(locations.len(), 10);
    assert_eq!(locations[0]["code"], "KLAX");
    assert_eq!(locations[0]["shortCode"], "LAX");
}

#[tokio::test]
async fn test_dashboard_text_report() {
    let server = MockServer::start_async().await;
    mock_nws(&server, 200).await;
    mock_kalshi(&server, 200).await;

    let state = AppState::from_config(&config(&server)).unwrap();
    let report = state
        .dashboard
        .load(location::find("KAUS").unwrap(), Utc::now())
        .await
        .unwrap();

    let text = report.to_string();
    assert!(text.starts_with("Austin (KAUS)"));
    assert!(text.contains(">74°"));
    assert!(text.matches("°F").count() >= 3);
}
