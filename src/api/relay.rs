//! Stateless JSON pass-through for browsers that cannot call an API
//! directly because of CORS.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Json, Response},
};
use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::ApiError;
use crate::web::AppState;

#[derive(Debug, Deserialize)]
pub struct RelayParams {
    pub url: Option<String>,
}

/// `GET /api/relay?url=<target>`: fetch `target` and answer its JSON body
#[instrument(skip(state))]
pub async fn relay(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RelayParams>,
) -> Response {
    let result = forward(&state.http, &state.relay_origin, params.url.as_deref()).await;
    let response = match result {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(e) => e.into_response(),
    };
    (
        [(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")],
        response,
    )
        .into_response()
}

async fn forward(
    client: &reqwest::Client,
    allowed: &Url,
    target: Option<&str>,
) -> Result<Value, ApiError> {
    let target = target
        .filter(|url| !url.is_empty())
        .ok_or_else(|| ApiError::new(StatusCode::BAD_REQUEST, "Missing url parameter"))?;

    let url = Url::parse(target)
        .ok()
        .filter(|url| matches!(url.scheme(), "http" | "https"))
        .ok_or_else(|| {
            ApiError::new(
                StatusCode::BAD_REQUEST,
                format!("Unsupported url '{target}'"),
            )
        })?;

    if url.origin() != allowed.origin() {
        warn!("Relay refused {}", target);
        return Err(ApiError::new(
            StatusCode::FORBIDDEN,
            format!("Relay target '{}' is not allowed", url.origin().ascii_serialization()),
        ));
    }

    debug!("Relaying request to {}", url);
    let response = client
        .get(url)
        .header(reqwest::header::ACCEPT, "application/json")
        .send()
        .await
        .map_err(|e| internal(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(internal(format!("Upstream returned HTTP {}", status.as_u16())));
    }

    response
        .json::<Value>()
        .await
        .map_err(|e| internal(format!("Upstream returned invalid JSON: {e}")))
}

fn internal(message: String) -> ApiError {
    warn!("Relay failed: {}", message);
    ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::web::app;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use httpmock::prelude::*;
    use serde_json::json;
    use tower::ServiceExt;

    fn router(markets_base_url: &str) -> axum::Router {
        let mut config = AppConfig::default();
        config.markets.base_url = markets_base_url.to_string();
        app(Arc::new(AppState::from_config(&config).unwrap()))
    }

    async fn call(uri: &str) -> (StatusCode, Option<String>, Value) {
        call_with(&AppConfig::default().markets.base_url, uri).await
    }

    async fn call_with(markets_base_url: &str, uri: &str) -> (StatusCode, Option<String>, Value) {
        let response = router(markets_base_url)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let cors = response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, cors, serde_json::from_slice(&bytes).unwrap())
    }

    fn relay_uri(target: &str) -> String {
        format!("/api/relay?url={}", urlencoding::encode(target))
    }

    #[tokio::test]
    async fn test_missing_url_parameter() {
        let (status, cors, body) = call("/api/relay").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(cors.as_deref(), Some("*"));
        assert_eq!(body, json!({"error": "Missing url parameter"}));

        let (status, _, body) = call("/api/relay?url=").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Missing url parameter"}));
    }

    #[tokio::test]
    async fn test_rejects_non_http_target() {
        let (status, _, body) = call(&relay_uri("file:///etc/passwd")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("Unsupported url"));
    }

    #[tokio::test]
    async fn test_passes_json_through() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/markets")
                    .query_param("event_ticker", "KXHIGHAUS-26JAN28")
                    .header("accept", "application/json");
                then.status(200).json_body(json!({"markets": [{"ticker": "T1"}]}));
            })
            .await;

        let target = server.url("/markets?event_ticker=KXHIGHAUS-26JAN28&status=open");
        let (status, cors, body) = call_with(&server.base_url(), &relay_uri(&target)).await;

        mock.assert_async().await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(cors.as_deref(), Some("*"));
        assert_eq!(body, json!({"markets": [{"ticker": "T1"}]}));
    }

    #[tokio::test]
    async fn test_upstream_failure_is_500() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/broken");
                then.status(502).body("bad gateway");
            })
            .await;

        let (status, cors, body) =
            call_with(&server.base_url(), &relay_uri(&server.url("/broken"))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(cors.as_deref(), Some("*"));
        assert_eq!(body, json!({"error": "Upstream returned HTTP 502"}));
    }

    #[tokio::test]
    async fn test_non_json_body_is_500() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/html");
                then.status(200).body("<html></html>");
            })
            .await;

        let (status, _, body) =
            call_with(&server.base_url(), &relay_uri(&server.url("/html"))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().starts_with("Upstream returned invalid JSON"));
    }

    #[tokio::test]
    async fn test_refuses_other_hosts() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/latest/meta-data");
                then.status(200).json_body(json!({"secret": true}));
            })
            .await;

        let (status, cors, body) = call(&relay_uri(&server.url("/latest/meta-data"))).await;

        mock.assert_hits_async(0).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(cors.as_deref(), Some("*"));
        assert!(body["error"].as_str().unwrap().contains("is not allowed"));
    }
}
