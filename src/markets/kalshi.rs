//! Kalshi trade API client

use super::{MarketSource, event_ticker, series_ticker};
use crate::config::MarketsConfig;
use crate::models::MarketQuote;
use crate::{Result, TempBoardError};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use std::cmp::Ordering;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Deserialize)]
struct MarketsResponse {
    #[serde(default)]
    markets: Option<Vec<MarketQuote>>,
}

/// Kalshi market client, optionally routed through a relay
#[derive(Debug, Clone)]
pub struct KalshiClient {
    client: Client,
    base_url: String,
    relay_url: Option<String>,
    enabled: bool,
}

impl KalshiClient {
    /// Create a client from the markets configuration
    pub fn new(config: &MarketsConfig, timeout_seconds: u32) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds.into()))
            .build()
            .map_err(|e| TempBoardError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            relay_url: config.relay_url.clone(),
            enabled: config.enabled,
        })
    }

    /// URL actually requested for `event`, wrapped in the relay when configured
    #[must_use]
    pub fn request_url(&self, event: &str) -> String {
        let url = format!(
            "{}/markets?event_ticker={}&status=open",
            self.base_url,
            urlencoding::encode(event)
        );
        match &self.relay_url {
            Some(relay) => format!("{}?url={}", relay, urlencoding::encode(&url)),
            None => url,
        }
    }

    async fn fetch_event(&self, event: &str) -> Result<Vec<MarketQuote>> {
        let url = self.request_url(event);
        debug!("Kalshi request URL: {}", url);

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TempBoardError::upstream(format!(
                "HTTP {} from {}",
                status.as_u16(),
                url
            )));
        }

        let body: MarketsResponse = response.json().await?;
        let mut markets = body.markets.unwrap_or_default();
        sort_by_strike_descending(&mut markets);
        Ok(markets)
    }
}

/// Highest strike first; a missing strike counts as 0
pub fn sort_by_strike_descending(markets: &mut [MarketQuote]) {
    markets.sort_by(|a, b| {
        let a = a.strike_temperature.unwrap_or(0.0);
        let b = b.strike_temperature.unwrap_or(0.0);
        b.partial_cmp(&a).unwrap_or(Ordering::Equal)
    });
}

#[async_trait]
impl MarketSource for KalshiClient {
    #[instrument(skip(self))]
    async fn markets(&self, station_code: &str, date: NaiveDate) -> Option<Vec<MarketQuote>> {
        if !self.enabled {
            debug!("Market data disabled");
            return None;
        }
        let Some(series) = series_ticker(station_code) else {
            info!("No Kalshi series for {}", station_code);
            return None;
        };

        let event = event_ticker(series, date);
        match self.fetch_event(&event).await {
            Ok(markets) => {
                info!("Found {} open markets for {}", markets.len(), event);
                Some(markets)
            }
            Err(e) => {
                warn!("Failed to fetch Kalshi markets for {}: {}", event, e);
                None
            }
        }
    }
}
