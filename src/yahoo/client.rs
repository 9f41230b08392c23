//! Yahoo Finance client for fetching daily price history
//!
//! No API key required; the public chart endpoint only needs a browser-like
//! user agent.

use anyhow::{Context, Result};
use chrono::{Days, NaiveDate, Utc};
use reqwest::{Client, StatusCode};
use std::time::Duration as StdDuration;
use tracing::debug;

use super::types::{ChartResponse, ChartResult};
use crate::data::PriceProvider;
use crate::error::DataError;
use crate::{Bar, Symbol};

/// Base URL for the chart API
const YAHOO_CHART_BASE: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko)";

/// Seconds since the epoch at midnight UTC of `date`
fn epoch_seconds(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or_default()
}

/// Yahoo Finance API client
#[derive(Debug, Clone)]
pub struct YahooClient {
    client: Client,
}

impl YahooClient {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(StdDuration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(YahooClient { client })
    }

    /// Fetch daily chart data for `symbol` from `start` up to and including `end`
    pub async fn get_chart(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> std::result::Result<ChartResult, DataError> {
        let url = format!("{}/{}", YAHOO_CHART_BASE, symbol);
        let period2 = end
            .and_then(|e| e.checked_add_days(Days::new(1)))
            .map(epoch_seconds)
            .unwrap_or_else(|| Utc::now().timestamp());

        let params = [
            ("period1", epoch_seconds(start).to_string()),
            ("period2", period2.to_string()),
            ("interval", "1d".to_string()),
            ("events", "history".to_string()),
        ];

        debug!("Fetching chart: symbol={}, start={}, end={:?}", symbol, start, end);

        let provider_error = |reason: String| DataError::Provider {
            symbol: symbol.to_string(),
            reason,
        };

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| provider_error(format!("request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| provider_error(format!("failed to read body: {}", e)))?;

        let parsed: Option<ChartResponse> = serde_json::from_str(&body).ok();

        if let Some(err) = parsed.as_ref().and_then(|r| r.chart.error.as_ref()) {
            debug!("Yahoo error for {}: {} {}", symbol, err.code, err.description);
            return Err(DataError::NoData {
                symbol: symbol.to_string(),
            });
        }

        if status == StatusCode::NOT_FOUND {
            return Err(DataError::NoData {
                symbol: symbol.to_string(),
            });
        }

        if !status.is_success() {
            return Err(provider_error(format!("Yahoo API error {}: {}", status, body)));
        }

        parsed
            .and_then(|r| r.chart.result)
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| DataError::NoData {
                symbol: symbol.to_string(),
            })
    }

    /// Fetch and convert to validated bars
    pub async fn fetch_bars(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> std::result::Result<Vec<Bar>, DataError> {
        let chart = self.get_chart(symbol, start, end).await?;
        let bars = chart.to_bars();

        if bars.is_empty() {
            return Err(DataError::NoData {
                symbol: symbol.to_string(),
            });
        }
        Ok(bars)
    }
}

/// Blocking [`PriceProvider`] backed by [`YahooClient`] on its own runtime
pub struct YahooProvider {
    runtime: tokio::runtime::Runtime,
    client: YahooClient,
}

impl YahooProvider {
    pub fn new() -> Result<Self> {
        let runtime = tokio::runtime::Runtime::new().context("Failed to start tokio runtime")?;
        Ok(YahooProvider {
            runtime,
            client: YahooClient::new()?,
        })
    }
}

impl PriceProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo"
    }

    fn fetch(
        &self,
        symbol: &Symbol,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> std::result::Result<Vec<Bar>, DataError> {
        self.runtime
            .block_on(self.client.fetch_bars(symbol.as_str(), start, end))
    }
}
