//! Yahoo Finance data fetcher
//!
//! Fetches daily closing prices from Yahoo Finance's unofficial chart API
//! and turns them into spot and historical volatility.
//!
//! Note: This is for educational/research purposes. Yahoo Finance
//! data is delayed ~15 minutes and intended for personal use.

use chrono::DateTime;
use serde::Deserialize;

use super::history::{DailyClose, PriceHistory};
use super::provider::{MarketDataProvider, MarketParameters};
use crate::core::{PricingError, PricingResult};

/// Default lookback for the volatility estimate
pub const DEFAULT_RANGE: &str = "1y";

/// Yahoo Finance API client
pub struct YahooClient {
    client: reqwest::blocking::Client,
    base_url: String,
    range: String,
}

impl YahooClient {
    pub fn new() -> PricingResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .map_err(|e| PricingError::network(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: "https://query1.finance.yahoo.com/v8/finance".to_string(),
            range: DEFAULT_RANGE.to_string(),
        })
    }

    /// Lookback range used by [`MarketDataProvider::market_parameters`]
    pub fn with_range(mut self, range: impl Into<String>) -> Self {
        self.range = range.into();
        self
    }

    pub fn range(&self) -> &str {
        &self.range
    }

    /// Daily closes for `symbol` over `range` ("1mo", "6mo", "1y", ...)
    pub fn get_price_history(&self, symbol: &str, range: &str) -> PricingResult<PriceHistory> {
        let url = format!(
            "{}/chart/{}?range={}&interval=1d",
            self.base_url, symbol, range
        );
        tracing::info!("Fetching {} price history for {}", range, symbol);

        let response: YahooChartResponse = self
            .client
            .get(&url)
            .send()
            .map_err(|e| PricingError::network(e.to_string()))?
            .json()
            .map_err(|e| PricingError::serialization(format!("Failed to parse chart: {}", e)))?;

        parse_chart(symbol, response)
    }
}

impl MarketDataProvider for YahooClient {
    fn market_parameters(&self, symbol: &str) -> PricingResult<MarketParameters> {
        self.get_price_history(symbol, &self.range)?.market_parameters()
    }
}

fn parse_chart(symbol: &str, response: YahooChartResponse) -> PricingResult<PriceHistory> {
    if let Some(err) = response.chart.error {
        return Err(PricingError::data_unavailable(format!(
            "{}: {} ({})",
            symbol, err.description, err.code
        )));
    }

    let result = response
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| PricingError::data_unavailable(format!("No chart data returned for {}", symbol)))?;

    let timestamps = result.timestamp.unwrap_or_default();
    let closes = result
        .indicators
        .quote
        .into_iter()
        .next()
        .and_then(|q| q.close)
        .unwrap_or_default();

    let mut skipped = 0;
    let bars: Vec<DailyClose> = timestamps
        .iter()
        .zip(closes.iter())
        .filter_map(|(&ts, close)| {
            let bar = match (DateTime::from_timestamp(ts, 0), close) {
                (Some(dt), Some(c)) if c.is_finite() && *c > 0.0 => Some(DailyClose {
                    date: dt.date_naive(),
                    close: *c,
                }),
                _ => None,
            };
            if bar.is_none() {
                skipped += 1;
            }
            bar
        })
        .collect();

    if skipped > 0 {
        tracing::warn!("Dropped {} empty or invalid closes for {}", skipped, symbol);
    }
    if bars.is_empty() {
        return Err(PricingError::data_unavailable(format!(
            "No historical closes for {}",
            symbol
        )));
    }

    Ok(PriceHistory::new(symbol, bars))
}

// Yahoo Finance chart API response structures

#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    result: Option<Vec<YahooChartResult>>,
    error: Option<YahooChartError>,
}

#[derive(Debug, Deserialize)]
struct YahooChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct YahooChartResult {
    timestamp: Option<Vec<i64>>,
    indicators: YahooIndicators,
}

#[derive(Debug, Deserialize)]
struct YahooIndicators {
    quote: Vec<YahooQuoteBars>,
}

#[derive(Debug, Deserialize)]
struct YahooQuoteBars {
    close: Option<Vec<Option<f64>>>,
}

/// Convenience function: spot and volatility from one year of AAPL closes
pub fn fetch_aapl_parameters() -> PricingResult<MarketParameters> {
    YahooClient::new()?.market_parameters("AAPL")
}
