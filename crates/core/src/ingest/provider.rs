use crate::config::Settings;
use crate::domain::date_range::DateRange;
use crate::ingest::types::{PricePoint, StockDataResponse};
use crate::time::calendar::format_date;
use anyhow::{Context, Result};
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[async_trait::async_trait]
pub trait MarketDataClient: Send + Sync {
    fn provider_name(&self) -> &'static str;

    async fn fetch_series(&self, ticker: &str, range: &DateRange) -> Result<Vec<PricePoint>>;
}

/// Fetches every ticker in order. The first failure aborts the whole batch.
pub async fn fetch_all(
    client: &dyn MarketDataClient,
    tickers: &[String],
    range: &DateRange,
) -> Result<StockDataResponse> {
    let mut out = StockDataResponse::new();
    for ticker in tickers {
        let points = client.fetch_series(ticker, range).await?;
        tracing::debug!(%ticker, points = points.len(), "fetched price series");
        out.insert(ticker.clone(), points);
    }
    Ok(out)
}

#[derive(Debug, Clone)]
pub struct HttpMarketDataClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpMarketDataClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let base_url = settings.require_market_data_base_url()?.to_string();

        let timeout_secs = std::env::var("MARKET_DATA_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build market data http client")?;

        Ok(Self { http, base_url })
    }

    fn url(&self) -> String {
        format!("{}/", self.base_url.trim_end_matches('/'))
    }

    fn query(ticker: &str, range: &DateRange) -> [(&'static str, String); 3] {
        [
            ("ticker", ticker.to_string()),
            ("startDate", format_date(range.from)),
            ("endDate", format_date(range.to)),
        ]
    }
}

#[async_trait::async_trait]
impl MarketDataClient for HttpMarketDataClient {
    fn provider_name(&self) -> &'static str {
        "http_price_series"
    }

    async fn fetch_series(&self, ticker: &str, range: &DateRange) -> Result<Vec<PricePoint>> {
        let res = self
            .http
            .get(self.url())
            .query(&Self::query(ticker, range))
            .send()
            .await
            .with_context(|| format!("Failed to fetch data for {ticker}"))?;

        let status = res.status();
        if !status.is_success() {
            anyhow::bail!("Failed to fetch data for {ticker} (HTTP {status})");
        }

        let text = res
            .text()
            .await
            .context("failed to read market data response")?;
        serde_json::from_str::<Vec<PricePoint>>(&text)
            .with_context(|| format!("market data for {ticker} is not a price series: {text}"))
    }
}
