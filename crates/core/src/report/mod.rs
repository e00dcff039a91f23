use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use crate::config::Settings;
use crate::domain::analysis::AnalysisResult;
use crate::domain::message::Message;
use crate::gate::ReportRequest;
use crate::gateway::GenerateReportRequest;
use crate::ingest::provider::{fetch_all, MarketDataClient};
use crate::ingest::types::{price_chart, StockDataResponse};
use crate::time::calendar::format_date;

const DEFAULT_TIMEOUT_SECS: u64 = 120;
const GENERATE_REPORT_PATH: &str = "/generate-report";

#[async_trait::async_trait]
pub trait GatewayClient: Send + Sync {
    async fn generate_report(&self, request: &GenerateReportRequest) -> anyhow::Result<Message>;
}

#[derive(Debug, Clone)]
pub struct HttpGatewayClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpGatewayClient {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let base_url = settings.require_gateway_url()?.to_string();

        let timeout_secs = std::env::var("GATEWAY_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build gateway http client")?;

        Ok(Self { http, base_url })
    }

    fn url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), GENERATE_REPORT_PATH)
    }
}

#[async_trait::async_trait]
impl GatewayClient for HttpGatewayClient {
    async fn generate_report(&self, request: &GenerateReportRequest) -> anyhow::Result<Message> {
        let res = self
            .http
            .post(self.url())
            .json(request)
            .send()
            .await
            .context("report gateway request failed")?;

        let status = res.status();
        let text = res
            .text()
            .await
            .context("failed to read report gateway response")?;
        if !status.is_success() {
            let error = serde_json::from_str::<serde_json::Value>(&text)
                .ok()
                .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
                .unwrap_or(text);
            anyhow::bail!("report gateway HTTP {status}: {error}");
        }

        serde_json::from_str::<Message>(&text)
            .with_context(|| format!("report gateway returned an unexpected body: {text}"))
    }
}

/// Builds the single user turn sent to the gateway.
pub fn report_prompt(request: &ReportRequest, data: &StockDataResponse) -> anyhow::Result<Message> {
    let series = serde_json::to_string(data).context("failed to serialize stock data")?;
    Ok(Message::user(format!(
        "Write a stock analysis report for {} covering {} to {}.\n\nDaily prices JSON:\n{series}",
        request.tickers.join(", "),
        format_date(request.date_range.from),
        format_date(request.date_range.to),
    )))
}

pub struct ReportPipeline {
    market: Arc<dyn MarketDataClient>,
    gateway: Arc<dyn GatewayClient>,
}

impl ReportPipeline {
    pub fn new(market: Arc<dyn MarketDataClient>, gateway: Arc<dyn GatewayClient>) -> Self {
        Self { market, gateway }
    }

    pub async fn run(&self, request: &ReportRequest) -> anyhow::Result<AnalysisResult> {
        let data = fetch_all(self.market.as_ref(), &request.tickers, &request.date_range).await?;
        tracing::info!(
            provider = self.market.provider_name(),
            tickers = data.len(),
            "fetched market data"
        );

        // The client tag is sent unchanged; the gateway only knows space-separated labels.
        let gateway_request = GenerateReportRequest {
            messages: vec![report_prompt(request, &data)?],
            persona: Some(request.persona.tag().to_string()),
        };

        let reply = self.gateway.generate_report(&gateway_request).await?;
        Ok(AnalysisResult::from_report(reply.content, price_chart(&data)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::date_range::DateRange;
    use crate::domain::message::Role;
    use crate::domain::persona::InvestorPersona;
    use crate::ingest::types::PricePoint;
    use chrono::{TimeZone, Utc};
    use std::sync::Mutex;

    struct FixedMarket {
        fail: bool,
    }

    #[async_trait::async_trait]
    impl MarketDataClient for FixedMarket {
        fn provider_name(&self) -> &'static str {
            "fixed"
        }

        async fn fetch_series(
            &self,
            ticker: &str,
            _range: &DateRange,
        ) -> anyhow::Result<Vec<PricePoint>> {
            anyhow::ensure!(!self.fail, "Failed to fetch data for {ticker}");
            Ok(vec![
                PricePoint {
                    date: "2024-01-02".to_string(),
                    value: 10.0,
                },
                PricePoint {
                    date: "2024-01-03".to_string(),
                    value: 11.0,
                },
            ])
        }
    }

    #[derive(Default)]
    struct RecordingGateway {
        seen: Mutex<Vec<GenerateReportRequest>>,
    }

    #[async_trait::async_trait]
    impl GatewayClient for RecordingGateway {
        async fn generate_report(
            &self,
            request: &GenerateReportRequest,
        ) -> anyhow::Result<Message> {
            self.seen.lock().unwrap().push(request.clone());
            Ok(Message::assistant("Summary line.\nDetails."))
        }
    }

    fn request() -> ReportRequest {
        ReportRequest {
            tickers: vec!["AAPL".to_string(), "MSFT".to_string()],
            date_range: DateRange::new(
                Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2024, 1, 4, 0, 0, 0).unwrap(),
            ),
            persona: InvestorPersona::ActiveTrader,
        }
    }

    #[tokio::test]
    async fn runs_market_fetch_then_gateway() {
        let gateway = Arc::new(RecordingGateway::default());
        let pipeline = ReportPipeline::new(Arc::new(FixedMarket { fail: false }), gateway.clone());

        let result = pipeline.run(&request()).await.unwrap();
        assert_eq!(result.summary, "Summary line.");
        assert_eq!(result.price_chart.len(), 4);

        let seen = gateway.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].persona.as_deref(), Some("active-trader"));
        assert_eq!(seen[0].messages.len(), 1);
        assert_eq!(seen[0].messages[0].role, Role::User);
        assert!(seen[0].messages[0].content.contains("AAPL, MSFT"));
        assert!(seen[0].messages[0].content.contains("2024-01-01 to 2024-01-04"));
    }

    #[tokio::test]
    async fn market_failure_skips_gateway() {
        let gateway = Arc::new(RecordingGateway::default());
        let pipeline = ReportPipeline::new(Arc::new(FixedMarket { fail: true }), gateway.clone());

        let err = pipeline.run(&request()).await.unwrap_err();
        assert!(err.to_string().contains("Failed to fetch data for AAPL"));
        assert!(gateway.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn gateway_url_appends_path() {
        let client = HttpGatewayClient {
            http: reqwest::Client::new(),
            base_url: "http://127.0.0.1:3000/".to_string(),
        };
        assert_eq!(client.url(), "http://127.0.0.1:3000/generate-report");
    }
}
