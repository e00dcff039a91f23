use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Bullish,
    Neutral,
    Bearish,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Forecast {
    Uptrend,
    Downtrend,
    Volatile,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub date: String,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub report: String,
    pub sentiment: Sentiment,
    pub risk_level: RiskLevel,
    pub forecast: Forecast,
    pub price_chart: Vec<ChartData>,
    pub sentiment_chart: Vec<ChartData>,
    pub summary: String,
}

impl AnalysisResult {
    /// Wraps a narrative report. The gateway returns prose only, so the scored fields carry
    /// neutral placeholders until it returns structured scores.
    pub fn from_report(report: String, price_chart: Vec<ChartData>) -> Self {
        let summary = summarize(&report);
        Self {
            report,
            sentiment: Sentiment::Neutral,
            risk_level: RiskLevel::Medium,
            forecast: Forecast::Volatile,
            price_chart,
            sentiment_chart: Vec::new(),
            summary,
        }
    }
}

// First non-empty line of the report.
fn summarize(report: &str) -> String {
    report
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default()
        .to_string()
}
