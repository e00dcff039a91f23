use std::time::Duration;

use crate::domain::stock::{stock_name, Stock};

/// Resolves ticker metadata for manually entered symbols.
#[async_trait::async_trait]
pub trait TickerDirectory: Send + Sync {
    async fn resolve_ticker_metadata(&self, symbol: &str) -> Option<Stock>;
}

/// Name lookup against the built-in table. Every well-formed symbol resolves; unknown ones
/// get a synthesized name.
#[derive(Debug, Clone, Default)]
pub struct StaticTickerDirectory {
    latency: Duration,
}

impl StaticTickerDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates a remote lookup.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

#[async_trait::async_trait]
impl TickerDirectory for StaticTickerDirectory {
    async fn resolve_ticker_metadata(&self, symbol: &str) -> Option<Stock> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        Some(Stock::new(symbol, stock_name(symbol)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn resolves_known_and_synthesized_names() {
        let dir = StaticTickerDirectory::new();
        let nvda = dir.resolve_ticker_metadata("NVDA").await.unwrap();
        assert_eq!(nvda.name, "NVIDIA Corporation");

        let other = dir.resolve_ticker_metadata("QQQ").await.unwrap();
        assert_eq!(other.name, "QQQ Inc.");
    }
}
