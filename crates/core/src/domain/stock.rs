use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static SYMBOL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z]{1,5}$").expect("ticker symbol regex is valid")
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stock {
    pub symbol: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_percent: Option<f64>,
}

impl Stock {
    pub fn new(symbol: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
            price: None,
            change: None,
            change_percent: None,
        }
    }
}

/// Popular tickers offered for quick selection.
pub const AVAILABLE_STOCKS: [(&str, &str); 6] = [
    ("AMZN", "Amazon"),
    ("META", "Meta Platforms"),
    ("TSLA", "Tesla"),
    ("AAPL", "Apple"),
    ("GOOGL", "Alphabet"),
    ("MSFT", "Microsoft"),
];

const KNOWN_NAMES: [(&str, &str); 28] = [
    ("AAPL", "Apple Inc."),
    ("GOOGL", "Alphabet Inc."),
    ("MSFT", "Microsoft Corporation"),
    ("AMZN", "Amazon.com Inc."),
    ("TSLA", "Tesla Inc."),
    ("META", "Meta Platforms Inc."),
    ("NVDA", "NVIDIA Corporation"),
    ("CRM", "Salesforce Inc."),
    ("NFLX", "Netflix Inc."),
    ("ADBE", "Adobe Inc."),
    ("PYPL", "PayPal Holdings Inc."),
    ("INTC", "Intel Corporation"),
    ("AMD", "Advanced Micro Devices Inc."),
    ("ORCL", "Oracle Corporation"),
    ("CSCO", "Cisco Systems Inc."),
    ("IBM", "International Business Machines Corp."),
    ("UBER", "Uber Technologies Inc."),
    ("LYFT", "Lyft Inc."),
    ("SNAP", "Snap Inc."),
    ("ZOOM", "Zoom Video Communications Inc."),
    ("SHOP", "Shopify Inc."),
    ("SQ", "Block Inc."),
    ("ROKU", "Roku Inc."),
    ("PINS", "Pinterest Inc."),
    ("DOCU", "DocuSign Inc."),
    ("ZM", "Zoom Video Communications Inc."),
    ("PLTR", "Palantir Technologies Inc."),
    ("SNOW", "Snowflake Inc."),
];

pub fn is_valid_stock_symbol(symbol: &str) -> bool {
    SYMBOL_RE.is_match(symbol)
}

/// Display name for a symbol; unknown symbols get a synthesized `"{SYMBOL} Inc."`.
pub fn stock_name(symbol: &str) -> String {
    KNOWN_NAMES
        .iter()
        .find(|(s, _)| *s == symbol)
        .map(|(_, name)| (*name).to_string())
        .unwrap_or_else(|| format!("{symbol} Inc."))
}

pub fn available_stocks() -> Vec<Stock> {
    AVAILABLE_STOCKS
        .iter()
        .map(|(symbol, name)| Stock::new(*symbol, *name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_must_be_one_to_five_uppercase_letters() {
        assert!(is_valid_stock_symbol("NVDA"));
        assert!(is_valid_stock_symbol("A"));
        assert!(is_valid_stock_symbol("GOOGL"));
        assert!(!is_valid_stock_symbol("nvda"));
        assert!(!is_valid_stock_symbol("TOOLONG1"));
        assert!(!is_valid_stock_symbol("ABCDEF"));
        assert!(!is_valid_stock_symbol(""));
        assert!(!is_valid_stock_symbol("BRK.B"));
    }

    #[test]
    fn known_and_unknown_names() {
        assert_eq!(stock_name("NVDA"), "NVIDIA Corporation");
        assert_eq!(stock_name("XYZ"), "XYZ Inc.");
    }

    #[test]
    fn serializes_camel_case_and_omits_missing_quotes() {
        let mut stock = Stock::new("AAPL", "Apple");
        let v = serde_json::to_value(&stock).unwrap();
        assert_eq!(v, serde_json::json!({"symbol": "AAPL", "name": "Apple"}));

        stock.change_percent = Some(1.5);
        let v = serde_json::to_value(&stock).unwrap();
        assert_eq!(v["changePercent"], serde_json::json!(1.5));
    }
}
