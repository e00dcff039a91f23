use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::analysis::ChartData;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: String,
    pub value: f64,
}

/// Price series keyed by ticker.
pub type StockDataResponse = BTreeMap<String, Vec<PricePoint>>;

/// Flattens per-ticker series into chart points labelled by ticker.
pub fn price_chart(data: &StockDataResponse) -> Vec<ChartData> {
    data.iter()
        .flat_map(|(ticker, points)| {
            points.iter().map(move |p| ChartData {
                date: p.date.clone(),
                value: p.value,
                label: Some(ticker.clone()),
            })
        })
        .collect()
}
