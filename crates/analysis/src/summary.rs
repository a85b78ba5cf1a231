//! Per-country statistics over aggregated monthly rows.

use serde::Serialize;
use statrs::statistics::Statistics;
use std::collections::BTreeSet;
use tradeprice_core::{country_name, AggregatedTradeRow, UNIT_KG};

/// Average unit price and total volume of one country over a query range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountrySummary {
    /// Country code.
    pub country: String,
    /// Display name.
    pub country_name: String,
    /// Mean of the non-null monthly unit prices (USD per unit).
    pub avg_unit_price: f64,
    /// Sum of quantities.
    pub total_quantity: f64,
    /// Quantity unit.
    pub unit: String,
    /// Number of distinct months with data.
    pub months: usize,
}

/// Summarize one country's rows.
///
/// Returns `None` when there is nothing to average: no rows, or no row
/// with a usable unit price.
pub fn summarize(country: &str, rows: &[AggregatedTradeRow]) -> Option<CountrySummary> {
    let prices: Vec<f64> = rows.iter().filter_map(|r| r.unit_price).collect();
    if prices.is_empty() {
        return None;
    }

    let avg_unit_price = prices.iter().mean();
    let total_quantity: f64 = rows.iter().map(|r| r.quantity).sum();
    let months = rows.iter().map(|r| r.period).collect::<BTreeSet<_>>().len();
    let unit = rows
        .first()
        .map(|r| r.unit.clone())
        .unwrap_or_else(|| UNIT_KG.to_string());

    Some(CountrySummary {
        country: country.to_string(),
        country_name: country_name(country).to_string(),
        avg_unit_price,
        total_quantity,
        unit,
        months,
    })
}

/// Round to a number of decimal places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
