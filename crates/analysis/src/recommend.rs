//! Country and alternative-country recommendation.
//!
//! Both recommenders fetch every configured country over the query range
//! and summarize whatever comes back. Countries without data are skipped,
//! never reported as errors.

use crate::query::TradeQuery;
use crate::summary::{round_to, summarize, CountrySummary};
use ordered_float::OrderedFloat;
use serde::Serialize;
use std::cmp::Reverse;
use tracing::{debug, info};
use tradeprice_core::config::RecommendConfig;
use tradeprice_core::Outcome;
use tradeprice_ingestion::{RangeAggregator, TradeSource};

/// Message when no configured country has data.
pub const NOT_ENOUGH_DATA: &str = "not enough data to recommend a country";

/// Message when no country passes the alternative thresholds.
pub const NOT_ENOUGH_ALTERNATIVES: &str = "not enough alternative countries";

/// A country cheaper than the base country.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlternativeCandidate {
    /// The candidate's own summary.
    #[serde(flatten)]
    pub summary: CountrySummary,
    /// Price advantage over the base country, percent, one decimal.
    pub price_gap_pct: f64,
}

/// Result of an alternative-country search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlternativeReport {
    /// Base country summary, if it had data.
    pub base: Option<CountrySummary>,
    /// Candidates, largest price gap first.
    pub candidates: Vec<AlternativeCandidate>,
    /// Why the report is empty, if it is.
    pub message: Option<String>,
}

impl AlternativeReport {
    fn empty(base: Option<CountrySummary>, message: impl Into<String>) -> Self {
        Self {
            base,
            candidates: Vec::new(),
            message: Some(message.into()),
        }
    }

    /// Whether there is nothing to recommend.
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Recommendation engine over a range aggregator.
pub struct Recommender<S> {
    aggregator: RangeAggregator<S>,
    config: RecommendConfig,
}

impl<S: TradeSource> Recommender<S> {
    /// Create a recommender.
    pub fn new(aggregator: RangeAggregator<S>, config: RecommendConfig) -> Self {
        Self { aggregator, config }
    }

    /// The underlying aggregator.
    pub fn aggregator(&self) -> &RangeAggregator<S> {
        &self.aggregator
    }

    /// Configured countries, in scan order.
    pub fn countries(&self) -> &[String] {
        &self.config.countries
    }

    async fn summarize_country(&self, query: &TradeQuery, country: &str) -> Option<CountrySummary> {
        let outcome = self
            .aggregator
            .fetch_range(query.start, query.end, &query.hs_code, Some(country))
            .await;

        if outcome.is_empty() {
            debug!("No rows for {}: {}", country, outcome.message.as_deref().unwrap_or("-"));
            return None;
        }
        summarize(country, &outcome.rows)
    }

    /// Countries with data for the query, largest total import weight first.
    pub async fn recommend_countries(&self, query: &TradeQuery) -> Outcome<CountrySummary> {
        let mut summaries = Vec::new();
        for country in &self.config.countries {
            if let Some(summary) = self.summarize_country(query, country).await {
                summaries.push(summary);
            }
        }

        info!(
            "Country recommendation for {}: {}/{} countries with data",
            query.hs_code,
            summaries.len(),
            self.config.countries.len()
        );

        if summaries.is_empty() {
            return Outcome::empty(NOT_ENOUGH_DATA);
        }
        summaries.sort_by_key(|s| Reverse(OrderedFloat(s.total_quantity)));
        Outcome::rows(summaries)
    }

    /// Countries materially cheaper than `base`, with enough volume.
    pub async fn recommend_alternatives(&self, query: &TradeQuery, base: &str) -> AlternativeReport {
        let base_code = base.trim().to_ascii_uppercase();

        let Some(base_summary) = self.summarize_country(query, &base_code).await else {
            return AlternativeReport::empty(None, format!("no data for base country {base_code}"));
        };
        let base_price = base_summary.avg_unit_price;
        info!("Base country {} average unit price: {:.2} USD/{}", base_code, base_price, base_summary.unit);

        let mut candidates = Vec::new();
        for country in &self.config.countries {
            if country.eq_ignore_ascii_case(&base_code) {
                continue;
            }
            let Some(summary) = self.summarize_country(query, country).await else {
                continue;
            };

            let price_gap_pct = round_to((base_price - summary.avg_unit_price) / base_price * 100.0, 1);
            if price_gap_pct >= self.config.min_price_gap_pct
                && summary.total_quantity.trunc() > self.config.min_total_quantity_kg
            {
                candidates.push(AlternativeCandidate { summary, price_gap_pct });
            } else {
                debug!(
                    "{} filtered out: gap {:.1}%, quantity {:.0}",
                    country, price_gap_pct, summary.total_quantity
                );
            }
        }

        if candidates.is_empty() {
            return AlternativeReport::empty(Some(base_summary), NOT_ENOUGH_ALTERNATIVES);
        }
        candidates.sort_by_key(|c| Reverse(OrderedFloat(c.price_gap_pct)));

        AlternativeReport {
            base: Some(base_summary),
            candidates,
            message: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;
    use tradeprice_core::{HsCode, TradeRecord, YearMonth};

    /// Same (value, weight) records for every month of a country.
    #[derive(Default)]
    struct FakeSource {
        by_country: HashMap<String, Vec<(f64, f64)>>,
        countries_fetched: Mutex<Vec<String>>,
    }

    impl FakeSource {
        fn with(mut self, country: &str, records: &[(f64, f64)]) -> Self {
            self.by_country.insert(country.to_string(), records.to_vec());
            self
        }
    }

    impl TradeSource for FakeSource {
        async fn fetch(
            &self,
            start: YearMonth,
            _end: YearMonth,
            hs_code: &HsCode,
            country: Option<&str>,
        ) -> Outcome<TradeRecord> {
            let country = country.unwrap_or_default().to_string();
            self.countries_fetched.lock().unwrap().push(country.clone());

            match self.by_country.get(&country) {
                Some(records) => Outcome::rows(
                    records
                        .iter()
                        .map(|&(value, weight)| TradeRecord {
                            hs_code: hs_code.to_string(),
                            period: start.to_string(),
                            payments_balance: 0.0,
                            export_value_usd: 0.0,
                            export_weight_kg: 0.0,
                            import_value_usd: value,
                            import_weight_kg: weight,
                            status_code: String::new(),
                        })
                        .collect(),
                ),
                None => Outcome::empty(format!("no data found for {start}")),
            }
        }
    }

    fn recommender(source: FakeSource, countries: &[&str]) -> Recommender<FakeSource> {
        let config = RecommendConfig {
            countries: countries.iter().map(|c| c.to_string()).collect(),
            ..RecommendConfig::default()
        };
        Recommender::new(RangeAggregator::new(source, Duration::ZERO), config)
    }

    fn query() -> TradeQuery {
        TradeQuery::parse("8471", "202401", "202402").unwrap()
    }

    #[tokio::test]
    async fn test_countries_ranked_by_volume() {
        let source = FakeSource::default()
            .with("CN", &[(1000.0, 200.0)])
            .with("US", &[(9000.0, 900.0)])
            .with("JP", &[(300.0, 50.0)]);
        let rec = recommender(source, &["CN", "US", "JP", "DE"]);

        let outcome = rec.recommend_countries(&query()).await;

        assert_eq!(outcome.message, None);
        let order: Vec<&str> = outcome.rows.iter().map(|s| s.country.as_str()).collect();
        assert_eq!(order, vec!["US", "CN", "JP"]);

        // Two months of the same records.
        assert_relative_eq!(outcome.rows[0].total_quantity, 1800.0);
        assert_relative_eq!(outcome.rows[0].avg_unit_price, 10.0);
        assert_eq!(outcome.rows[0].months, 2);
    }

    #[tokio::test]
    async fn test_no_country_has_data() {
        let rec = recommender(FakeSource::default(), &["CN", "US"]);
        let outcome = rec.recommend_countries(&query()).await;

        assert!(outcome.is_empty());
        assert_eq!(outcome.message.as_deref(), Some(NOT_ENOUGH_DATA));
    }

    #[tokio::test]
    async fn test_alternatives_filtered_and_sorted() {
        let source = FakeSource::default()
            // Base: 10 USD/kg.
            .with("CN", &[(10_000.0, 1000.0)])
            // 20% cheaper, enough volume.
            .with("VN", &[(8_000.0, 1000.0)])
            // 50% cheaper, enough volume.
            .with("TH", &[(5_000.0, 1000.0)])
            // 50% cheaper but only 2 x 400 kg.
            .with("IN", &[(2_000.0, 400.0)])
            // 5% cheaper.
            .with("MY", &[(9_500.0, 1000.0)])
            // More expensive.
            .with("DE", &[(20_000.0, 1000.0)]);
        let rec = recommender(source, &["CN", "VN", "TH", "IN", "MY", "DE", "US"]);

        let report = rec.recommend_alternatives(&query(), "cn").await;

        assert_eq!(report.message, None);
        let base = report.base.as_ref().unwrap();
        assert_eq!(base.country, "CN");
        assert_relative_eq!(base.avg_unit_price, 10.0);

        let order: Vec<&str> = report.candidates.iter().map(|c| c.summary.country.as_str()).collect();
        assert_eq!(order, vec!["TH", "VN"]);
        assert_relative_eq!(report.candidates[0].price_gap_pct, 50.0);
        assert_relative_eq!(report.candidates[1].price_gap_pct, 20.0);
    }

    #[tokio::test]
    async fn test_base_country_not_scanned_twice() {
        let source = FakeSource::default()
            .with("CN", &[(10_000.0, 1000.0)])
            .with("VN", &[(8_000.0, 1000.0)]);
        let rec = recommender(source, &["CN", "VN"]);

        rec.recommend_alternatives(&query(), "CN").await;

        let fetched = rec.aggregator().source().countries_fetched.lock().unwrap().clone();
        // Two months each for the base and one alternative.
        assert_eq!(fetched, vec!["CN", "CN", "VN", "VN"]);
    }

    #[tokio::test]
    async fn test_missing_base_country() {
        let source = FakeSource::default().with("VN", &[(8_000.0, 1000.0)]);
        let rec = recommender(source, &["CN", "VN"]);

        let report = rec.recommend_alternatives(&query(), "CN").await;

        assert!(report.is_empty());
        assert!(report.base.is_none());
        assert_eq!(report.message.as_deref(), Some("no data for base country CN"));
    }

    #[tokio::test]
    async fn test_no_alternative_passes_thresholds() {
        let source = FakeSource::default()
            .with("CN", &[(10_000.0, 1000.0)])
            .with("VN", &[(9_900.0, 1000.0)]);
        let rec = recommender(source, &["CN", "VN"]);

        let report = rec.recommend_alternatives(&query(), "CN").await;

        assert!(report.is_empty());
        assert!(report.base.is_some());
        assert_eq!(report.message.as_deref(), Some(NOT_ENOUGH_ALTERNATIVES));
    }

    #[tokio::test]
    async fn test_fractional_kilograms_do_not_count() {
        // 2 x 500.25 kg = 1000.5 kg, whole kilograms 1000: not above the minimum.
        let source = FakeSource::default()
            .with("CN", &[(10_000.0, 1000.0)])
            .with("VN", &[(4_002.0, 500.25)])
            .with("TH", &[(4_004.0, 500.5)]);
        let rec = recommender(source, &["CN", "VN", "TH"]);

        let report = rec.recommend_alternatives(&query(), "CN").await;

        let order: Vec<&str> = report.candidates.iter().map(|c| c.summary.country.as_str()).collect();
        assert_eq!(order, vec!["TH"]);
    }

    #[tokio::test]
    async fn test_gap_is_rounded_before_threshold() {
        // 9.96% cheaper rounds to 10.0%.
        let source = FakeSource::default()
            .with("CN", &[(10_000.0, 1000.0)])
            .with("VN", &[(9_004.0, 1000.0)]);
        let rec = recommender(source, &["CN", "VN"]);

        let report = rec.recommend_alternatives(&query(), "CN").await;

        assert_eq!(report.candidates.len(), 1);
        assert_relative_eq!(report.candidates[0].price_gap_pct, 10.0);
    }
}
