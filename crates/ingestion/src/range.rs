//! Month-by-month range fetching.
//!
//! A range is fetched one calendar month at a time, oldest first, with a
//! pause between months. Months that fail or come back empty are skipped;
//! the rest are concatenated and turned into unit-price rows.

use crate::source::TradeSource;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};
use tradeprice_core::{AggregatedTradeRow, HsCode, Outcome, TradeRecord, YearMonth, UNIT_KG};

/// Message for a range where no month produced rows.
pub const NO_DATA_IN_RANGE: &str = "no data in range";

/// Drives a [`TradeSource`] across consecutive months.
#[derive(Debug, Clone)]
pub struct RangeAggregator<S> {
    source: S,
    month_delay: Duration,
}

impl<S: TradeSource> RangeAggregator<S> {
    /// Create an aggregator pausing `month_delay` between monthly requests.
    pub fn new(source: S, month_delay: Duration) -> Self {
        Self { source, month_delay }
    }

    /// The underlying source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetch `start..=end` month by month and derive unit prices.
    ///
    /// An inverted range issues no requests and returns an empty outcome.
    pub async fn fetch_range(
        &self,
        start: YearMonth,
        end: YearMonth,
        hs_code: &HsCode,
        country: Option<&str>,
    ) -> Outcome<AggregatedTradeRow> {
        let mut monthly = Vec::new();
        let mut months = YearMonth::range(start, end).peekable();

        while let Some(month) = months.next() {
            info!(
                "Collecting monthly data: {} (hs={}, country={})",
                month,
                hs_code,
                country.unwrap_or("-")
            );

            let outcome = self.source.fetch(month, month, hs_code, country).await;
            if let Some(message) = &outcome.message {
                warn!("{}", message);
            }
            if !outcome.is_empty() {
                monthly.push((month, outcome.rows));
            }

            if months.peek().is_some() && !self.month_delay.is_zero() {
                sleep(self.month_delay).await;
            }
        }

        if monthly.is_empty() {
            return Outcome::empty(NO_DATA_IN_RANGE);
        }
        Outcome::rows(aggregate(monthly))
    }
}

/// Concatenate monthly records in order and derive unit prices.
///
/// Rows with a non-positive import weight are dropped. A unit price that
/// is not finite becomes `None`.
pub fn aggregate(monthly: Vec<(YearMonth, Vec<TradeRecord>)>) -> Vec<AggregatedTradeRow> {
    monthly
        .into_iter()
        .flat_map(|(period, records)| records.into_iter().map(move |r| (period, r)))
        .filter(|(_, r)| r.import_weight_kg > 0.0)
        .map(|(period, r)| {
            let quantity = r.import_weight_kg;
            let unit_price = r.import_value_usd / quantity;
            AggregatedTradeRow {
                period,
                import_value_usd: r.import_value_usd,
                quantity,
                unit: UNIT_KG.to_string(),
                unit_price: unit_price.is_finite().then_some(unit_price),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::collections::HashMap;
    use std::sync::Mutex;

    fn ym(s: &str) -> YearMonth {
        s.parse().unwrap()
    }

    fn record(value: f64, weight: f64) -> TradeRecord {
        TradeRecord {
            hs_code: "0000008471".to_string(),
            period: String::new(),
            payments_balance: 0.0,
            export_value_usd: 0.0,
            export_weight_kg: 0.0,
            import_value_usd: value,
            import_weight_kg: weight,
            status_code: String::new(),
        }
    }

    /// In-memory source that records every call.
    #[derive(Default)]
    struct FakeSource {
        data: HashMap<YearMonth, Vec<TradeRecord>>,
        calls: Mutex<Vec<(YearMonth, YearMonth, Option<String>)>>,
    }

    impl FakeSource {
        fn with(mut self, month: &str, records: Vec<TradeRecord>) -> Self {
            self.data.insert(ym(month), records);
            self
        }

        fn calls(&self) -> Vec<(YearMonth, YearMonth, Option<String>)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl TradeSource for FakeSource {
        async fn fetch(
            &self,
            start: YearMonth,
            end: YearMonth,
            _hs_code: &HsCode,
            country: Option<&str>,
        ) -> Outcome<TradeRecord> {
            self.calls
                .lock()
                .unwrap()
                .push((start, end, country.map(str::to_string)));
            match self.data.get(&start) {
                Some(records) => Outcome::rows(records.clone()),
                None => Outcome::empty(format!("request failed: {start}")),
            }
        }
    }

    fn aggregator(source: FakeSource) -> RangeAggregator<FakeSource> {
        RangeAggregator::new(source, Duration::ZERO)
    }

    fn hs() -> HsCode {
        HsCode::new("8471").unwrap()
    }

    #[test]
    fn test_aggregate_drops_non_positive_weights() {
        let rows = aggregate(vec![(
            ym("202401"),
            vec![record(50.0, 0.0), record(10.0, -5.0), record(500.0, 100.0)],
        )]);

        assert_eq!(rows.len(), 1);
        assert_relative_eq!(rows[0].quantity, 100.0);
        assert_relative_eq!(rows[0].import_value_usd, 500.0);
        assert_relative_eq!(rows[0].unit_price.unwrap(), 5.0);
        assert_eq!(rows[0].unit, "kg");
        assert_eq!(rows[0].period, ym("202401"));
    }

    #[test]
    fn test_aggregate_infinite_price_is_null() {
        let rows = aggregate(vec![(ym("202401"), vec![record(100.0, f64::MIN_POSITIVE / 1e10)])]);

        assert_eq!(rows.len(), 1);
        assert!(rows[0].unit_price.is_none());
    }

    #[test]
    fn test_aggregate_preserves_month_order() {
        let rows = aggregate(vec![
            (ym("202412"), vec![record(10.0, 1.0), record(20.0, 1.0)]),
            (ym("202501"), vec![record(30.0, 1.0)]),
        ]);

        let periods: Vec<String> = rows.iter().map(|r| r.period.to_string()).collect();
        assert_eq!(periods, vec!["202412", "202412", "202501"]);
        assert_relative_eq!(rows[1].unit_price.unwrap(), 20.0);
    }

    #[tokio::test]
    async fn test_one_fetch_per_month_in_order() {
        let agg = aggregator(FakeSource::default());
        agg.fetch_range(ym("202401"), ym("202403"), &hs(), Some("CN")).await;

        let calls = agg.source().calls();
        assert_eq!(calls.len(), 3);
        for (call, month) in calls.iter().zip(["202401", "202402", "202403"]) {
            assert_eq!(call.0, ym(month));
            assert_eq!(call.1, ym(month));
            assert_eq!(call.2.as_deref(), Some("CN"));
        }
    }

    #[tokio::test]
    async fn test_year_rollover() {
        let agg = aggregator(FakeSource::default());
        agg.fetch_range(ym("202411"), ym("202502"), &hs(), None).await;

        let months: Vec<String> = agg.source().calls().iter().map(|c| c.0.to_string()).collect();
        assert_eq!(months, vec!["202411", "202412", "202501", "202502"]);
    }

    #[tokio::test]
    async fn test_inverted_range_is_empty() {
        let agg = aggregator(FakeSource::default().with("202401", vec![record(1.0, 1.0)]));
        let outcome = agg.fetch_range(ym("202403"), ym("202401"), &hs(), None).await;

        assert!(outcome.is_empty());
        assert_eq!(outcome.message.as_deref(), Some(NO_DATA_IN_RANGE));
        assert!(agg.source().calls().is_empty());
    }

    #[tokio::test]
    async fn test_failed_month_does_not_abort_range() {
        let source = FakeSource::default()
            .with("202401", vec![record(100.0, 10.0)])
            .with("202403", vec![record(300.0, 10.0), record(1.0, 0.0)]);
        let agg = aggregator(source);

        let outcome = agg.fetch_range(ym("202401"), ym("202403"), &hs(), None).await;

        assert_eq!(outcome.message, None);
        assert_eq!(outcome.rows.len(), 2);
        assert_eq!(outcome.rows[0].period, ym("202401"));
        assert_eq!(outcome.rows[1].period, ym("202403"));
        assert_relative_eq!(outcome.rows[1].unit_price.unwrap(), 30.0);
    }

    #[tokio::test]
    async fn test_all_months_empty() {
        let agg = aggregator(FakeSource::default());
        let outcome = agg.fetch_range(ym("202401"), ym("202402"), &hs(), None).await;

        assert!(outcome.is_empty());
        assert_eq!(outcome.message.as_deref(), Some(NO_DATA_IN_RANGE));
    }

    #[tokio::test]
    async fn test_only_zero_weight_rows() {
        let agg = aggregator(FakeSource::default().with("202401", vec![record(5.0, 0.0)]));
        let outcome = agg.fetch_range(ym("202401"), ym("202401"), &hs(), None).await;

        assert!(outcome.is_empty());
        assert_eq!(outcome.message, None);
    }

    #[tokio::test]
    async fn test_repeated_calls_are_identical() {
        let source = FakeSource::default()
            .with("202402", vec![record(120.0, 40.0)])
            .with("202403", vec![record(90.0, 30.0)]);
        let agg = aggregator(source);

        let first = agg.fetch_range(ym("202401"), ym("202403"), &hs(), Some("VN")).await;
        let second = agg.fetch_range(ym("202401"), ym("202403"), &hs(), Some("VN")).await;

        assert_eq!(first, second);
        assert_eq!(first.rows.len(), 2);
    }
}
