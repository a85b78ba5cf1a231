//! Abstraction over where monthly trade records come from.

use tradeprice_core::{HsCode, Outcome, TradeRecord, YearMonth};

/// A source of trade records for a period, product and optional country.
///
/// Implementations never fail: transport problems and empty results both
/// come back as an empty [`Outcome`] with a message.
#[allow(async_fn_in_trait)]
pub trait TradeSource {
    /// Fetch records for `start..=end`.
    async fn fetch(
        &self,
        start: YearMonth,
        end: YearMonth,
        hs_code: &HsCode,
        country: Option<&str>,
    ) -> Outcome<TradeRecord>;
}
