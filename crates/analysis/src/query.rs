//! Validated search parameters.

use serde::Serialize;
use tradeprice_core::{Error, HsCode, Result, YearMonth};

/// Product and period of a comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TradeQuery {
    /// Product code.
    pub hs_code: HsCode,
    /// First month, inclusive.
    pub start: YearMonth,
    /// Last month, inclusive.
    pub end: YearMonth,
}

impl TradeQuery {
    /// Build a query, rejecting a start month after the end month.
    pub fn new(hs_code: HsCode, start: YearMonth, end: YearMonth) -> Result<Self> {
        if start > end {
            return Err(Error::invalid_range(format!(
                "start {start} is after end {end}"
            )));
        }
        Ok(Self { hs_code, start, end })
    }

    /// Parse raw user input.
    pub fn parse(hs_code: &str, start: &str, end: &str) -> Result<Self> {
        Self::new(HsCode::new(hs_code)?, start.parse()?, end.parse()?)
    }

    /// Number of months covered.
    pub fn months(&self) -> usize {
        YearMonth::range(self.start, self.end).count()
    }
}
