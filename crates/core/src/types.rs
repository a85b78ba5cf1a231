//! Core data types for the tradeprice system.

use crate::error::{Error, Result};
use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Width of a normalized HS code.
pub const HS_CODE_LEN: usize = 10;

/// Unit of every aggregated quantity.
pub const UNIT_KG: &str = "kg";

/// HS classification code, always exactly 10 digits (left-padded with '0').
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HsCode(String);

impl HsCode {
    /// Normalize a raw code such as `"8471"` into `"0000008471"`.
    pub fn new(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(Error::invalid_hs_code("empty code"));
        }
        if !trimmed.chars().all(|c| c.is_ascii_digit()) {
            return Err(Error::invalid_hs_code(format!("'{trimmed}' contains non-digit characters")));
        }
        if trimmed.len() > HS_CODE_LEN {
            return Err(Error::invalid_hs_code(format!(
                "'{trimmed}' is longer than {HS_CODE_LEN} digits"
            )));
        }
        Ok(Self(format!("{:0>width$}", trimmed, width = HS_CODE_LEN)))
    }

    /// The normalized 10-character code.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HsCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for HsCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for HsCode {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::new(&s)
    }
}

impl From<HsCode> for String {
    fn from(code: HsCode) -> Self {
        code.0
    }
}

/// A calendar month, written as `YYYYMM` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct YearMonth(NaiveDate);

impl YearMonth {
    /// Create from a year and a 1-based month.
    pub fn new(year: i32, month: u32) -> Result<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(Self)
            .ok_or_else(|| Error::invalid_period(format!("{year:04}{month:02}")))
    }

    /// Calendar year.
    pub fn year(self) -> i32 {
        self.0.year()
    }

    /// Month of the year (1-12).
    pub fn month(self) -> u32 {
        self.0.month()
    }

    /// The following month, rolling over the year boundary.
    pub fn next(self) -> Option<Self> {
        self.0.checked_add_months(Months::new(1)).map(Self)
    }

    /// Every month from `start` to `end` inclusive, in increasing order.
    ///
    /// An inverted range yields nothing.
    pub fn range(start: Self, end: Self) -> MonthRange {
        MonthRange {
            next: Some(start),
            end,
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}{:02}", self.year(), self.month())
    }
}

impl FromStr for YearMonth {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.len() != 6 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::invalid_period(format!("'{s}' is not in YYYYMM format")));
        }
        let year: i32 = s[..4]
            .parse()
            .map_err(|_| Error::invalid_period(s.to_string()))?;
        let month: u32 = s[4..]
            .parse()
            .map_err(|_| Error::invalid_period(s.to_string()))?;
        Self::new(year, month)
    }
}

impl TryFrom<String> for YearMonth {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<YearMonth> for String {
    fn from(ym: YearMonth) -> Self {
        ym.to_string()
    }
}

/// Iterator over consecutive months, see [`YearMonth::range`].
#[derive(Debug, Clone)]
pub struct MonthRange {
    next: Option<YearMonth>,
    end: YearMonth,
}

impl Iterator for MonthRange {
    type Item = YearMonth;

    fn next(&mut self) -> Option<YearMonth> {
        let current = self.next.filter(|ym| *ym <= self.end)?;
        self.next = current.next();
        Some(current)
    }
}

/// One trade statistics row: one month, one HS code, one country scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    /// HS code as reported by the source.
    pub hs_code: String,
    /// Period as reported by the source.
    pub period: String,
    /// Balance of payments (USD).
    pub payments_balance: f64,
    /// Export value (USD).
    pub export_value_usd: f64,
    /// Export weight (kg).
    pub export_weight_kg: f64,
    /// Import value (USD).
    pub import_value_usd: f64,
    /// Import weight (kg).
    pub import_weight_kg: f64,
    /// Opaque status code, passed through.
    pub status_code: String,
}

/// One aggregated month with a derived unit price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedTradeRow {
    /// Requested month.
    pub period: YearMonth,
    /// Import value (USD).
    pub import_value_usd: f64,
    /// Import weight, always positive.
    pub quantity: f64,
    /// Quantity unit, always "kg".
    pub unit: String,
    /// Import value per unit; `None` when the division is not finite.
    pub unit_price: Option<f64>,
}

/// Rows plus an optional human-readable status message.
///
/// Absence of data is never an error: it is an empty outcome, usually
/// carrying a message explaining why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome<T> {
    /// Result rows, possibly empty.
    pub rows: Vec<T>,
    /// Informational or failure message.
    pub message: Option<String>,
}

impl<T> Outcome<T> {
    /// Outcome carrying rows and no message.
    pub fn rows(rows: Vec<T>) -> Self {
        Self { rows, message: None }
    }

    /// Empty outcome with a message.
    pub fn empty(message: impl Into<String>) -> Self {
        Self {
            rows: Vec::new(),
            message: Some(message.into()),
        }
    }

    /// Whether there is nothing to show.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
