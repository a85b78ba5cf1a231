//! Trade statistics ingestion for the tradeprice system.
//!
//! This crate handles:
//! - Monthly requests against the trade statistics API, with retries
//! - Mapping XML `item` elements into trade records
//! - Month-by-month range fetching and unit price derivation

pub mod fetcher;
pub mod range;
pub mod source;
pub mod xml;

pub use fetcher::TradeDataFetcher;
pub use range::{aggregate, RangeAggregator};
pub use source::TradeSource;
pub use xml::parse_items;
