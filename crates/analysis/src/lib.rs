//! Price comparison analysis for the tradeprice system.
//!
//! This crate handles:
//! - Per-country summaries of aggregated monthly rows
//! - Country recommendation ranked by import volume
//! - Alternative-country recommendation against a base country

pub mod query;
pub mod recommend;
pub mod summary;

pub use query::TradeQuery;
pub use recommend::{AlternativeCandidate, AlternativeReport, Recommender};
pub use summary::{summarize, CountrySummary};
