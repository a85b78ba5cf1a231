//! Core types and configuration for the tradeprice system.
//!
//! This crate provides shared types used across all other crates:
//! - Trade statistics records and aggregated monthly rows
//! - HS codes and year-month periods
//! - The major trading partner table
//! - Configuration structures
//! - Common error types

pub mod config;
pub mod country;
pub mod error;
pub mod types;

pub use config::Config;
pub use country::{country_name, Country, MAJOR_COUNTRIES};
pub use error::{Error, Result};
pub use types::*;
