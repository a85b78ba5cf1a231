//! Plain-text tables for terminal output.

use std::fmt::Write;
use tradeprice_analysis::{AlternativeReport, CountrySummary};
use tradeprice_core::{country_name, AggregatedTradeRow};

/// Integer part with thousands separators, e.g. `1234567.8` -> `1,234,567`.
pub fn group_thousands(value: f64) -> String {
    let int = value.trunc() as i64;
    let digits = int.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if int < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Monthly rows of a range fetch.
pub fn render_rows(rows: &[AggregatedTradeRow]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<8} {:>16} {:>16} {:>16}", "period", "import (USD)", "quantity", "unit price");
    for row in rows {
        let price = row
            .unit_price
            .map(|p| format!("{p:.2} USD/{}", row.unit))
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "{:<8} {:>16} {:>16} {:>16}",
            row.period,
            group_thousands(row.import_value_usd),
            format!("{} {}", group_thousands(row.quantity), row.unit),
            price
        );
    }
    out
}

/// Country recommendation table.
pub fn render_countries(summaries: &[CountrySummary]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<16} {:>18} {:>18}", "country", "avg unit price", "total weight");
    for s in summaries {
        let _ = writeln!(
            out,
            "{:<16} {:>18} {:>18}",
            s.country_name,
            format!("{:.2} USD/{}", s.avg_unit_price, s.unit),
            format!("{} {}", group_thousands(s.total_quantity), s.unit)
        );
    }
    out
}

/// Base price line and alternative-country table.
pub fn render_alternatives(report: &AlternativeReport) -> String {
    let mut out = String::new();
    if let Some(base) = &report.base {
        let _ = writeln!(
            out,
            "base country {} average unit price: {:.2} USD/{}",
            base.country_name, base.avg_unit_price, base.unit
        );
    }
    if report.candidates.is_empty() {
        return out;
    }
    let _ = writeln!(
        out,
        "{:<16} {:>18} {:>10} {:>18}",
        "country", "avg unit price", "gap", "total weight"
    );
    for c in &report.candidates {
        let s = &c.summary;
        let _ = writeln!(
            out,
            "{:<16} {:>18} {:>10} {:>18}",
            s.country_name,
            format!("{:.2} USD/{}", s.avg_unit_price, s.unit),
            format!("{:+.1}%", c.price_gap_pct),
            format!("{} {}", group_thousands(s.total_quantity), s.unit)
        );
    }
    out
}

/// Configured country codes with display names.
pub fn render_country_list(codes: &[String]) -> String {
    let mut out = String::new();
    for code in codes {
        let _ = writeln!(out, "{:<4} {}", code, country_name(code));
    }
    out
}
