//! Major trading partners scanned by the recommenders.

use serde::Serialize;

/// A trading partner country.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Country {
    /// Two-letter country code used by the trade statistics API.
    pub code: &'static str,
    /// Display name.
    pub name: &'static str,
}

/// Default countries, in scan order.
pub const MAJOR_COUNTRIES: [Country; 20] = [
    Country { code: "CN", name: "China" },
    Country { code: "US", name: "United States" },
    Country { code: "JP", name: "Japan" },
    Country { code: "DE", name: "Germany" },
    Country { code: "VN", name: "Vietnam" },
    Country { code: "TH", name: "Thailand" },
    Country { code: "ID", name: "Indonesia" },
    Country { code: "IN", name: "India" },
    Country { code: "IT", name: "Italy" },
    Country { code: "MY", name: "Malaysia" },
    Country { code: "FR", name: "France" },
    Country { code: "NL", name: "Netherlands" },
    Country { code: "CA", name: "Canada" },
    Country { code: "AU", name: "Australia" },
    Country { code: "MX", name: "Mexico" },
    Country { code: "CZ", name: "Czechia" },
    Country { code: "PL", name: "Poland" },
    Country { code: "TR", name: "Turkey" },
    Country { code: "ES", name: "Spain" },
    Country { code: "GB", name: "United Kingdom" },
];

impl Country {
    /// Find a known country by code (case-insensitive).
    pub fn lookup(code: &str) -> Option<&'static Country> {
        MAJOR_COUNTRIES
            .iter()
            .find(|c| c.code.eq_ignore_ascii_case(code.trim()))
    }
}

/// Display name for a code, or the code itself when unknown.
pub fn country_name(code: &str) -> &str {
    Country::lookup(code).map(|c| c.name).unwrap_or(code)
}
