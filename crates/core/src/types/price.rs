//! Price text parsing and currency codes.
//!
//! Scraped retailer pages hand us free-form price text ("$1,299.99",
//! "USD 10", "N/A"). [`parse_amount`] is the single place that turns such
//! text into a [`Decimal`]; prices otherwise travel as the raw text the
//! retailer served.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// ISO 4217 currency codes offered as display currencies.
///
/// This is the closed set the UI exposes. Currency prefixes extracted from
/// stored price strings are open-ended and travel as plain `&str` codes; this
/// enum exists where a route or template needs an enumerable choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
    INR,
    JPY,
}

impl CurrencyCode {
    /// All offered display currencies, in UI order.
    pub const ALL: [Self; 7] = [
        Self::USD,
        Self::EUR,
        Self::GBP,
        Self::CAD,
        Self::AUD,
        Self::INR,
        Self::JPY,
    ];

    /// The uppercase ISO code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
            Self::INR => "INR",
            Self::JPY => "JPY",
        }
    }

    /// Parse a code, case-insensitively. Returns `None` for unknown codes.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "USD" => Some(Self::USD),
            "EUR" => Some(Self::EUR),
            "GBP" => Some(Self::GBP),
            "CAD" => Some(Self::CAD),
            "AUD" => Some(Self::AUD),
            "INR" => Some(Self::INR),
            "JPY" => Some(Self::JPY),
            _ => None,
        }
    }

}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extract the first numeric amount from free-form price text.
///
/// Tolerates currency symbols, code prefixes, and thousands separators:
/// `"$1,299.99"` → `1299.99`, `"USD 10"` → `10`. Returns `None` when the
/// text carries no digits (`""`, `"N/A"`).
#[must_use]
pub fn parse_amount(text: &str) -> Option<Decimal> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let mut number = String::new();
    let mut seen_dot = false;

    for c in text.get(start..)?.chars() {
        match c {
            '0'..='9' => number.push(c),
            // Thousands separator
            ',' => {}
            '.' if !seen_dot => {
                seen_dot = true;
                number.push(c);
            }
            _ => break,
        }
    }

    number.trim_end_matches('.').parse::<Decimal>().ok()
}
