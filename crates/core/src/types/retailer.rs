//! Retailer tags.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A retailer recognized by Shopscout.
///
/// The string forms are the tags stored on wishlist items and carried in
/// scraped results. Not every variant has a price adapter: `Bjs` and `Etsy`
/// are legacy tags that wishlist rows may still carry; lookups for them
/// resolve to "not supported" and leave stored prices untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Retailer {
    Amazon,
    Google,
    Walmart,
    Ebay,
    #[serde(rename = "bestbuy")]
    BestBuy,
    Target,
    #[serde(rename = "BJS")]
    Bjs,
    #[serde(rename = "Etsy")]
    Etsy,
}

impl Retailer {
    /// Every recognized tag, in display order.
    pub const ALL: [Self; 8] = [
        Self::Amazon,
        Self::Google,
        Self::Walmart,
        Self::Ebay,
        Self::BestBuy,
        Self::Target,
        Self::Bjs,
        Self::Etsy,
    ];

    /// The stored tag for this retailer.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Amazon => "amazon",
            Self::Google => "google",
            Self::Walmart => "walmart",
            Self::Ebay => "ebay",
            Self::BestBuy => "bestbuy",
            Self::Target => "target",
            Self::Bjs => "BJS",
            Self::Etsy => "Etsy",
        }
    }

    /// Human-readable name for templates.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Amazon => "Amazon",
            Self::Google => "Google Shopping",
            Self::Walmart => "Walmart",
            Self::Ebay => "eBay",
            Self::BestBuy => "Best Buy",
            Self::Target => "Target",
            Self::Bjs => "BJ's",
            Self::Etsy => "Etsy",
        }
    }

    /// Parse a stored tag. Unknown tags return `None`; callers treat those
    /// the same as a retailer without an adapter.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "amazon" => Some(Self::Amazon),
            "google" => Some(Self::Google),
            "walmart" => Some(Self::Walmart),
            "ebay" => Some(Self::Ebay),
            "bestbuy" => Some(Self::BestBuy),
            "target" => Some(Self::Target),
            "BJS" => Some(Self::Bjs),
            "Etsy" => Some(Self::Etsy),
            _ => None,
        }
    }
}

impl fmt::Display for Retailer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roundtrip() {
        for retailer in Retailer::ALL {
            assert_eq!(Retailer::parse(retailer.as_str()), Some(retailer));
        }
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(Retailer::parse("sears"), None);
        assert_eq!(Retailer::parse(""), None);
        // Tags are exact; the legacy ones are capitalized
        assert_eq!(Retailer::parse("bjs"), None);
    }

    #[test]
    fn test_display_matches_tag() {
        assert_eq!(Retailer::BestBuy.to_string(), "bestbuy");
        assert_eq!(Retailer::Bjs.to_string(), "BJS");
    }
}
