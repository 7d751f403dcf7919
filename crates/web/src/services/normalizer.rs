//! Best-effort wishlist price refresh.
//!
//! Every wishlist read passes each item through [`PriceNormalizer::refresh`]:
//! fetch the current price from the retailer, restore the currency the
//! stored price was denominated in, and persist the result. Nothing here
//! ever fails a read — a fetch problem just leaves the stored price alone.

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use shopscout_core::{CurrencyCode, WishlistId, parse_amount};
use tracing::instrument;

use crate::db::{RepositoryError, WishlistRepository};
use crate::models::WishlistItem;
use crate::retailers::AdapterRegistry;
use crate::services::currency::CurrencyService;

/// Leading alphabetic token of a stored price, read as its currency code.
///
/// `"USD 10"` has one, `"$12.50"` and bare numbers have none. The token is
/// open-ended: unknown codes reach the converter with no rate available,
/// and the fetched price is kept as-is.
static CURRENCY_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[a-zA-Z]{3,5}").expect("literal regex"));

/// Extract the currency prefix from stored price text, if any.
#[must_use]
pub fn find_currency(price: &str) -> Option<&str> {
    CURRENCY_PREFIX.find(price).map(|m| m.as_str())
}

/// Refreshes stored wishlist prices from live retailer pages.
pub struct PriceNormalizer<'a> {
    registry: &'a AdapterRegistry,
    currency: &'a CurrencyService,
}

impl<'a> PriceNormalizer<'a> {
    #[must_use]
    pub const fn new(registry: &'a AdapterRegistry, currency: &'a CurrencyService) -> Self {
        Self { registry, currency }
    }

    /// Read a wishlist through the refresh pass.
    ///
    /// Items are refreshed one at a time, blocking on each fetch; changed
    /// prices are persisted before the next item is touched.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` only for database failures; fetch and
    /// conversion problems never propagate.
    pub async fn normalized_items(
        &self,
        repo: &WishlistRepository<'_>,
        wishlist_id: WishlistId,
    ) -> Result<Vec<WishlistItem>, RepositoryError> {
        let mut items = repo.items(wishlist_id).await?;

        for item in &mut items {
            let refreshed = self
                .refresh(&item.website, &item.link, item.price.as_deref())
                .await;
            if refreshed != item.price {
                repo.update_item_price(item.id, refreshed.as_deref()).await?;
                item.price = refreshed;
            }
        }

        Ok(items)
    }

    /// Compute the price text an item should store now.
    ///
    /// - Fetch failure, unsupported tag, or empty fetched text keeps the
    ///   stored price.
    /// - A stored currency prefix is restored by converting the fetched
    ///   (dollar-denominated) price into that currency, written as a bare
    ///   two-decimal number.
    /// - Everything else stores the fetched text as-is.
    #[instrument(skip(self), fields(website = %website))]
    pub async fn refresh(
        &self,
        website: &str,
        link: &str,
        stored: Option<&str>,
    ) -> Option<String> {
        let fetched = match self.registry.fetch_price(website, link).await {
            Ok(raw) => raw,
            Err(err) if err.is_not_supported() => {
                tracing::debug!("no adapter for stored tag, keeping price");
                return stored.map(str::to_string);
            }
            Err(err) => {
                tracing::warn!(error = %err, "price refresh failed, keeping stored price");
                return stored.map(str::to_string);
            }
        };

        let fetched = fetched.trim();
        if fetched.is_empty() {
            return stored.map(str::to_string);
        }

        let Some(code) = stored.and_then(find_currency) else {
            return Some(fetched.to_string());
        };

        let Some(amount) = parse_amount(fetched) else {
            return Some(fetched.to_string());
        };

        match self
            .currency
            .convert(amount, CurrencyCode::USD.as_str(), code)
            .await
        {
            Ok(converted) => Some(format_refreshed(converted)),
            Err(err) => {
                tracing::warn!(error = %err, code, "currency restore failed, storing fetched price");
                Some(fetched.to_string())
            }
        }
    }
}

/// Refreshed prices are stored as bare two-decimal numbers.
fn format_refreshed(amount: Decimal) -> String {
    let mut rounded = amount.round_dp(2);
    rounded.rescale(2);
    rounded.to_string()
}
