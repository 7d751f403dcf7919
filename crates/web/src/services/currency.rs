//! Currency conversion backed by a cached exchange-rate API.
//!
//! Rates come from a free JSON API keyed by base currency; one response
//! carries the whole rate table for that base, so the cache is keyed the
//! same way. Conversion between equal codes is the identity and never
//! touches the provider.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

/// How long a fetched rate table stays fresh.
const RATE_TABLE_TTL: Duration = Duration::from_secs(60 * 60);

/// At most this many base currencies are cached at once.
const RATE_CACHE_CAPACITY: u64 = 64;

/// Errors from rate lookup and conversion.
#[derive(Debug, Error)]
pub enum CurrencyError {
    /// The provider knows no usable rate for this pair.
    ///
    /// Missing and zero rates both land here; dividing or multiplying by a
    /// zero rate would silently corrupt prices.
    #[error("no exchange rate from {from} to {to}")]
    UnavailableRate { from: String, to: String },

    /// HTTP failure talking to the rate API.
    #[error("rate provider error: {0}")]
    Provider(#[from] reqwest::Error),

    /// The rate API answered with something other than a rate table.
    #[error("rate provider returned malformed data: {0}")]
    MalformedResponse(String),
}

/// Source of exchange-rate tables.
///
/// The service talks to this trait so tests can substitute a fixed table
/// for the HTTP API.
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Fetch the full rate table for a base currency (uppercase code).
    async fn fetch_rates(&self, base: &str) -> Result<HashMap<String, Decimal>, CurrencyError>;
}

/// Rate provider backed by an exchangerate-api.com style endpoint.
///
/// `GET {base_url}/{CODE}` answers `{"base": "CODE", "rates": {"EUR": 0.92, ...}}`.
pub struct HttpRateProvider {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct RateTableResponse {
    rates: HashMap<String, Decimal>,
}

impl HttpRateProvider {
    /// Create a provider against the given API base URL.
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }
}

#[async_trait]
impl RateProvider for HttpRateProvider {
    async fn fetch_rates(&self, base: &str) -> Result<HashMap<String, Decimal>, CurrencyError> {
        let url = format!("{}/{base}", self.base_url);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(CurrencyError::MalformedResponse(format!(
                "unexpected status {}",
                response.status()
            )));
        }

        let table: RateTableResponse = response.json().await?;
        Ok(table.rates)
    }
}

/// Cached currency conversion service.
#[derive(Clone)]
pub struct CurrencyService {
    provider: Arc<dyn RateProvider>,
    cache: Cache<String, Arc<HashMap<String, Decimal>>>,
}

impl CurrencyService {
    /// Create a service over the given provider.
    #[must_use]
    pub fn new(provider: Arc<dyn RateProvider>) -> Self {
        let cache = Cache::builder()
            .max_capacity(RATE_CACHE_CAPACITY)
            .time_to_live(RATE_TABLE_TTL)
            .build();

        Self { provider, cache }
    }

    /// The exchange rate from `from` to `to`.
    ///
    /// Codes are matched case-insensitively. Equal codes return 1 without a
    /// provider lookup.
    ///
    /// # Errors
    ///
    /// Returns `CurrencyError::UnavailableRate` when the provider has no
    /// nonzero rate for the pair, or a provider error when the fetch fails.
    pub async fn rate(&self, from: &str, to: &str) -> Result<Decimal, CurrencyError> {
        let from = from.to_ascii_uppercase();
        let to = to.to_ascii_uppercase();

        if from == to {
            return Ok(Decimal::ONE);
        }

        let table = self.rate_table(&from).await?;
        match table.get(&to) {
            Some(rate) if !rate.is_zero() => Ok(*rate),
            _ => Err(CurrencyError::UnavailableRate { from, to }),
        }
    }

    /// Convert an amount between currencies.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::rate`].
    pub async fn convert(
        &self,
        amount: Decimal,
        from: &str,
        to: &str,
    ) -> Result<Decimal, CurrencyError> {
        let rate = self.rate(from, to).await?;
        Ok(amount * rate)
    }

    /// Fetch or reuse the cached rate table for a base currency.
    ///
    /// Failures are not cached: a transient provider outage should not
    /// poison lookups for the whole TTL.
    async fn rate_table(
        &self,
        base: &str,
    ) -> Result<Arc<HashMap<String, Decimal>>, CurrencyError> {
        if let Some(table) = self.cache.get(base).await {
            return Ok(table);
        }

        let table = Arc::new(self.provider.fetch_rates(base).await?);
        self.cache.insert(base.to_string(), table.clone()).await;
        Ok(table)
    }
}
