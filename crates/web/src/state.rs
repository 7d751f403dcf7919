//! Shared application state threaded through all routes.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ScoutConfig;
use crate::retailers::AdapterRegistry;
use crate::services::currency::CurrencyService;
use crate::services::email::EmailService;
use crate::services::oauth::GoogleOAuthClient;

/// Shared application state.
///
/// Cloning is cheap: the inner state lives behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ScoutConfig,
    pool: PgPool,
    registry: AdapterRegistry,
    currency: CurrencyService,
    email: EmailService,
    oauth: GoogleOAuthClient,
}

impl AppState {
    /// Assemble the application state from its parts.
    #[must_use]
    pub fn new(
        config: ScoutConfig,
        pool: PgPool,
        registry: AdapterRegistry,
        currency: CurrencyService,
        email: EmailService,
        oauth: GoogleOAuthClient,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                registry,
                currency,
                email,
                oauth,
            }),
        }
    }

    /// Application configuration.
    #[must_use]
    pub fn config(&self) -> &ScoutConfig {
        &self.inner.config
    }

    /// Database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Retailer adapter registry.
    #[must_use]
    pub fn registry(&self) -> &AdapterRegistry {
        &self.inner.registry
    }

    /// Currency conversion service.
    #[must_use]
    pub fn currency(&self) -> &CurrencyService {
        &self.inner.currency
    }

    /// Outbound email service.
    #[must_use]
    pub fn email(&self) -> &EmailService {
        &self.inner.email
    }

    /// Google OAuth client.
    #[must_use]
    pub fn oauth(&self) -> &GoogleOAuthClient {
        &self.inner.oauth
    }
}
