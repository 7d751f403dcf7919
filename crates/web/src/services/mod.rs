//! Business logic services for the web application.
//!
//! # Services
//!
//! - `auth` - Password authentication and OAuth account provisioning
//! - `currency` - Exchange-rate lookup and conversion with a cached rate table
//! - `email` - Email delivery via SMTP (login codes, wishlist sharing)
//! - `normalizer` - Wishlist price refresh against live retailer pages
//! - `oauth` - Google OAuth 2.0 authorization code flow

pub mod auth;
pub mod currency;
pub mod email;
pub mod normalizer;
pub mod oauth;

pub use auth::{AuthError, AuthService};
pub use currency::{CurrencyError, CurrencyService, HttpRateProvider, RateProvider};
pub use email::{EmailError, EmailService, generate_login_code};
pub use normalizer::{PriceNormalizer, find_currency};
pub use oauth::{GoogleOAuthClient, GoogleTokens};
