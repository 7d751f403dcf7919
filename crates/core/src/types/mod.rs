//! Core types for Shopscout.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod price;
pub mod retailer;

pub use email::{Email, EmailError};
pub use id::*;
pub use price::{CurrencyCode, parse_amount};
pub use retailer::Retailer;
