//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Renders blank scraped text as "N/A".
///
/// Retailer pages do not always carry a price or rating node; the scrapers
/// keep those fields as empty strings rather than inventing values.
///
/// Usage in templates: `{{ product.price|or_na }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn or_na(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let text = value.to_string();
    if text.trim().is_empty() {
        Ok("N/A".to_owned())
    } else {
        Ok(text)
    }
}

/// Returns the content hash for styles.css.
///
/// The hash is computed at build time from the CSS file content.
///
/// Usage in templates: `{{ ""|css_hash }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn css_hash(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<&'static str> {
    Ok(env!("CSS_HASH"))
}
