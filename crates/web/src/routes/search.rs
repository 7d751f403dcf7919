//! Product search, filtering, and CSV export route handlers.
//!
//! All three routes run the scraping driver across the registered
//! retailers. `/search` is the plain query path, `/filter` re-runs the
//! same query with sort/currency/bound controls from the result page's
//! form, and `/export_csv` streams the merged results as a spreadsheet.

use askama::Template;
use askama_web::WebTemplate;
use axum::Form;
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use shopscout_core::{CurrencyCode, Retailer};

use crate::db::SearchEntryRepository;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::models::session::CurrentUser;
use crate::retailers::ScrapedProduct;
use crate::retailers::driver::{
    SearchDriver, SearchError, SearchFilters, SearchOptions, SearchSort, to_csv,
};
use crate::state::AppState;

/// Result page size used for the pager.
const RESULTS_PER_PAGE: usize = 20;

// =============================================================================
// Query / Form Types
// =============================================================================

/// Query parameters naming the product being searched.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub product_name: Option<String>,
    /// Cap on merged results; absent or unparseable means no cap.
    pub limit: Option<String>,
}

/// Filter form posted from the result page.
///
/// Numeric bounds arrive as free text; anything unparseable means "no
/// bound". `sort=default`, `currency=usd`, and `website=all` are the
/// form's explicit no-ops.
#[derive(Debug, Deserialize)]
pub struct FilterForm {
    pub sort: Option<String>,
    pub currency: Option<String>,
    pub website: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub min_rating: Option<String>,
}

/// Query parameters for CSV export.
#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub product_name: Option<String>,
    pub sort: Option<String>,
    pub currency: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub min_rating: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Search result page template.
#[derive(Template, WebTemplate)]
#[template(path = "search/results.html")]
pub struct ResultsTemplate {
    pub query: String,
    pub products: Vec<ScrapedProduct>,
    pub total_pages: usize,
    /// Display currencies offered by the filter form.
    pub currencies: &'static [CurrencyCode],
}

// =============================================================================
// Routes
// =============================================================================

/// Run a plain search across all retailers.
///
/// # Route
///
/// `GET /search?product_name=...&limit=...`
#[instrument(skip_all)]
pub async fn search(
    State(state): State<AppState>,
    OptionalAuth(current_user): OptionalAuth,
    Query(query): Query<SearchQuery>,
) -> Result<ResultsTemplate> {
    let product = require_product(query.product_name)?;

    let options = SearchOptions {
        limit: parse_limit(query.limit.as_deref()),
        ..SearchOptions::default()
    };

    run_search(
        &state,
        current_user.as_ref(),
        product,
        options,
        SearchFilters::default(),
    )
    .await
}

/// Re-run a search with sort, currency, and bound controls.
///
/// The product name travels in the query string (the form posts back to
/// `/filter?product_name=...`); everything else comes from form fields.
///
/// # Route
///
/// `POST /filter?product_name=...`
#[instrument(skip_all)]
pub async fn filter(
    State(state): State<AppState>,
    OptionalAuth(current_user): OptionalAuth,
    Query(query): Query<SearchQuery>,
    Form(form): Form<FilterForm>,
) -> Result<ResultsTemplate> {
    let product = require_product(query.product_name)?;

    let website = match form.website.as_deref() {
        None | Some("all") => None,
        Some(tag) => Some(
            Retailer::parse(tag)
                .ok_or_else(|| AppError::BadRequest(format!("Unknown website: {tag}")))?,
        ),
    };

    let options = SearchOptions {
        currency: display_currency(form.currency.as_deref()),
        limit: parse_limit(query.limit.as_deref()),
        sort: SearchSort::parse(form.sort.as_deref()),
        website,
    };

    let filters = SearchFilters {
        min_price: parse_bound(form.min_price.as_deref()),
        max_price: parse_bound(form.max_price.as_deref()),
        min_rating: form
            .min_rating
            .as_deref()
            .and_then(|s| s.trim().parse::<f64>().ok()),
    };

    run_search(&state, current_user.as_ref(), product, options, filters).await
}

/// Export search results as a CSV attachment.
///
/// The driver always runs in USD; when a display currency is requested a
/// single `USD -> currency` rate is fetched once and applied to every
/// parseable price. An unavailable rate leaves prices unconverted.
///
/// # Route
///
/// `GET /export_csv?product_name=...&sort=...&currency=...`
#[instrument(skip_all)]
pub async fn export_csv(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> Result<Response> {
    let product = require_product(query.product_name)?;

    let options = SearchOptions {
        currency: None,
        limit: None,
        sort: SearchSort::parse(query.sort.as_deref()),
        website: None,
    };

    let driver = SearchDriver::new(state.registry(), state.currency());
    let mut products = driver.run(&product, options).await;

    let filters = SearchFilters {
        min_price: parse_bound(query.min_price.as_deref()),
        max_price: parse_bound(query.max_price.as_deref()),
        min_rating: query
            .min_rating
            .as_deref()
            .and_then(|s| s.trim().parse::<f64>().ok()),
    };
    if !filters.is_empty() {
        products = filters.apply(products);
    }

    let rate = match display_currency(query.currency.as_deref()) {
        Some(code) => match state.currency().rate("USD", code.as_str()).await {
            Ok(rate) => Some(rate),
            Err(err) => {
                tracing::warn!(currency = %code, error = %err, "rate unavailable, exporting unconverted prices");
                None
            }
        },
        None => None,
    };

    let csv = to_csv(&products, rate)?;

    let headers = [
        (header::CONTENT_TYPE, "text/csv".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{product}.csv\""),
        ),
    ];

    Ok((headers, csv).into_response())
}

// =============================================================================
// Helpers
// =============================================================================

/// Reject requests that never named a product.
fn require_product(product_name: Option<String>) -> Result<String> {
    product_name
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .ok_or_else(|| SearchError::MissingQuery.into())
}

/// Map a form currency value to a conversion target.
///
/// `usd` (any case) and unknown codes mean "leave prices in USD".
fn display_currency(value: Option<&str>) -> Option<CurrencyCode> {
    value
        .filter(|c| !c.eq_ignore_ascii_case("usd"))
        .and_then(CurrencyCode::parse)
}

/// Parse a numeric bound off the filter form; unparseable means no bound.
fn parse_bound(value: Option<&str>) -> Option<Decimal> {
    value.and_then(|s| s.trim().parse().ok())
}

/// Parse a result cap; absent, unparseable, or zero means no cap.
fn parse_limit(value: Option<&str>) -> Option<usize> {
    value
        .and_then(|s| s.trim().parse::<usize>().ok())
        .filter(|n| *n > 0)
}

/// Run the driver, record the search for logged-in users, and build the
/// result page.
async fn run_search(
    state: &AppState,
    current_user: Option<&CurrentUser>,
    product: String,
    options: SearchOptions,
    filters: SearchFilters,
) -> Result<ResultsTemplate> {
    let driver = SearchDriver::new(state.registry(), state.currency());
    let mut products = driver.run(&product, options).await;

    tracing::info!(query = %product, results = products.len(), "search completed");

    if !filters.is_empty() {
        products = filters.apply(products);
    }

    if let Some(user) = current_user {
        SearchEntryRepository::new(state.pool())
            .record(user.id, &product)
            .await?;
    }

    let total_pages = products.len() / RESULTS_PER_PAGE;

    Ok(ResultsTemplate {
        query: product,
        products,
        total_pages,
        currencies: &CurrencyCode::ALL,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_product_rejects_missing_and_blank() {
        assert!(require_product(None).is_err());
        assert!(require_product(Some(String::new())).is_err());
        assert!(require_product(Some("   ".to_string())).is_err());
    }

    #[test]
    fn test_require_product_trims() {
        assert_eq!(
            require_product(Some("  laptop  ".to_string())).ok(),
            Some("laptop".to_string())
        );
    }

    #[test]
    fn test_display_currency_usd_is_a_noop() {
        assert_eq!(display_currency(Some("usd")), None);
        assert_eq!(display_currency(Some("USD")), None);
        assert_eq!(display_currency(Some("inr")), Some(CurrencyCode::INR));
        assert_eq!(display_currency(None), None);
    }

    #[test]
    fn test_parse_limit_tolerates_garbage() {
        assert_eq!(parse_limit(Some("10")), Some(10));
        assert_eq!(parse_limit(Some(" 3 ")), Some(3));
        assert_eq!(parse_limit(Some("0")), None);
        assert_eq!(parse_limit(Some("ten")), None);
        assert_eq!(parse_limit(None), None);
    }

    #[test]
    fn test_parse_bound_unparseable_means_unbounded() {
        assert_eq!(parse_bound(Some("cheap")), None);
        assert_eq!(parse_bound(Some("")), None);
        assert_eq!(parse_bound(None), None);
        assert_eq!(parse_bound(Some(" 25.50 ")), Some(Decimal::new(2550, 2)));
    }
}
