//! Application-wide error handling.
//!
//! All route handlers return [`AppError`] which implements `IntoResponse`.
//! Server-side failures are reported to Sentry before being rendered as an
//! HTTP status code; client errors (bad requests, auth failures) are not.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::db::RepositoryError;
use crate::retailers::FetchError;
use crate::retailers::driver::SearchError;
use crate::services::auth::AuthError;
use crate::services::currency::CurrencyError;
use crate::services::email::EmailError;

/// Convenient alias for handler return types.
pub type Result<T> = std::result::Result<T, AppError>;

/// Top-level application error.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database or repository failure
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Authentication or credential failure
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Outbound email failure
    #[error("Email error: {0}")]
    Email(#[from] EmailError),

    /// Retailer fetch failure
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Currency conversion failure
    #[error("Currency error: {0}")]
    Currency(#[from] CurrencyError),

    /// Search request or export failure
    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    /// Template rendering failure
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    /// Session store failure
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Requested resource does not exist
    #[error("Not found")]
    NotFound,

    /// Request requires an authenticated user
    #[error("Unauthorized")]
    Unauthorized,

    /// Client sent an invalid request
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Catch-all for internal failures
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// The HTTP status code this error maps to.
    ///
    /// Only the auth variants a client can cause map to 4xx; a database or
    /// OAuth-provider failure during login is the server's problem and
    /// reports as 500 like any other.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::UserAlreadyExists => StatusCode::CONFLICT,
                AuthError::WeakPassword(_) | AuthError::InvalidEmail(_) => {
                    StatusCode::BAD_REQUEST
                }
                AuthError::Repository(_)
                | AuthError::PasswordHash
                | AuthError::Http(_)
                | AuthError::OAuth(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::BadRequest(_) | Self::Search(SearchError::MissingQuery) => {
                StatusCode::BAD_REQUEST
            }
            Self::Repository(_)
            | Self::Email(_)
            | Self::Fetch(_)
            | Self::Currency(_)
            | Self::Search(_)
            | Self::Template(_)
            | Self::Session(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether this error should be reported to Sentry.
    ///
    /// Client errors (4xx) are expected traffic and not reported.
    fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Message safe to render to the client.
    fn client_message(&self) -> String {
        match self {
            Self::NotFound => "Not found".to_string(),
            Self::Unauthorized => "Unauthorized".to_string(),
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => "Invalid credentials".to_string(),
                AuthError::UserAlreadyExists => {
                    "An account with this email already exists".to_string()
                }
                AuthError::WeakPassword(msg) => msg.clone(),
                AuthError::InvalidEmail(_) => "Invalid email address".to_string(),
                _ => "Internal server error".to_string(),
            },
            Self::BadRequest(msg) => msg.clone(),
            Self::Search(SearchError::MissingQuery) => "Product name is required".to_string(),
            _ => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_server_error() {
            tracing::error!(error = %self, "request failed");
            sentry::capture_error(&self);
        } else {
            tracing::debug!(error = %self, "request rejected");
        }

        (self.status_code(), self.client_message()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        assert_eq!(AppError::NotFound.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_unauthorized_maps_to_401() {
        assert_eq!(AppError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_bad_request_maps_to_400() {
        let err = AppError::BadRequest("Invalid price format".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_bad_request_preserves_message() {
        let err = AppError::BadRequest("Username and Password are required".to_string());
        assert_eq!(err.client_message(), "Username and Password are required");
    }

    #[test]
    fn test_internal_maps_to_500() {
        let err = AppError::Internal("boom".to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_internal_hides_details_from_client() {
        let err = AppError::Internal("connection pool exhausted".to_string());
        assert_eq!(err.client_message(), "Internal server error");
    }

    #[test]
    fn test_invalid_credentials_maps_to_401() {
        let err = AppError::Auth(AuthError::InvalidCredentials);
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.client_message(), "Invalid credentials");
    }

    #[test]
    fn test_duplicate_account_maps_to_409() {
        let err = AppError::Auth(AuthError::UserAlreadyExists);
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_weak_password_maps_to_400() {
        let err = AppError::Auth(AuthError::WeakPassword("too short".to_string()));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_db_failure_during_auth_is_a_server_error() {
        // A pool timeout while checking credentials is not the client's
        // fault and must not read as a rejected login.
        let err = AppError::Auth(AuthError::Repository(RepositoryError::Database(
            sqlx::Error::PoolTimedOut,
        )));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.is_server_error());
        assert_eq!(err.client_message(), "Internal server error");
    }

    #[test]
    fn test_hashing_failure_during_auth_is_a_server_error() {
        let err = AppError::Auth(AuthError::PasswordHash);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.is_server_error());
    }

    #[test]
    fn test_oauth_exchange_failure_is_a_server_error() {
        let err = AppError::Auth(AuthError::OAuth("token exchange failed".to_string()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.client_message(), "Internal server error");
    }

    #[test]
    fn test_missing_query_maps_to_400() {
        let err = AppError::Search(SearchError::MissingQuery);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.client_message(), "Product name is required");
    }

    #[test]
    fn test_server_errors_are_reportable() {
        assert!(AppError::Internal("x".to_string()).is_server_error());
        assert!(!AppError::BadRequest("x".to_string()).is_server_error());
        assert!(!AppError::NotFound.is_server_error());
    }
}
