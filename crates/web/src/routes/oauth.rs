//! Google OAuth route handlers.
//!
//! Handles the OAuth flow for Google sign-in:
//! - Login: Redirects to Google's OAuth authorization page
//! - Callback: Validates state, exchanges the code, and logs the session in
//!
//! Accounts provisioned through this flow carry an empty password hash and
//! can only ever log in via OAuth.

use axum::extract::{Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use rand::Rng;
use serde::Deserialize;
use tower_sessions::Session;

use shopscout_core::Email;

use crate::middleware::set_current_user;
use crate::models::session::keys;
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Query parameters from the Google OAuth callback.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    /// Authorization code to exchange for tokens.
    pub code: Option<String>,
    /// State parameter for CSRF protection.
    pub state: Option<String>,
    /// Error code if authorization failed.
    pub error: Option<String>,
}

/// Generate a cryptographically secure random alphanumeric string.
fn generate_random_string(length: usize) -> String {
    rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Initiate Google OAuth login.
///
/// Generates state and nonce parameters, stores them in the session,
/// and redirects to Google's authorization page.
///
/// # Route
///
/// `GET /login/google`
pub async fn login(State(state): State<AppState>, session: Session) -> Response {
    // Generate CSRF state and OpenID nonce
    let oauth_state = generate_random_string(32);
    let nonce = generate_random_string(32);

    // Store in session for validation on callback
    if let Err(e) = session.insert(keys::OAUTH_STATE, &oauth_state).await {
        tracing::error!("Failed to store OAuth state in session: {}", e);
        return Redirect::to("/login?error=session").into_response();
    }

    if let Err(e) = session.insert(keys::OAUTH_NONCE, &nonce).await {
        tracing::error!("Failed to store OAuth nonce in session: {}", e);
        return Redirect::to("/login?error=session").into_response();
    }

    let auth_url = state.oauth().authorization_url(&oauth_state, &nonce);

    Redirect::to(&auth_url).into_response()
}

/// Handle the Google OAuth callback.
///
/// Validates the state parameter, exchanges the authorization code for
/// tokens, reads the verified account email, and logs the session in,
/// provisioning the account on first sign-in.
///
/// # Route
///
/// `GET /google/callback`
pub async fn callback(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<CallbackQuery>,
) -> Response {
    // Check for OAuth errors from Google
    if let Some(error) = query.error {
        tracing::warn!("Google OAuth error: {}", error);
        return Redirect::to("/login?error=oauth").into_response();
    }

    // Verify we have an authorization code
    let Some(code) = query.code else {
        tracing::warn!("Google OAuth callback missing code");
        return Redirect::to("/login?error=oauth").into_response();
    };

    // Verify state parameter (CSRF protection)
    let Some(returned_state) = query.state else {
        tracing::warn!("Google OAuth callback missing state");
        return Redirect::to("/login?error=state").into_response();
    };

    let stored_state: Option<String> = session.get(keys::OAUTH_STATE).await.ok().flatten();

    if stored_state.as_ref() != Some(&returned_state) {
        tracing::warn!("Google OAuth state mismatch");
        return Redirect::to("/login?error=state").into_response();
    }

    // Clear the stored state and nonce (one-time use)
    let _ = session.remove::<String>(keys::OAUTH_STATE).await;
    let _ = session.remove::<String>(keys::OAUTH_NONCE).await;

    // Exchange code for tokens
    let tokens = match state.oauth().exchange_code(&code).await {
        Ok(tokens) => tokens,
        Err(e) => {
            tracing::error!("Failed to exchange Google OAuth code: {}", e);
            return Redirect::to("/login?error=oauth").into_response();
        }
    };

    // Read the verified account email
    let email = match state.oauth().fetch_email(&tokens.access_token).await {
        Ok(email) => email,
        Err(e) => {
            tracing::error!("Failed to fetch Google account email: {}", e);
            return Redirect::to("/login?error=oauth").into_response();
        }
    };

    let email = match Email::parse(&email) {
        Ok(email) => email,
        Err(e) => {
            tracing::warn!("Google account email rejected: {}", e);
            return Redirect::to("/login?error=email").into_response();
        }
    };

    // Resolve to an account, provisioning one on first sign-in
    let user = match AuthService::new(state.pool()).login_via_oauth(&email).await {
        Ok(user) => user,
        Err(e) => {
            tracing::error!("Failed to provision OAuth account: {}", e);
            return Redirect::to("/login?error=oauth").into_response();
        }
    };

    if let Err(e) = set_current_user(&session, &user.into()).await {
        tracing::error!("Failed to set session after OAuth login: {}", e);
        return Redirect::to("/login?error=session").into_response();
    }

    tracing::info!("Google sign-in completed");

    Redirect::to("/").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_random_string_length() {
        assert_eq!(generate_random_string(32).len(), 32);
        assert_eq!(generate_random_string(0).len(), 0);
    }

    #[test]
    fn test_generate_random_string_charset() {
        let s = generate_random_string(64);
        assert!(s.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
