//! Google OAuth 2.0 client.
//!
//! Implements the server-side authorization code flow against Google's
//! OpenID Connect endpoints. No local `id_token` validation is performed:
//! the account email is read from the userinfo endpoint over TLS using the
//! freshly exchanged access token, which gives the same authenticity
//! guarantee without a JWT dependency.
//!
//! # OAuth Flow
//!
//! 1. Generate the authorization URL with [`GoogleOAuthClient::authorization_url`]
//! 2. Redirect the user to Google's consent page
//! 3. Google redirects back with an authorization code
//! 4. Exchange the code for tokens with [`GoogleOAuthClient::exchange_code`]
//! 5. Read the account email with [`GoogleOAuthClient::fetch_email`]

use std::sync::Arc;

use secrecy::ExposeSecret;
use serde::Deserialize;

use crate::config::ScoutConfig;
use crate::services::auth::AuthError;

const AUTHORIZATION_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/auth";
const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
const USERINFO_ENDPOINT: &str = "https://openidconnect.googleapis.com/v1/userinfo";

/// Tokens returned by Google's token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleTokens {
    /// Bearer token for the userinfo endpoint.
    pub access_token: String,
    /// OpenID Connect identity token, kept for completeness.
    #[serde(default)]
    pub id_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UserInfo {
    email: Option<String>,
    email_verified: Option<bool>,
}

/// Client for Google's OAuth 2.0 / OpenID Connect endpoints.
#[derive(Clone)]
pub struct GoogleOAuthClient {
    inner: Arc<GoogleOAuthClientInner>,
}

struct GoogleOAuthClientInner {
    client: reqwest::Client,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
}

impl GoogleOAuthClient {
    /// Create a new Google OAuth client.
    #[must_use]
    pub fn new(config: &ScoutConfig) -> Self {
        Self {
            inner: Arc::new(GoogleOAuthClientInner {
                client: reqwest::Client::new(),
                client_id: config.google.client_id.clone(),
                client_secret: config.google.client_secret.expose_secret().to_string(),
                redirect_uri: config.google_redirect_uri(),
            }),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // OAuth Flow
    // ─────────────────────────────────────────────────────────────────────────

    /// Generate the authorization URL for Google login.
    ///
    /// Redirect users to this URL to begin the OAuth flow.
    ///
    /// # Arguments
    ///
    /// * `state` - A random string stored in the session to prevent CSRF attacks
    /// * `nonce` - A random string for `OpenID` Connect replay protection
    #[must_use]
    pub fn authorization_url(&self, state: &str, nonce: &str) -> String {
        format!(
            "{AUTHORIZATION_ENDPOINT}?\
            client_id={}&\
            response_type=code&\
            redirect_uri={}&\
            scope=openid%20email%20profile&\
            state={}&\
            nonce={}",
            urlencoding::encode(&self.inner.client_id),
            urlencoding::encode(&self.inner.redirect_uri),
            urlencoding::encode(state),
            urlencoding::encode(nonce)
        )
    }

    /// Exchange an authorization code for access tokens.
    ///
    /// # Errors
    ///
    /// Returns an error if the token exchange fails.
    pub async fn exchange_code(&self, code: &str) -> Result<GoogleTokens, AuthError> {
        let params = [
            ("grant_type", "authorization_code"),
            ("client_id", &self.inner.client_id),
            ("client_secret", &self.inner.client_secret),
            ("code", code),
            ("redirect_uri", &self.inner.redirect_uri),
        ];

        let response = self
            .inner
            .client
            .post(TOKEN_ENDPOINT)
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AuthError::OAuth(format!("token exchange failed: {text}")));
        }

        Ok(response.json::<GoogleTokens>().await?)
    }

    /// Fetch the account email from the userinfo endpoint.
    ///
    /// Rejects accounts whose email Google reports as unverified.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response carries no
    /// usable email address.
    pub async fn fetch_email(&self, access_token: &str) -> Result<String, AuthError> {
        let response = self
            .inner
            .client
            .get(USERINFO_ENDPOINT)
            .bearer_auth(access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AuthError::OAuth(format!(
                "userinfo request failed ({status}): {text}"
            )));
        }

        let info: UserInfo = response.json().await?;

        if info.email_verified == Some(false) {
            return Err(AuthError::OAuth(
                "Google account email is not verified".to_string(),
            ));
        }

        info.email
            .ok_or_else(|| AuthError::OAuth("userinfo response carried no email".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> GoogleOAuthClient {
        GoogleOAuthClient {
            inner: Arc::new(GoogleOAuthClientInner {
                client: reqwest::Client::new(),
                client_id: "client-123.apps.googleusercontent.com".to_string(),
                client_secret: "shhh".to_string(),
                redirect_uri: "https://scout.example.com/google/callback".to_string(),
            }),
        }
    }

    #[test]
    fn test_authorization_url_points_at_google() {
        let url = test_client().authorization_url("st", "no");
        assert!(url.starts_with("https://accounts.google.com/o/oauth2/auth?"));
        assert!(url.contains("response_type=code"));
    }

    #[test]
    fn test_authorization_url_carries_state_and_nonce() {
        let url = test_client().authorization_url("state-abc", "nonce-xyz");
        assert!(url.contains("state=state-abc"));
        assert!(url.contains("nonce=nonce-xyz"));
    }

    #[test]
    fn test_authorization_url_encodes_redirect_uri() {
        let url = test_client().authorization_url("s", "n");
        assert!(url.contains("redirect_uri=https%3A%2F%2Fscout.example.com%2Fgoogle%2Fcallback"));
    }

    #[test]
    fn test_authorization_url_requests_openid_scopes() {
        let url = test_client().authorization_url("s", "n");
        assert!(url.contains("scope=openid%20email%20profile"));
    }
}
