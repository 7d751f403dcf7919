//! Session-resident state.
//!
//! These types are serialized into the `PostgreSQL`-backed session store.
//! Keep them small: every request that touches the session deserializes them.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use shopscout_core::{Email, UserId};

use super::user::User;

/// How long a one-time login code stays valid.
pub const OTP_TTL_MINUTES: i64 = 5;

/// Session keys for authentication state.
pub mod keys {
    /// Key for the logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the in-flight OTP login challenge.
    pub const OTP_CHALLENGE: &str = "otp_challenge";

    /// Key for Google OAuth state (CSRF protection).
    pub const OAUTH_STATE: &str = "oauth_state";

    /// Key for Google OAuth nonce (`OpenID` Connect replay protection).
    pub const OAUTH_NONCE: &str = "oauth_nonce";
}

/// The logged-in user, as carried in the session cookie's server-side record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub username: Email,
}

impl From<User> for CurrentUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}

/// An in-flight one-time-code login.
///
/// Created after the password step succeeds, consumed when the code is
/// verified. Resending a code replaces `code` and `issued_at` but keeps the
/// pending username.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpChallenge {
    /// Six-digit code mailed to the user.
    pub code: String,
    /// When the current code was generated.
    pub issued_at: DateTime<Utc>,
    /// The account awaiting verification.
    pub username: Email,
}

impl OtpChallenge {
    /// Start a challenge for `username` with a freshly generated `code`.
    #[must_use]
    pub fn new(code: String, username: Email) -> Self {
        Self {
            code,
            issued_at: Utc::now(),
            username,
        }
    }

    /// Replace the code, restarting the expiry clock.
    pub fn reissue(&mut self, code: String) {
        self.code = code;
        self.issued_at = Utc::now();
    }

    /// Whether the code has outlived [`OTP_TTL_MINUTES`].
    ///
    /// Checked before the code itself so an expired-but-correct code is
    /// still rejected.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now - self.issued_at > Duration::minutes(OTP_TTL_MINUTES)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn challenge() -> OtpChallenge {
        OtpChallenge::new(
            "123456".to_string(),
            Email::parse("user@example.com").unwrap(),
        )
    }

    #[test]
    fn test_fresh_challenge_not_expired() {
        let c = challenge();
        assert!(!c.is_expired_at(Utc::now()));
    }

    #[test]
    fn test_challenge_expired_after_ttl() {
        let c = challenge();
        let later = c.issued_at + Duration::minutes(OTP_TTL_MINUTES) + Duration::seconds(1);
        assert!(c.is_expired_at(later));
    }

    #[test]
    fn test_challenge_valid_at_exact_ttl() {
        let c = challenge();
        let boundary = c.issued_at + Duration::minutes(OTP_TTL_MINUTES);
        assert!(!c.is_expired_at(boundary));
    }

    #[test]
    fn test_reissue_restarts_clock_and_keeps_username() {
        let mut c = challenge();
        let stale = c.issued_at - Duration::minutes(10);
        c.issued_at = stale;
        c.reissue("654321".to_string());

        assert_eq!(c.code, "654321");
        assert!(c.issued_at > stale);
        assert_eq!(c.username.as_str(), "user@example.com");
    }
}
