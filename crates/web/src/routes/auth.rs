//! Authentication route handlers.
//!
//! Password login is two-step: the password check issues a six-digit
//! one-time code by email, and the session is only promoted to logged-in
//! once the code is verified. Registration logs the new account in
//! directly. Google OAuth lives in [`super::oauth`].

use askama::Template;
use askama_web::WebTemplate;
use axum::Form;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use chrono::Utc;
use serde::Deserialize;
use tower_sessions::Session;

use crate::db::UserRepository;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{clear_current_user, set_current_user};
use crate::models::session::{OtpChallenge, keys};
use crate::services::auth::{AuthError, AuthService};
use crate::services::email::generate_login_code;
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
}

/// One-time-code verification form data.
#[derive(Debug, Deserialize)]
pub struct VerifyOtpForm {
    pub otp: String,
}

// =============================================================================
// Query Types
// =============================================================================

/// Query parameters for error display on the login page.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login / registration page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
}

/// One-time-code entry page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/verify_otp.html")]
pub struct VerifyOtpTemplate {
    pub error: Option<String>,
    pub message: Option<String>,
}

/// Human-readable text for an `?error=` code on the login page.
fn error_message(code: &str) -> String {
    match code {
        "credentials" => "Invalid username or password.",
        "exists" => "That email is already registered.",
        "password" => "Password must be at least 8 characters.",
        "email" => "Enter a valid email address.",
        "otp_expired" => "OTP expired. Please log in again.",
        "no_pending" => "No login in progress. Please log in again.",
        "session" => "Your session could not be saved. Please try again.",
        "oauth" => "Google sign-in failed. Please try again.",
        "state" => "Sign-in request could not be verified. Please try again.",
        other => other,
    }
    .to_string()
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(Query(query): Query<MessageQuery>) -> LoginTemplate {
    LoginTemplate {
        error: query.error.as_deref().map(error_message),
    }
}

/// Handle login form submission.
///
/// On a correct password this does not log the user in yet: it stores an
/// [`OtpChallenge`] in the session, emails the code, and renders the
/// verification page.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    if form.username.is_empty() || form.password.is_empty() {
        return Err(AppError::BadRequest(
            "Username and Password are required".to_string(),
        ));
    }

    let auth = AuthService::new(state.pool());
    let user = match auth.verify_credentials(&form.username, &form.password).await {
        Ok(user) => user,
        Err(AuthError::InvalidCredentials | AuthError::InvalidEmail(_)) => {
            tracing::debug!("login rejected");
            return Ok(Redirect::to("/login?error=credentials").into_response());
        }
        Err(err) => return Err(err.into()),
    };

    let challenge = OtpChallenge::new(generate_login_code(), user.username.clone());
    session.insert(keys::OTP_CHALLENGE, &challenge).await?;

    state
        .email()
        .send_login_code(user.username.as_str(), &challenge.code)
        .await?;

    Ok(VerifyOtpTemplate {
        error: None,
        message: None,
    }
    .into_response())
}

/// Handle one-time-code verification.
///
/// Expiry is checked before the code itself, so an expired-but-correct
/// code is still rejected. A correct code consumes the challenge and logs
/// the pending user in.
pub async fn verify_otp(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<VerifyOtpForm>,
) -> Result<Response> {
    let Some(challenge) = session
        .get::<OtpChallenge>(keys::OTP_CHALLENGE)
        .await?
    else {
        return Ok(Redirect::to("/login?error=no_pending").into_response());
    };

    if challenge.is_expired_at(Utc::now()) {
        session.remove::<OtpChallenge>(keys::OTP_CHALLENGE).await?;
        return Ok(Redirect::to("/login?error=otp_expired").into_response());
    }

    if form.otp != challenge.code {
        return Ok(VerifyOtpTemplate {
            error: Some("Invalid OTP".to_string()),
            message: None,
        }
        .into_response());
    }

    session.remove::<OtpChallenge>(keys::OTP_CHALLENGE).await?;

    // The account could have been removed between the password step and
    // now; treat that the same as a failed login.
    let Some(user) = UserRepository::new(state.pool())
        .find_by_username(&challenge.username)
        .await?
    else {
        return Ok(Redirect::to("/login?error=credentials").into_response());
    };

    set_current_user(&session, &user.into()).await?;
    tracing::info!("login verified");

    Ok(Redirect::to("/").into_response())
}

/// Re-send the one-time code for a pending login.
///
/// Reissuing replaces the code and restarts the expiry clock but keeps the
/// pending username.
pub async fn resend_otp(State(state): State<AppState>, session: Session) -> Result<Response> {
    let Some(mut challenge) = session
        .get::<OtpChallenge>(keys::OTP_CHALLENGE)
        .await?
    else {
        return Err(AppError::BadRequest("No pending login".to_string()));
    };

    challenge.reissue(generate_login_code());
    session.insert(keys::OTP_CHALLENGE, &challenge).await?;

    state
        .email()
        .send_login_code(challenge.username.as_str(), &challenge.code)
        .await?;

    Ok(VerifyOtpTemplate {
        error: None,
        message: Some("New OTP sent".to_string()),
    }
    .into_response())
}

// =============================================================================
// Registration Route
// =============================================================================

/// Handle registration form submission.
///
/// A new account is logged in directly; the one-time-code step only guards
/// logins to existing accounts.
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Result<Response> {
    let auth = AuthService::new(state.pool());

    let user = match auth.register(&form.username, &form.password).await {
        Ok(user) => user,
        Err(AuthError::UserAlreadyExists) => {
            return Ok(Redirect::to("/login?error=exists").into_response());
        }
        Err(AuthError::WeakPassword(_)) => {
            return Ok(Redirect::to("/login?error=password").into_response());
        }
        Err(AuthError::InvalidEmail(_)) => {
            return Ok(Redirect::to("/login?error=email").into_response());
        }
        Err(err) => return Err(err.into()),
    };

    set_current_user(&session, &user.into()).await?;
    tracing::info!("account registered");

    Ok(Redirect::to("/").into_response())
}

// =============================================================================
// Logout Route
// =============================================================================

/// Handle logout.
///
/// Destroys the whole session, which also discards any pending one-time
/// code.
pub async fn logout(session: Session) -> Result<Redirect> {
    clear_current_user(&session).await?;
    session.flush().await?;

    Ok(Redirect::to("/"))
}
