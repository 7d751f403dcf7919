//! HTTP middleware.
//!
//! - [`session`] - `PostgreSQL`-backed session layer
//! - [`auth`] - login-state extractors and session helpers

pub mod auth;
pub mod session;

pub use auth::{OptionalAuth, RequireAuth, clear_current_user, set_current_user};
pub use session::create_session_layer;
