//! User account model.

use serde::{Deserialize, Serialize};
use shopscout_core::{Email, UserId};
use sqlx::FromRow;

/// An account holder.
///
/// The username doubles as the email address: one-time login codes and
/// shared wishlists are delivered to it. The password hash never travels on
/// this struct; [`crate::db::UserRepository`] hands it out separately to the
/// credential verifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: UserId,
    pub username: Email,
}
