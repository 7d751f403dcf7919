//! Domain models.
//!
//! Row-shaped structs live here; repositories in [`crate::db`] load and store
//! them, routes and templates consume them.

pub mod search;
pub mod session;
pub mod user;
pub mod wishlist;

pub use search::SearchEntry;
pub use session::{CurrentUser, OtpChallenge};
pub use user::User;
pub use wishlist::{Wishlist, WishlistItem};
