//! Search history model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shopscout_core::{SearchEntryId, UserId};
use sqlx::FromRow;

/// A recorded search, kept per user for the history panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct SearchEntry {
    pub id: SearchEntryId,
    pub user_id: UserId,
    pub search_term: String,
    pub created_at: DateTime<Utc>,
}
