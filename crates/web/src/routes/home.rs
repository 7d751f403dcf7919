//! Landing page.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use crate::db::SearchEntryRepository;
use crate::error::Result;
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::models::search::SearchEntry;
use crate::models::session::CurrentUser;
use crate::state::AppState;

/// How many recent searches the landing page shows a logged-in user.
const RECENT_SEARCH_LIMIT: i64 = 5;

/// Landing page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub current_user: Option<CurrentUser>,
    pub recent_searches: Vec<SearchEntry>,
}

/// Display the landing page.
///
/// Logged-in visitors also see their most recent searches.
#[instrument(skip_all)]
pub async fn home(
    State(state): State<AppState>,
    OptionalAuth(current_user): OptionalAuth,
) -> Result<HomeTemplate> {
    let recent_searches = match &current_user {
        Some(user) => {
            SearchEntryRepository::new(state.pool())
                .recent_for_user(user.id, RECENT_SEARCH_LIMIT)
                .await?
        }
        None => Vec::new(),
    };

    Ok(HomeTemplate {
        current_user,
        recent_searches,
    })
}
