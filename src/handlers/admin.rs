//! Handlers for `/api/admin` endpoints
//!
//! The management list differs from the student list on purpose: search
//! runs over title/organizer, results come most recently created first,
//! and past events are not partitioned out.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::handlers::events::sentinel;
use crate::handlers::AppState;
use crate::middleware::auth::AdminUser;
use crate::models::event::{Event, EventStatus};
use crate::models::filter::{CatalogStats, EventFilter, EventOrder, SearchScope};
use crate::store::CatalogStore;
use crate::utils::errors::UniEventError;

/// Query parameters for the admin event list
#[derive(Debug, Default, Deserialize)]
pub struct AdminListParams {
    pub search: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
}

impl AdminListParams {
    fn into_filter(self) -> Result<EventFilter, UniEventError> {
        let status = match sentinel(self.status) {
            Some(value) => Some(value.parse::<EventStatus>()?),
            None => None,
        };
        Ok(EventFilter {
            search: self.search.filter(|s| !s.trim().is_empty()),
            scope: SearchScope::TitleOrganizer,
            category: sentinel(self.category),
            organizer: None,
            status,
            from: None,
            to: None,
            show_past: None,
        })
    }
}

/// `GET /api/admin/events`
pub async fn list<S>(
    State(state): State<AppState<S>>,
    AdminUser(_admin): AdminUser,
    Query(params): Query<AdminListParams>,
) -> Result<Json<Vec<Event>>, UniEventError>
where
    S: CatalogStore + 'static,
{
    let events = state
        .catalog
        .list_events(&params.into_filter()?, EventOrder::CreatedDescending)
        .await;
    Ok(Json(events))
}

/// `GET /api/admin/stats`
pub async fn stats<S>(
    State(state): State<AppState<S>>,
    AdminUser(_admin): AdminUser,
) -> Result<Json<CatalogStats>, UniEventError>
where
    S: CatalogStore + 'static,
{
    Ok(Json(state.catalog.stats().await))
}
