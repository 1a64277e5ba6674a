//! Handlers for `/api/events` endpoints
//!
//! | Method   | Path                          | Access |
//! |----------|-------------------------------|--------|
//! | `GET`    | `/api/events`                 | user   |
//! | `POST`   | `/api/events`                 | admin  |
//! | `GET`    | `/api/events/{id}`            | user   |
//! | `PATCH`  | `/api/events/{id}`            | admin  |
//! | `DELETE` | `/api/events/{id}`            | admin  |
//! | `POST`   | `/api/events/{id}/interested` | any    |
//! | `POST`   | `/api/events/{id}/going`      | any    |

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::handlers::AppState;
use crate::middleware::auth::{AdminUser, CurrentUser, MaybeUser};
use crate::models::event::{CreateEventRequest, Event, UpdateEventRequest};
use crate::models::filter::{EventFilter, EventOrder, EventView, SearchScope};
use crate::store::CatalogStore;
use crate::utils::errors::UniEventError;
use crate::utils::logging::log_admin_action;

/// Map the UI's `"all"` sentinel to no filter.
pub(crate) fn sentinel(value: Option<String>) -> Option<String> {
    value.filter(|v| v != "all")
}

/// Query parameters for the student event list
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    pub category: Option<String>,
    pub organizer: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub show_past: Option<bool>,
}

impl ListParams {
    fn into_filter(self) -> EventFilter {
        EventFilter {
            search: self.search.filter(|s| !s.trim().is_empty()),
            scope: SearchScope::TitleDescription,
            category: sentinel(self.category),
            organizer: sentinel(self.organizer),
            status: None,
            from: self.from,
            to: self.to,
            // The list defaults to upcoming events; `show_past=true` flips
            // the partition to past ones.
            show_past: Some(self.show_past.unwrap_or(false)),
        }
    }
}

/// `GET /api/events`
pub async fn list<S>(
    State(state): State<AppState<S>>,
    CurrentUser(viewer): CurrentUser,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<EventView>>, UniEventError>
where
    S: CatalogStore + 'static,
{
    let views = state
        .catalog
        .event_views(
            &params.into_filter(),
            EventOrder::DateAscending,
            Some(&viewer),
        )
        .await?;
    Ok(Json(views))
}

/// `GET /api/events/{id}`
pub async fn get_one<S>(
    State(state): State<AppState<S>>,
    CurrentUser(viewer): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<EventView>, UniEventError>
where
    S: CatalogStore + 'static,
{
    let view = state.catalog.event_view(id, Some(&viewer)).await?;
    Ok(Json(view))
}

/// `POST /api/events`
pub async fn create<S>(
    State(state): State<AppState<S>>,
    AdminUser(admin): AdminUser,
    Json(draft): Json<CreateEventRequest>,
) -> Result<impl IntoResponse, UniEventError>
where
    S: CatalogStore + 'static,
{
    let event = state.catalog.create_event(draft).await?;
    log_admin_action(&admin.email, "create_event", &event.id.to_string());
    Ok((StatusCode::CREATED, Json(event)))
}

/// `PATCH /api/events/{id}`
pub async fn update<S>(
    State(state): State<AppState<S>>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(partial): Json<UpdateEventRequest>,
) -> Result<Json<Event>, UniEventError>
where
    S: CatalogStore + 'static,
{
    let event = state.catalog.update_event(id, partial).await?;
    log_admin_action(&admin.email, "update_event", &id.to_string());
    Ok(Json(event))
}

/// `DELETE /api/events/{id}`
pub async fn remove<S>(
    State(state): State<AppState<S>>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, UniEventError>
where
    S: CatalogStore + 'static,
{
    state.catalog.delete_event(id).await?;
    log_admin_action(&admin.email, "delete_event", &id.to_string());
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/events/{id}/interested`
///
/// Anonymous requests reach the façade, which answers `Unauthenticated`;
/// the route itself stays open so the client gets the domain error rather
/// than a transport-level rejection.
pub async fn toggle_interested<S>(
    State(state): State<AppState<S>>,
    MaybeUser(viewer): MaybeUser,
    Path(id): Path<Uuid>,
) -> Result<Json<EventView>, UniEventError>
where
    S: CatalogStore + 'static,
{
    let view = state.catalog.toggle_interested(id, viewer.as_ref()).await?;
    Ok(Json(view))
}

/// `POST /api/events/{id}/going`
pub async fn toggle_going<S>(
    State(state): State<AppState<S>>,
    MaybeUser(viewer): MaybeUser,
    Path(id): Path<Uuid>,
) -> Result<Json<EventView>, UniEventError>
where
    S: CatalogStore + 'static,
{
    let view = state.catalog.toggle_going(id, viewer.as_ref()).await?;
    Ok(Json(view))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_sentinel_clears_filters() {
        assert_eq!(sentinel(Some("all".to_string())), None);
        assert_eq!(
            sentinel(Some("Workshop".to_string())),
            Some("Workshop".to_string())
        );
        assert_eq!(sentinel(None), None);
    }

    #[test]
    fn test_list_params_default_to_upcoming() {
        let filter = ListParams::default().into_filter();
        assert_eq!(filter.show_past, Some(false));
        assert_eq!(filter.search, None);
    }

    #[test]
    fn test_blank_search_is_dropped() {
        let params = ListParams {
            search: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(params.into_filter().search, None);
    }
}
