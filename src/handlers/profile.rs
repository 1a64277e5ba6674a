//! Handlers for `/api/profile` endpoints

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::handlers::AppState;
use crate::middleware::auth::CurrentUser;
use crate::models::filter::EventView;
use crate::store::CatalogStore;
use crate::utils::errors::UniEventError;

/// The viewer's marked events, split by mark
#[derive(Debug, Serialize)]
pub struct MyEventsResponse {
    pub interested: Vec<EventView>,
    pub going: Vec<EventView>,
}

/// `GET /api/profile/events`
pub async fn my_events<S>(
    State(state): State<AppState<S>>,
    CurrentUser(viewer): CurrentUser,
) -> Result<Json<MyEventsResponse>, UniEventError>
where
    S: CatalogStore + 'static,
{
    let views = state.catalog.events_for_user(&viewer).await?;
    let (going, interested): (Vec<_>, Vec<_>) = views.into_iter().partition(|v| v.user_going);
    Ok(Json(MyEventsResponse { interested, going }))
}
