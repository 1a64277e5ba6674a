//! HTTP handlers module
//!
//! This module contains the axum handlers organized by surface:
//! - Event handlers for the student-facing list, detail and toggle routes
//! - Admin handlers for the management list and dashboard stats
//! - Taxonomy handlers for the shared name lists
//! - Profile handlers for the viewer's own marked events

pub mod admin;
pub mod events;
pub mod health;
pub mod profile;
pub mod taxonomies;

use std::sync::Arc;

use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::services::{AuthService, CatalogService};
use crate::store::CatalogStore;

/// Shared state threaded through all axum handlers
pub struct AppState<S> {
    pub catalog: Arc<CatalogService<S>>,
    pub auth: Arc<AuthService<S>>,
}

// Manual impl so `S` itself does not have to be `Clone`; the services are
// shared, never duplicated.
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            catalog: Arc::clone(&self.catalog),
            auth: Arc::clone(&self.auth),
        }
    }
}

/// Build the application router over any catalog store.
///
/// The returned `Router<()>` is fully materialized and can be served
/// directly or nested into a parent router.
pub fn router<S>(state: AppState<S>) -> Router
where
    S: CatalogStore + 'static,
{
    Router::new()
        .route("/health", get(health::health::<S>))
        // Events
        .route(
            "/api/events",
            get(events::list::<S>).post(events::create::<S>),
        )
        .route(
            "/api/events/{id}",
            get(events::get_one::<S>)
                .patch(events::update::<S>)
                .delete(events::remove::<S>),
        )
        .route(
            "/api/events/{id}/interested",
            post(events::toggle_interested::<S>),
        )
        .route("/api/events/{id}/going", post(events::toggle_going::<S>))
        // Admin
        .route("/api/admin/events", get(admin::list::<S>))
        .route("/api/admin/stats", get(admin::stats::<S>))
        // Taxonomies
        .route("/api/taxonomies", get(taxonomies::list::<S>))
        .route("/api/taxonomies/{kind}", post(taxonomies::add::<S>))
        .route(
            "/api/taxonomies/{kind}/{name}",
            delete(taxonomies::remove::<S>),
        )
        // Profile
        .route("/api/profile/events", get(profile::my_events::<S>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
