//! Liveness endpoint

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::handlers::AppState;
use crate::store::CatalogStore;
use crate::utils::errors::UniEventError;

/// `GET /health`: verifies the store connection is alive
pub async fn health<S>(State(state): State<AppState<S>>) -> Result<Json<Value>, UniEventError>
where
    S: CatalogStore + 'static,
{
    state.catalog.health().await?;
    Ok(Json(json!({
        "status": "ok",
        "version": crate::VERSION,
    })))
}
