//! Handlers for `/api/taxonomies` endpoints
//!
//! | Method   | Path                            | Access |
//! |----------|---------------------------------|--------|
//! | `GET`    | `/api/taxonomies`               | user   |
//! | `POST`   | `/api/taxonomies/{kind}`        | admin  |
//! | `DELETE` | `/api/taxonomies/{kind}/{name}` | admin  |
//!
//! `{kind}` accepts the singular and plural forms (`category`,
//! `categories`, ...).

use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::handlers::AppState;
use crate::middleware::auth::{AdminUser, CurrentUser};
use crate::models::taxonomy::{category_color, TaxonomyKind};
use crate::store::CatalogStore;
use crate::utils::errors::UniEventError;
use crate::utils::logging::log_admin_action;

/// The three name lists plus the badge color for each known category
#[derive(Debug, Serialize)]
pub struct TaxonomyResponse {
    pub categories: Vec<String>,
    pub departments: Vec<String>,
    pub organizers: Vec<String>,
    pub category_colors: BTreeMap<String, &'static str>,
}

#[derive(Debug, Deserialize)]
pub struct AddTaxonomyBody {
    pub name: String,
}

/// `GET /api/taxonomies`
pub async fn list<S>(
    State(state): State<AppState<S>>,
    CurrentUser(_viewer): CurrentUser,
) -> Result<Json<TaxonomyResponse>, UniEventError>
where
    S: CatalogStore + 'static,
{
    let set = state.catalog.taxonomies().await;
    let category_colors = set
        .categories
        .iter()
        .map(|name| (name.clone(), category_color(name)))
        .collect();

    Ok(Json(TaxonomyResponse {
        categories: set.categories,
        departments: set.departments,
        organizers: set.organizers,
        category_colors,
    }))
}

/// `POST /api/taxonomies/{kind}`, body `{"name":"Hackathon"}`
pub async fn add<S>(
    State(state): State<AppState<S>>,
    AdminUser(admin): AdminUser,
    Path(kind): Path<String>,
    Json(body): Json<AddTaxonomyBody>,
) -> Result<impl IntoResponse, UniEventError>
where
    S: CatalogStore + 'static,
{
    let kind: TaxonomyKind = kind.parse()?;
    let name = state.catalog.add_taxonomy(kind, &body.name).await?;
    log_admin_action(&admin.email, "add_taxonomy", &format!("{kind}:{name}"));
    Ok((StatusCode::CREATED, Json(json!({ "kind": kind, "name": name }))))
}

/// `DELETE /api/taxonomies/{kind}/{name}`
pub async fn remove<S>(
    State(state): State<AppState<S>>,
    AdminUser(admin): AdminUser,
    Path((kind, name)): Path<(String, String)>,
) -> Result<StatusCode, UniEventError>
where
    S: CatalogStore + 'static,
{
    let kind: TaxonomyKind = kind.parse()?;
    state.catalog.delete_taxonomy(kind, &name).await?;
    log_admin_action(&admin.email, "delete_taxonomy", &format!("{kind}:{name}"));
    Ok(StatusCode::NO_CONTENT)
}
