//! Authentication middleware
//!
//! Request extractors that resolve the Authorization header to a stored
//! profile. Handlers declare the access they need by the extractor they
//! take: `CurrentUser` for any signed-in user, `AdminUser` for admins,
//! `MaybeUser` where anonymous access is allowed.

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};
use tracing::warn;

use crate::handlers::AppState;
use crate::models::user::Profile;
use crate::store::CatalogStore;
use crate::utils::errors::UniEventError;

/// A signed-in user of any role
#[derive(Debug)]
pub struct CurrentUser(pub Profile);

/// A signed-in user holding the admin role
#[derive(Debug)]
pub struct AdminUser(pub Profile);

/// The viewer if the request carries a valid token, `None` when anonymous
#[derive(Debug)]
pub struct MaybeUser(pub Option<Profile>);

/// Pull the bearer token out of the Authorization header. A missing header
/// is not an error; a present header with the wrong scheme is.
fn bearer_token(parts: &Parts) -> Result<Option<&str>, UniEventError> {
    let Some(value) = parts.headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value
        .to_str()
        .map_err(|_| UniEventError::InvalidToken("header is not valid UTF-8".to_string()))?;
    let token = value
        .strip_prefix("Bearer ")
        .ok_or_else(|| UniEventError::InvalidToken("expected Bearer scheme".to_string()))?;
    Ok(Some(token))
}

impl<S> FromRequestParts<AppState<S>> for MaybeUser
where
    S: CatalogStore + 'static,
{
    type Rejection = UniEventError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<S>,
    ) -> Result<Self, Self::Rejection> {
        match bearer_token(parts)? {
            Some(token) => {
                let profile = state.auth.resolve_bearer(token).await?;
                Ok(MaybeUser(Some(profile)))
            }
            None => Ok(MaybeUser(None)),
        }
    }
}

impl<S> FromRequestParts<AppState<S>> for CurrentUser
where
    S: CatalogStore + 'static,
{
    type Rejection = UniEventError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<S>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?.ok_or(UniEventError::Unauthenticated)?;
        let profile = state.auth.resolve_bearer(token).await?;
        Ok(CurrentUser(profile))
    }
}

impl<S> FromRequestParts<AppState<S>> for AdminUser
where
    S: CatalogStore + 'static,
{
    type Rejection = UniEventError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<S>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?.ok_or(UniEventError::Unauthenticated)?;
        let profile = state.auth.resolve_bearer(token).await?;

        if !profile.is_admin() {
            warn!(user_id = %profile.user_id, "Unauthorized admin access attempt");
            return Err(UniEventError::PermissionDenied(
                "Admin privileges required".to_string(),
            ));
        }

        Ok(AdminUser(profile))
    }
}
