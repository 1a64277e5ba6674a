//! Error handling for UniEvent
//!
//! This module defines the main error type used throughout the application
//! and its mapping onto HTTP responses. Caller logic errors (duplicates,
//! in-use taxonomies, past events, missing authentication) are reported and
//! never retried; persistence failures are surfaced distinctly so callers
//! can tell the two classes apart.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::NaiveDate;
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use crate::models::taxonomy::TaxonomyKind;

/// Main error type for the UniEvent application
#[derive(Error, Debug)]
pub enum UniEventError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Event not found: {event_id}")]
    EventNotFound { event_id: Uuid },

    #[error("No {kind} named \"{name}\"")]
    TaxonomyNotFound { kind: TaxonomyKind, name: String },

    #[error("An event titled \"{title}\" already exists on {date}")]
    DuplicateEvent { title: String, date: NaiveDate },

    #[error("{kind} \"{name}\" already exists")]
    DuplicateName { kind: TaxonomyKind, name: String },

    #[error("Cannot delete {kind} \"{name}\": {count} event(s) are using it")]
    TaxonomyInUse {
        kind: TaxonomyKind,
        name: String,
        count: usize,
    },

    #[error("Event {event_id} has already passed")]
    PastEvent { event_id: Uuid },

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Invalid session token: {0}")]
    InvalidToken(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for UniEvent operations
pub type Result<T> = std::result::Result<T, UniEventError>;

impl UniEventError {
    /// Check whether the error comes from the persistence layer rather than
    /// from caller input. Persistence failures must leave the in-memory
    /// catalog untouched; input errors never reach the store at all.
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            UniEventError::Database(_) | UniEventError::Migration(_)
        )
    }

    /// HTTP status the error maps to
    pub fn status_code(&self) -> StatusCode {
        match self {
            UniEventError::EventNotFound { .. } | UniEventError::TaxonomyNotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            UniEventError::DuplicateEvent { .. }
            | UniEventError::DuplicateName { .. }
            | UniEventError::TaxonomyInUse { .. }
            | UniEventError::PastEvent { .. } => StatusCode::CONFLICT,
            UniEventError::Unauthenticated | UniEventError::InvalidToken(_) => {
                StatusCode::UNAUTHORIZED
            }
            UniEventError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            UniEventError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            UniEventError::Database(_)
            | UniEventError::Migration(_)
            | UniEventError::Config(_)
            | UniEventError::Serialization(_)
            | UniEventError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for UniEventError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Internal failures are logged in full but reported generically;
        // everything else carries its own user-facing message.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "Internal error while handling request");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let err = UniEventError::EventNotFound {
            event_id: Uuid::nil(),
        };
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

        let err = UniEventError::DuplicateEvent {
            title: "Hackathon".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
        };
        assert_eq!(err.status_code(), StatusCode::CONFLICT);

        assert_eq!(
            UniEventError::Unauthenticated.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            UniEventError::PermissionDenied("admin only".to_string()).status_code(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_in_use_message_reports_count() {
        let err = UniEventError::TaxonomyInUse {
            kind: TaxonomyKind::Category,
            name: "Workshop".to_string(),
            count: 1,
        };
        assert_eq!(
            err.to_string(),
            "Cannot delete category \"Workshop\": 1 event(s) are using it"
        );
    }

    #[test]
    fn test_persistence_classification() {
        assert!(UniEventError::Database(sqlx::Error::RowNotFound).is_persistence());
        assert!(!UniEventError::Unauthenticated.is_persistence());
        assert!(!UniEventError::InvalidInput("empty title".to_string()).is_persistence());
    }
}
