//! Participation model and toggle state machine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::utils::errors::{Result, UniEventError};

/// A user's mark on an event. One row per `(event_id, user_id)`; created on
/// first toggle, rewritten when switching, removed on un-mark.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Participation {
    pub event_id: Uuid,
    pub user_id: Uuid,
    #[sqlx(try_from = "String")]
    pub status: ParticipationStatus,
    pub marked_at: DateTime<Utc>,
}

/// The two mutually exclusive participation marks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipationStatus {
    Interested,
    Going,
}

impl ParticipationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParticipationStatus::Interested => "interested",
            ParticipationStatus::Going => "going",
        }
    }
}

impl std::fmt::Display for ParticipationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ParticipationStatus {
    type Err = UniEventError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "interested" => Ok(ParticipationStatus::Interested),
            "going" => Ok(ParticipationStatus::Going),
            other => Err(UniEventError::InvalidInput(format!(
                "Unknown participation status: {other}"
            ))),
        }
    }
}

impl TryFrom<String> for ParticipationStatus {
    type Error = UniEventError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// The outcome of a toggle: the user's next mark (`None` removes the row)
/// and the adjustments to the event's two counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TogglePlan {
    pub next: Option<ParticipationStatus>,
    pub interested_delta: i32,
    pub going_delta: i32,
}

/// Compute the transition for toggling `mark` from the state `current`.
///
/// Toggling the current mark removes it; toggling the other mark switches
/// to it, adjusting both counters in one step. Both backends apply the
/// returned plan atomically so the row and the counters never diverge.
pub fn plan(current: Option<ParticipationStatus>, mark: ParticipationStatus) -> TogglePlan {
    use ParticipationStatus::{Going, Interested};

    match (current, mark) {
        (None, Interested) => TogglePlan {
            next: Some(Interested),
            interested_delta: 1,
            going_delta: 0,
        },
        (None, Going) => TogglePlan {
            next: Some(Going),
            interested_delta: 0,
            going_delta: 1,
        },
        (Some(Interested), Interested) => TogglePlan {
            next: None,
            interested_delta: -1,
            going_delta: 0,
        },
        (Some(Interested), Going) => TogglePlan {
            next: Some(Going),
            interested_delta: -1,
            going_delta: 1,
        },
        (Some(Going), Going) => TogglePlan {
            next: None,
            interested_delta: 0,
            going_delta: -1,
        },
        (Some(Going), Interested) => TogglePlan {
            next: Some(Interested),
            interested_delta: 1,
            going_delta: -1,
        },
    }
}

/// Apply a counter delta with a floor of zero. Seed data may carry counts
/// that never had matching participation rows, so a decrement can meet a
/// zero counter; it must stick at zero rather than go negative.
pub fn apply_delta(count: i32, delta: i32) -> i32 {
    (count + delta).max(0)
}
