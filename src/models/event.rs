//! Event model

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::taxonomy::TaxonomyKind;
use crate::utils::errors::{Result, UniEventError};

/// A campus event as stored in the catalog.
///
/// `date` is a calendar date; `time` is display text and never parsed.
/// The participation counts are denormalized onto the row and maintained
/// by the store together with the participation records.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub time: String,
    pub category: String,
    pub location: String,
    pub organizer: String,
    pub department: Option<String>,
    pub image_url: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: EventStatus,
    pub interested_count: i32,
    pub going_count: i32,
    pub created_at: DateTime<Utc>,
}

impl Event {
    /// Whether the event lies in the past relative to `now`.
    ///
    /// The calendar date is promoted to midnight UTC and compared strictly,
    /// so an event becomes past the moment its day starts. Past events are
    /// read-only for participation.
    pub fn is_past(&self, now: DateTime<Utc>) -> bool {
        self.date.and_time(NaiveTime::MIN).and_utc() < now
    }

    /// Case-insensitive same-title, same-date comparison used for the
    /// duplicate check on create.
    pub fn collides_with(&self, title: &str, date: NaiveDate) -> bool {
        self.date == date && self.title.to_lowercase() == title.to_lowercase()
    }

    /// Whether the event labels itself with `name` for the given taxonomy
    /// kind. Drives the in-use guard on taxonomy deletion.
    pub fn references(&self, kind: TaxonomyKind, name: &str) -> bool {
        match kind {
            TaxonomyKind::Category => self.category == name,
            TaxonomyKind::Department => self.department.as_deref() == Some(name),
            TaxonomyKind::Organizer => self.organizer == name,
        }
    }
}

/// Lifecycle label shown on event cards and filterable in the admin list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Active,
    Upcoming,
    Closed,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Active => "active",
            EventStatus::Upcoming => "upcoming",
            EventStatus::Closed => "closed",
        }
    }
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EventStatus {
    type Err = UniEventError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "active" => Ok(EventStatus::Active),
            "upcoming" => Ok(EventStatus::Upcoming),
            "closed" => Ok(EventStatus::Closed),
            other => Err(UniEventError::InvalidInput(format!(
                "Unknown event status: {other}"
            ))),
        }
    }
}

impl TryFrom<String> for EventStatus {
    type Error = UniEventError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// Draft for a new event, as submitted by the admin form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub time: String,
    pub category: String,
    pub location: String,
    pub organizer: String,
    pub department: Option<String>,
    pub image_url: Option<String>,
    #[serde(default = "default_status")]
    pub status: EventStatus,
}

fn default_status() -> EventStatus {
    EventStatus::Active
}

/// Partial update for an existing event; absent fields keep their value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub organizer: Option<String>,
    pub department: Option<String>,
    pub image_url: Option<String>,
    pub status: Option<EventStatus>,
}

impl UpdateEventRequest {
    /// Merge the provided fields into `event`, leaving the rest untouched.
    /// Identity, counts and creation time are never updatable.
    pub fn apply_to(&self, event: &mut Event) {
        if let Some(title) = &self.title {
            event.title = title.clone();
        }
        if let Some(description) = &self.description {
            event.description = description.clone();
        }
        if let Some(date) = self.date {
            event.date = date;
        }
        if let Some(time) = &self.time {
            event.time = time.clone();
        }
        if let Some(category) = &self.category {
            event.category = category.clone();
        }
        if let Some(location) = &self.location {
            event.location = location.clone();
        }
        if let Some(organizer) = &self.organizer {
            event.organizer = organizer.clone();
        }
        if let Some(department) = &self.department {
            event.department = Some(department.clone());
        }
        if let Some(image_url) = &self.image_url {
            event.image_url = Some(image_url.clone());
        }
        if let Some(status) = self.status {
            event.status = status;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.date.is_none()
            && self.time.is_none()
            && self.category.is_none()
            && self.location.is_none()
            && self.organizer.is_none()
            && self.image_url.is_none()
            && self.department.is_none()
            && self.status.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_event(date: NaiveDate) -> Event {
        Event {
            id: Uuid::new_v4(),
            title: "AI Workshop".to_string(),
            description: "Hands-on introduction".to_string(),
            date,
            time: "10:00 AM".to_string(),
            category: "Workshop".to_string(),
            location: "Main Auditorium".to_string(),
            organizer: "Tech Club".to_string(),
            department: None,
            image_url: None,
            status: EventStatus::Active,
            interested_count: 0,
            going_count: 0,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_is_past_boundary() {
        let event = sample_event(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());

        let before = Utc.with_ymd_and_hms(2025, 2, 28, 23, 59, 59).unwrap();
        assert!(!event.is_past(before));

        // Exactly midnight on the event day is not yet past.
        let midnight = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        assert!(!event.is_past(midnight));

        let after = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 1).unwrap();
        assert!(event.is_past(after));
    }

    #[test]
    fn test_collision_is_case_insensitive() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let event = sample_event(date);

        assert!(event.collides_with("ai workshop", date));
        assert!(event.collides_with("AI WORKSHOP", date));
        assert!(!event.collides_with("ai workshop", date.succ_opt().unwrap()));
        assert!(!event.collides_with("Robotics Workshop", date));
    }

    #[test]
    fn test_partial_update_merges_only_provided_fields() {
        let mut event = sample_event(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        let original_created_at = event.created_at;

        let update = UpdateEventRequest {
            title: Some("AI Workshop 2.0".to_string()),
            location: Some("Lab 3".to_string()),
            ..Default::default()
        };
        update.apply_to(&mut event);

        assert_eq!(event.title, "AI Workshop 2.0");
        assert_eq!(event.location, "Lab 3");
        assert_eq!(event.description, "Hands-on introduction");
        assert_eq!(event.category, "Workshop");
        assert_eq!(event.created_at, original_created_at);
    }

    #[test]
    fn test_status_round_trip() {
        for status in [EventStatus::Active, EventStatus::Upcoming, EventStatus::Closed] {
            let parsed: EventStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, status);
        }
        assert!("archived".parse::<EventStatus>().is_err());
    }

    #[test]
    fn test_taxonomy_references() {
        let mut event = sample_event(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        event.department = Some("FSD Business School".to_string());

        assert!(event.references(TaxonomyKind::Category, "Workshop"));
        assert!(!event.references(TaxonomyKind::Category, "Seminar"));
        assert!(event.references(TaxonomyKind::Organizer, "Tech Club"));
        assert!(event.references(TaxonomyKind::Department, "FSD Business School"));

        event.department = None;
        assert!(!event.references(TaxonomyKind::Department, "FSD Business School"));
    }
}
