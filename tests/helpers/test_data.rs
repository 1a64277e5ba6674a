//! Test data helpers for creating catalog objects
//!
//! Builders produce events that pass validation against the seed taxonomy
//! lists, so tests only spell out the fields they are about.

use chrono::{Duration, NaiveDate, Utc};
use uuid::Uuid;

use unievent::models::event::{CreateEventRequest, Event, EventStatus};
use unievent::models::user::{Profile, UserRole};

/// An event on a fixed date with seed-taxonomy labels
pub fn event_on(date: NaiveDate, title: &str) -> Event {
    Event {
        id: Uuid::new_v4(),
        title: title.to_string(),
        description: format!("{title} description"),
        date,
        time: "10:00 AM".to_string(),
        category: "Workshop".to_string(),
        location: "Main Auditorium".to_string(),
        organizer: "AI Society".to_string(),
        department: None,
        image_url: None,
        status: EventStatus::Active,
        interested_count: 0,
        going_count: 0,
        created_at: Utc::now(),
    }
}

/// An event 30 days out, safely upcoming
pub fn upcoming_event(title: &str) -> Event {
    event_on(Utc::now().date_naive() + Duration::days(30), title)
}

/// An event 30 days gone, safely past
pub fn past_event(title: &str) -> Event {
    event_on(Utc::now().date_naive() - Duration::days(30), title)
}

/// A create-request draft with seed-taxonomy labels
pub fn draft(title: &str, date: NaiveDate) -> CreateEventRequest {
    CreateEventRequest {
        title: title.to_string(),
        description: format!("{title} description"),
        date,
        time: "2:00 PM".to_string(),
        category: "Workshop".to_string(),
        location: "Lab 3".to_string(),
        organizer: "AI Society".to_string(),
        department: None,
        image_url: None,
        status: EventStatus::Active,
    }
}

/// A draft dated 30 days out
pub fn upcoming_draft(title: &str) -> CreateEventRequest {
    draft(title, Utc::now().date_naive() + Duration::days(30))
}

pub fn student_profile() -> Profile {
    Profile {
        user_id: Uuid::new_v4(),
        name: "Casey Student".to_string(),
        email: "casey@student.university.edu".to_string(),
        role: UserRole::Student,
        created_at: Utc::now(),
    }
}

pub fn admin_profile() -> Profile {
    Profile {
        user_id: Uuid::new_v4(),
        name: "Admin User".to_string(),
        email: "admin@university.edu".to_string(),
        role: UserRole::Admin,
        created_at: Utc::now(),
    }
}
