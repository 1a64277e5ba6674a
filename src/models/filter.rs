//! Event filtering, ordering and derived view assembly
//!
//! Pure functions over the cached event list; no I/O. The two list views
//! share one filter shape: the student view partitions past/upcoming and
//! searches title/description, the admin view skips the partition and
//! searches title/organizer.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::event::{Event, EventStatus};
use crate::models::participation::ParticipationStatus;
use crate::models::taxonomy::category_color;

/// Which text fields a search query runs over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchScope {
    /// Title or description
    #[default]
    TitleDescription,
    /// Title or organizer
    TitleOrganizer,
}

/// Conjunction of independent predicates over the event list. Absent fields
/// do not constrain; the HTTP layer maps the client's `"all"` sentinel to
/// `None` before the filter is built.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    pub search: Option<String>,
    pub scope: SearchScope,
    pub category: Option<String>,
    pub organizer: Option<String>,
    pub status: Option<EventStatus>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    /// `Some(false)` keeps only upcoming events, `Some(true)` only past
    /// ones, `None` skips the partition.
    pub show_past: Option<bool>,
}

impl EventFilter {
    pub fn matches(&self, event: &Event, now: DateTime<Utc>) -> bool {
        if let Some(query) = &self.search {
            let query = query.to_lowercase();
            let title_hit = event.title.to_lowercase().contains(&query);
            let hit = match self.scope {
                SearchScope::TitleDescription => {
                    title_hit || event.description.to_lowercase().contains(&query)
                }
                SearchScope::TitleOrganizer => {
                    title_hit || event.organizer.to_lowercase().contains(&query)
                }
            };
            if !hit {
                return false;
            }
        }

        if let Some(category) = &self.category {
            if &event.category != category {
                return false;
            }
        }

        if let Some(organizer) = &self.organizer {
            if &event.organizer != organizer {
                return false;
            }
        }

        if let Some(status) = self.status {
            if event.status != status {
                return false;
            }
        }

        // Date bounds are inclusive on both ends.
        if let Some(from) = self.from {
            if event.date < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if event.date > to {
                return false;
            }
        }

        if let Some(past) = self.show_past {
            if event.is_past(now) != past {
                return false;
            }
        }

        true
    }
}

/// Result orderings offered by the list views
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOrder {
    /// Upcoming-events view: soonest first
    DateAscending,
    /// Admin view: most recently created first
    CreatedDescending,
}

/// Sort events in place. The id breaks ties so equal keys order
/// deterministically.
pub fn sort_events(events: &mut [Event], order: EventOrder) {
    match order {
        EventOrder::DateAscending => {
            events.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
        }
        EventOrder::CreatedDescending => {
            events.sort_by(|a, b| {
                b.created_at
                    .cmp(&a.created_at)
                    .then_with(|| a.id.cmp(&b.id))
            });
        }
    }
}

/// An event as presented to a viewer: the record plus derived state
#[derive(Debug, Clone, Serialize)]
pub struct EventView {
    #[serde(flatten)]
    pub event: Event,
    pub is_past: bool,
    pub category_color: &'static str,
    pub user_interested: bool,
    pub user_going: bool,
}

impl EventView {
    pub fn assemble(
        event: Event,
        participation: Option<ParticipationStatus>,
        now: DateTime<Utc>,
    ) -> Self {
        let is_past = event.is_past(now);
        let color = category_color(&event.category);
        Self {
            is_past,
            category_color: color,
            user_interested: participation == Some(ParticipationStatus::Interested),
            user_going: participation == Some(ParticipationStatus::Going),
            event,
        }
    }
}

/// Admin dashboard numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogStats {
    pub total_events: usize,
    pub active_events: usize,
    pub total_interested: i64,
    pub total_going: i64,
}

/// Compute dashboard stats over the full event list. An event counts as
/// active when its status is `active` and it has not passed.
pub fn catalog_stats(events: &[Event], now: DateTime<Utc>) -> CatalogStats {
    CatalogStats {
        total_events: events.len(),
        active_events: events
            .iter()
            .filter(|e| e.status == EventStatus::Active && !e.is_past(now))
            .count(),
        total_interested: events.iter().map(|e| i64::from(e.interested_count)).sum(),
        total_going: events.iter().map(|e| i64::from(e.going_count)).sum(),
    }
}
