//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod event;
pub mod filter;
pub mod participation;
pub mod taxonomy;
pub mod user;

// Re-export commonly used models
pub use event::{CreateEventRequest, Event, EventStatus, UpdateEventRequest};
pub use filter::{catalog_stats, sort_events, CatalogStats, EventFilter, EventOrder, EventView, SearchScope};
pub use participation::{Participation, ParticipationStatus, TogglePlan};
pub use taxonomy::{category_color, TaxonomyKind, TaxonomySet};
pub use user::{Profile, UserRole};
