//! Database repositories module
//!
//! This module contains all repository implementations for data access

pub mod event;
pub mod profile;
pub mod taxonomy;

// Re-export repositories
pub use event::EventRepository;
pub use profile::ProfileRepository;
pub use taxonomy::TaxonomyRepository;
