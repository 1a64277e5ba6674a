//! UniEvent backend
//!
//! A campus events discovery and RSVP service. This library provides the
//! event catalog with its session cache, exclusive participation toggles,
//! admin-managed taxonomies, token-based authentication and a JSON HTTP
//! API, all generic over the backing catalog store.

pub mod config;
pub mod database;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod store;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{Result, UniEventError};

// Re-export main components for easy access
pub use database::DatabaseService;
pub use handlers::{router, AppState};
pub use services::{AuthService, CatalogService};
pub use store::{CatalogStore, MemoryCatalogStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
