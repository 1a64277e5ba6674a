//! Services module
//!
//! This module contains business logic services

pub mod auth;
pub mod catalog;

// Re-export commonly used services
pub use auth::{AuthService, Claims};
pub use catalog::CatalogService;
