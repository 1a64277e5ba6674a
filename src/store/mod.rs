//! Persisted-store port
//!
//! The catalog façade talks to persistence through the [`CatalogStore`]
//! trait instead of owning a concrete backend. Two implementations exist:
//! [`MemoryCatalogStore`] (the mock-data prototype, also the test double)
//! and `DatabaseService` in `crate::database` (Postgres).

use std::future::Future;

use uuid::Uuid;

use crate::models::event::Event;
use crate::models::participation::{Participation, TogglePlan};
use crate::models::taxonomy::{TaxonomyKind, TaxonomySet};
use crate::models::user::Profile;
use crate::utils::errors::Result;

pub mod memory;

pub use memory::MemoryCatalogStore;

/// Everything the façade caches for a session, read in one pass at startup
/// and on `refresh`.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    pub events: Vec<Event>,
    pub taxonomies: TaxonomySet,
}

/// Abstraction over the catalog's persistence backend.
///
/// Single-row writes are atomic; [`CatalogStore::apply_participation`] is the
/// one composed write (participation row + event counters) and must apply
/// both or neither. All methods return `Send` futures so the trait works
/// inside the axum/tokio stack.
pub trait CatalogStore: Send + Sync {
    /// Read the full catalog: events plus the three taxonomy lists.
    fn load_catalog(&self) -> impl Future<Output = Result<CatalogSnapshot>> + Send + '_;

    // ── Events ────────────────────────────────────────────────────────────

    fn insert_event<'a>(
        &'a self,
        event: &'a Event,
    ) -> impl Future<Output = Result<()>> + Send + 'a;

    /// Persist the full row for an already-merged event.
    fn update_event<'a>(
        &'a self,
        event: &'a Event,
    ) -> impl Future<Output = Result<()>> + Send + 'a;

    fn delete_event(&self, id: Uuid) -> impl Future<Output = Result<()>> + Send + '_;

    // ── Participations ────────────────────────────────────────────────────

    /// The viewer's current mark on an event, if any.
    fn participation(
        &self,
        event_id: Uuid,
        user_id: Uuid,
    ) -> impl Future<Output = Result<Option<Participation>>> + Send + '_;

    /// All marks a user holds, for the profile view.
    fn participations_for_user(
        &self,
        user_id: Uuid,
    ) -> impl Future<Output = Result<Vec<Participation>>> + Send + '_;

    /// Apply a toggle plan atomically: rewrite or remove the participation
    /// row and adjust the event counters (floored at zero) in one unit.
    /// Returns the updated event row.
    fn apply_participation(
        &self,
        event_id: Uuid,
        user_id: Uuid,
        plan: TogglePlan,
    ) -> impl Future<Output = Result<Event>> + Send + '_;

    // ── Taxonomies ────────────────────────────────────────────────────────

    fn insert_taxonomy<'a>(
        &'a self,
        kind: TaxonomyKind,
        name: &'a str,
    ) -> impl Future<Output = Result<()>> + Send + 'a;

    fn delete_taxonomy<'a>(
        &'a self,
        kind: TaxonomyKind,
        name: &'a str,
    ) -> impl Future<Output = Result<()>> + Send + 'a;

    // ── Profiles ──────────────────────────────────────────────────────────

    fn find_profile(
        &self,
        user_id: Uuid,
    ) -> impl Future<Output = Result<Option<Profile>>> + Send + '_;

    /// Insert or rewrite a profile row, returning the stored version.
    fn upsert_profile<'a>(
        &'a self,
        profile: &'a Profile,
    ) -> impl Future<Output = Result<Profile>> + Send + 'a;

    /// Promote every profile whose email is in `emails` to the admin role.
    /// Returns how many rows changed.
    fn promote_admins<'a>(
        &'a self,
        emails: &'a [String],
    ) -> impl Future<Output = Result<u64>> + Send + 'a;

    // ── Health ────────────────────────────────────────────────────────────

    fn health_check(&self) -> impl Future<Output = Result<()>> + Send + '_;
}
