//! Database service layer
//!
//! Bundles the per-table repositories into one Postgres-backed
//! implementation of the [`CatalogStore`] port.

use uuid::Uuid;

use crate::database::{DatabasePool, EventRepository, ProfileRepository, TaxonomyRepository};
use crate::models::event::Event;
use crate::models::participation::{Participation, TogglePlan};
use crate::models::taxonomy::{TaxonomyKind, TaxonomySet};
use crate::models::user::Profile;
use crate::store::{CatalogSnapshot, CatalogStore};
use crate::utils::errors::Result;

#[derive(Clone)]
pub struct DatabaseService {
    pub events: EventRepository,
    pub taxonomies: TaxonomyRepository,
    pub profiles: ProfileRepository,
    pool: DatabasePool,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            events: EventRepository::new(pool.clone()),
            taxonomies: TaxonomyRepository::new(pool.clone()),
            profiles: ProfileRepository::new(pool.clone()),
            pool,
        }
    }
}

impl CatalogStore for DatabaseService {
    async fn load_catalog(&self) -> Result<CatalogSnapshot> {
        let events = self.events.list_all().await?;
        let taxonomies = TaxonomySet {
            categories: self.taxonomies.list(TaxonomyKind::Category).await?,
            departments: self.taxonomies.list(TaxonomyKind::Department).await?,
            organizers: self.taxonomies.list(TaxonomyKind::Organizer).await?,
        };

        Ok(CatalogSnapshot { events, taxonomies })
    }

    async fn insert_event(&self, event: &Event) -> Result<()> {
        self.events.insert(event).await
    }

    async fn update_event(&self, event: &Event) -> Result<()> {
        self.events.update(event).await
    }

    async fn delete_event(&self, id: Uuid) -> Result<()> {
        self.events.delete(id).await
    }

    async fn participation(&self, event_id: Uuid, user_id: Uuid) -> Result<Option<Participation>> {
        self.events.find_participation(event_id, user_id).await
    }

    async fn participations_for_user(&self, user_id: Uuid) -> Result<Vec<Participation>> {
        self.events.participations_for_user(user_id).await
    }

    async fn apply_participation(
        &self,
        event_id: Uuid,
        user_id: Uuid,
        plan: TogglePlan,
    ) -> Result<Event> {
        self.events.apply_participation(event_id, user_id, plan).await
    }

    async fn insert_taxonomy(&self, kind: TaxonomyKind, name: &str) -> Result<()> {
        self.taxonomies.insert(kind, name).await
    }

    async fn delete_taxonomy(&self, kind: TaxonomyKind, name: &str) -> Result<()> {
        self.taxonomies.delete(kind, name).await
    }

    async fn find_profile(&self, user_id: Uuid) -> Result<Option<Profile>> {
        self.profiles.find_by_id(user_id).await
    }

    async fn upsert_profile(&self, profile: &Profile) -> Result<Profile> {
        self.profiles.upsert(profile).await
    }

    async fn promote_admins(&self, emails: &[String]) -> Result<u64> {
        self.profiles.promote_admins(emails).await
    }

    async fn health_check(&self) -> Result<()> {
        super::connection::health_check(&self.pool).await
    }
}
