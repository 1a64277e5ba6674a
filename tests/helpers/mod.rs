//! Test helpers module
//!
//! This module provides utilities and helpers for testing the UniEvent
//! application: state builders over the in-memory store, token minting,
//! and a write-failure-injecting store wrapper.

pub mod test_data;

pub use test_data::*;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use uuid::Uuid;

use unievent::config::AuthConfig;
use unievent::models::event::Event;
use unievent::models::participation::{Participation, TogglePlan};
use unievent::models::taxonomy::TaxonomyKind;
use unievent::models::user::Profile;
use unievent::services::auth::Claims;
use unievent::services::{AuthService, CatalogService};
use unievent::store::{CatalogSnapshot, CatalogStore, MemoryCatalogStore};
use unievent::utils::errors::{Result, UniEventError};
use unievent::AppState;

/// Secret shared between the minted test tokens and the test AuthService
pub const TEST_JWT_SECRET: &str = "0123456789abcdef0123456789abcdef";

pub const ADMIN_EMAIL: &str = "admin@university.edu";
pub const STUDENT_EMAIL: &str = "casey@student.university.edu";

/// Auth settings the test state is built with
pub fn test_auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: TEST_JWT_SECRET.to_string(),
        admin_emails: vec![ADMIN_EMAIL.to_string()],
        student_email_domain: "@student.university.edu".to_string(),
    }
}

/// Mint a signed token for an arbitrary subject
pub fn mint_token(sub: Uuid, email: &str, name: &str) -> String {
    let claims = Claims {
        sub,
        email: email.to_string(),
        name: name.to_string(),
        exp: (Utc::now().timestamp() + 3600) as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .expect("test token encodes")
}

pub fn admin_token() -> String {
    mint_token(Uuid::new_v4(), ADMIN_EMAIL, "Admin User")
}

pub fn student_token() -> String {
    mint_token(Uuid::new_v4(), STUDENT_EMAIL, "Casey Student")
}

/// Application state over a fresh in-memory store
pub async fn build_state() -> AppState<MemoryCatalogStore> {
    build_state_with_events(Vec::new()).await
}

/// Application state over an in-memory store seeded with `events`
pub async fn build_state_with_events(events: Vec<Event>) -> AppState<MemoryCatalogStore> {
    state_over(Arc::new(MemoryCatalogStore::with_events(events))).await
}

/// Application state over any prepared store
pub async fn state_over<S: CatalogStore + 'static>(store: Arc<S>) -> AppState<S> {
    AppState {
        catalog: Arc::new(
            CatalogService::load(Arc::clone(&store))
                .await
                .expect("catalog loads"),
        ),
        auth: Arc::new(AuthService::new(store, &test_auth_config())),
    }
}

/// Store wrapper that can be switched to fail every write with a
/// persistence-class error while reads keep working. Used to verify that
/// failed writes leave the catalog cache untouched.
pub struct FailingStore {
    inner: MemoryCatalogStore,
    fail_writes: AtomicBool,
}

impl FailingStore {
    pub fn with_events(events: Vec<Event>) -> Self {
        Self {
            inner: MemoryCatalogStore::with_events(events),
            fail_writes: AtomicBool::new(false),
        }
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_write(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(UniEventError::Database(sqlx::Error::PoolClosed))
        } else {
            Ok(())
        }
    }
}

impl CatalogStore for FailingStore {
    async fn load_catalog(&self) -> Result<CatalogSnapshot> {
        self.inner.load_catalog().await
    }

    async fn insert_event(&self, event: &Event) -> Result<()> {
        self.check_write()?;
        self.inner.insert_event(event).await
    }

    async fn update_event(&self, event: &Event) -> Result<()> {
        self.check_write()?;
        self.inner.update_event(event).await
    }

    async fn delete_event(&self, id: Uuid) -> Result<()> {
        self.check_write()?;
        self.inner.delete_event(id).await
    }

    async fn participation(&self, event_id: Uuid, user_id: Uuid) -> Result<Option<Participation>> {
        self.inner.participation(event_id, user_id).await
    }

    async fn participations_for_user(&self, user_id: Uuid) -> Result<Vec<Participation>> {
        self.inner.participations_for_user(user_id).await
    }

    async fn apply_participation(
        &self,
        event_id: Uuid,
        user_id: Uuid,
        plan: TogglePlan,
    ) -> Result<Event> {
        self.check_write()?;
        self.inner.apply_participation(event_id, user_id, plan).await
    }

    async fn insert_taxonomy(&self, kind: TaxonomyKind, name: &str) -> Result<()> {
        self.check_write()?;
        self.inner.insert_taxonomy(kind, name).await
    }

    async fn delete_taxonomy(&self, kind: TaxonomyKind, name: &str) -> Result<()> {
        self.check_write()?;
        self.inner.delete_taxonomy(kind, name).await
    }

    async fn find_profile(&self, user_id: Uuid) -> Result<Option<Profile>> {
        self.inner.find_profile(user_id).await
    }

    async fn upsert_profile(&self, profile: &Profile) -> Result<Profile> {
        self.inner.upsert_profile(profile).await
    }

    async fn promote_admins(&self, emails: &[String]) -> Result<u64> {
        self.check_write()?;
        self.inner.promote_admins(emails).await
    }

    async fn health_check(&self) -> Result<()> {
        self.inner.health_check().await
    }
}
