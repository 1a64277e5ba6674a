//! In-memory catalog store
//!
//! The array-backed backend from the prototype revision. It keeps the whole
//! catalog behind one lock and applies toggle plans in a single critical
//! section, which makes it the reference implementation of the store
//! contract and the backend integration tests run against.

use std::collections::HashMap;
use std::sync::RwLock;

use uuid::Uuid;

use crate::models::event::Event;
use crate::models::participation::{apply_delta, Participation, TogglePlan};
use crate::models::taxonomy::{TaxonomyKind, TaxonomySet};
use crate::models::user::Profile;
use crate::store::{CatalogSnapshot, CatalogStore};
use crate::utils::errors::{Result, UniEventError};

/// Catalog store backed by in-process collections.
///
/// Starts with the seed taxonomy lists and no events, mirroring a fresh
/// database after migrations.
pub struct MemoryCatalogStore {
    inner: RwLock<Inner>,
}

struct Inner {
    events: Vec<Event>,
    taxonomies: TaxonomySet,
    participations: HashMap<(Uuid, Uuid), Participation>,
    profiles: HashMap<Uuid, Profile>,
}

impl MemoryCatalogStore {
    pub fn new() -> Self {
        Self::with_events(Vec::new())
    }

    /// Start from a prepared event list. Newest-first order is preserved
    /// as given.
    pub fn with_events(events: Vec<Event>) -> Self {
        Self {
            inner: RwLock::new(Inner {
                events,
                taxonomies: TaxonomySet::seed(),
                participations: HashMap::new(),
                profiles: HashMap::new(),
            }),
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for MemoryCatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogStore for MemoryCatalogStore {
    async fn load_catalog(&self) -> Result<CatalogSnapshot> {
        let inner = self.read();
        Ok(CatalogSnapshot {
            events: inner.events.clone(),
            taxonomies: inner.taxonomies.clone(),
        })
    }

    async fn insert_event(&self, event: &Event) -> Result<()> {
        self.write().events.insert(0, event.clone());
        Ok(())
    }

    async fn update_event(&self, event: &Event) -> Result<()> {
        let mut inner = self.write();
        match inner.events.iter_mut().find(|e| e.id == event.id) {
            Some(slot) => {
                *slot = event.clone();
                Ok(())
            }
            None => Err(UniEventError::EventNotFound { event_id: event.id }),
        }
    }

    async fn delete_event(&self, id: Uuid) -> Result<()> {
        let mut inner = self.write();
        inner.events.retain(|e| e.id != id);
        inner.participations.retain(|(event_id, _), _| *event_id != id);
        Ok(())
    }

    async fn participation(&self, event_id: Uuid, user_id: Uuid) -> Result<Option<Participation>> {
        Ok(self.read().participations.get(&(event_id, user_id)).cloned())
    }

    async fn participations_for_user(&self, user_id: Uuid) -> Result<Vec<Participation>> {
        Ok(self
            .read()
            .participations
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn apply_participation(
        &self,
        event_id: Uuid,
        user_id: Uuid,
        plan: TogglePlan,
    ) -> Result<Event> {
        let mut inner = self.write();

        // Row and counters change under the same lock, nothing can observe
        // one without the other.
        let event = inner
            .events
            .iter_mut()
            .find(|e| e.id == event_id)
            .ok_or(UniEventError::EventNotFound { event_id })?;
        event.interested_count = apply_delta(event.interested_count, plan.interested_delta);
        event.going_count = apply_delta(event.going_count, plan.going_delta);
        let updated = event.clone();

        match plan.next {
            Some(status) => {
                inner.participations.insert(
                    (event_id, user_id),
                    Participation {
                        event_id,
                        user_id,
                        status,
                        marked_at: chrono::Utc::now(),
                    },
                );
            }
            None => {
                inner.participations.remove(&(event_id, user_id));
            }
        }

        Ok(updated)
    }

    async fn insert_taxonomy(&self, kind: TaxonomyKind, name: &str) -> Result<()> {
        self.write().taxonomies.list_mut(kind).push(name.to_string());
        Ok(())
    }

    async fn delete_taxonomy(&self, kind: TaxonomyKind, name: &str) -> Result<()> {
        self.write().taxonomies.list_mut(kind).retain(|n| n != name);
        Ok(())
    }

    async fn find_profile(&self, user_id: Uuid) -> Result<Option<Profile>> {
        Ok(self.read().profiles.get(&user_id).cloned())
    }

    async fn upsert_profile(&self, profile: &Profile) -> Result<Profile> {
        self.write()
            .profiles
            .insert(profile.user_id, profile.clone());
        Ok(profile.clone())
    }

    async fn promote_admins(&self, emails: &[String]) -> Result<u64> {
        let mut inner = self.write();
        let mut promoted = 0;
        for profile in inner.profiles.values_mut() {
            if profile.role != crate::models::user::UserRole::Admin
                && emails.iter().any(|e| e == &profile.email)
            {
                profile.role = crate::models::user::UserRole::Admin;
                promoted += 1;
            }
        }
        Ok(promoted)
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::event::EventStatus;
    use crate::models::participation::{plan, ParticipationStatus};
    use chrono::{NaiveDate, Utc};

    fn sample_event() -> Event {
        Event {
            id: Uuid::new_v4(),
            title: "Career Fair".to_string(),
            description: "Meet recruiters".to_string(),
            date: NaiveDate::from_ymd_opt(2030, 5, 20).unwrap(),
            time: "9:00 AM".to_string(),
            category: "Career".to_string(),
            location: "Expo Center".to_string(),
            organizer: "Career Services".to_string(),
            department: None,
            image_url: None,
            status: EventStatus::Active,
            interested_count: 0,
            going_count: 0,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_apply_participation_keeps_row_and_counts_together() {
        let event = sample_event();
        let event_id = event.id;
        let user_id = Uuid::new_v4();
        let store = MemoryCatalogStore::with_events(vec![event]);

        let toggle = plan(None, ParticipationStatus::Interested);
        let updated = store
            .apply_participation(event_id, user_id, toggle)
            .await
            .unwrap();
        assert_eq!(updated.interested_count, 1);

        let row = store.participation(event_id, user_id).await.unwrap();
        assert_eq!(row.unwrap().status, ParticipationStatus::Interested);

        // Unmark removes the row again.
        let toggle = plan(
            Some(ParticipationStatus::Interested),
            ParticipationStatus::Interested,
        );
        let updated = store
            .apply_participation(event_id, user_id, toggle)
            .await
            .unwrap();
        assert_eq!(updated.interested_count, 0);
        assert!(store
            .participation(event_id, user_id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_counts_floor_at_zero_even_with_seeded_counts() {
        let mut event = sample_event();
        event.going_count = 0;
        let event_id = event.id;
        let store = MemoryCatalogStore::with_events(vec![event]);

        // A raw decrement against a zero counter sticks at zero.
        let updated = store
            .apply_participation(
                event_id,
                Uuid::new_v4(),
                TogglePlan {
                    next: None,
                    interested_delta: 0,
                    going_delta: -1,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.going_count, 0);
    }

    #[tokio::test]
    async fn test_delete_event_drops_its_participations() {
        let event = sample_event();
        let event_id = event.id;
        let user_id = Uuid::new_v4();
        let store = MemoryCatalogStore::with_events(vec![event]);

        store
            .apply_participation(event_id, user_id, plan(None, ParticipationStatus::Going))
            .await
            .unwrap();
        store.delete_event(event_id).await.unwrap();

        assert!(store
            .participation(event_id, user_id)
            .await
            .unwrap()
            .is_none());
        assert!(store.load_catalog().await.unwrap().events.is_empty());
    }

    #[tokio::test]
    async fn test_promote_admins_touches_only_listed_students() {
        let store = MemoryCatalogStore::new();
        let student = Profile {
            user_id: Uuid::new_v4(),
            name: "Ayesha".to_string(),
            email: "ayesha@student.university.edu".to_string(),
            role: crate::models::user::UserRole::Student,
            created_at: Utc::now(),
        };
        let listed = Profile {
            user_id: Uuid::new_v4(),
            name: "Talha".to_string(),
            email: "talha@university.edu".to_string(),
            role: crate::models::user::UserRole::Student,
            created_at: Utc::now(),
        };
        store.upsert_profile(&student).await.unwrap();
        store.upsert_profile(&listed).await.unwrap();

        let promoted = store
            .promote_admins(&["talha@university.edu".to_string()])
            .await
            .unwrap();
        assert_eq!(promoted, 1);

        let reloaded = store.find_profile(listed.user_id).await.unwrap().unwrap();
        assert!(reloaded.is_admin());
        let untouched = store.find_profile(student.user_id).await.unwrap().unwrap();
        assert!(!untouched.is_admin());
    }
}
