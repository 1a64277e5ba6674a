//! Event catalog façade
//!
//! This service owns the authoritative in-memory event and taxonomy lists
//! for the server session and mediates every read and write. The cache is
//! loaded from the store once at startup; mutations persist first and
//! commit to the cache only after the store write succeeds, so a failed
//! write leaves the cache at the last known-good persisted state.
//!
//! All mutations serialize through one async lock held across the persist
//! and the cache commit. That keeps a participation toggle from
//! interleaving with a delete of the same event within this process;
//! across processes, counts are last-writer-wins.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::event::{CreateEventRequest, Event, UpdateEventRequest};
use crate::models::filter::{
    catalog_stats, sort_events, CatalogStats, EventFilter, EventOrder, EventView,
};
use crate::models::participation::{self, ParticipationStatus};
use crate::models::taxonomy::{TaxonomyKind, TaxonomySet};
use crate::models::user::Profile;
use crate::store::CatalogStore;
use crate::utils::errors::{Result, UniEventError};

/// The façade in front of the persisted store
pub struct CatalogService<S> {
    store: Arc<S>,
    cache: RwLock<CatalogCache>,
    /// Serializes all mutations across persist + cache commit.
    write_lock: Mutex<()>,
}

#[derive(Debug, Clone, Default)]
struct CatalogCache {
    events: Vec<Event>,
    taxonomies: TaxonomySet,
}

impl<S: CatalogStore> CatalogService<S> {
    /// Build the session cache by reading the full catalog from the store
    pub async fn load(store: Arc<S>) -> Result<Self> {
        let snapshot = store.load_catalog().await?;
        info!(
            events = snapshot.events.len(),
            categories = snapshot.taxonomies.categories.len(),
            departments = snapshot.taxonomies.departments.len(),
            organizers = snapshot.taxonomies.organizers.len(),
            "Event catalog loaded"
        );

        Ok(Self {
            store,
            cache: RwLock::new(CatalogCache {
                events: snapshot.events,
                taxonomies: snapshot.taxonomies,
            }),
            write_lock: Mutex::new(()),
        })
    }

    /// Re-read the catalog from the store, replacing the session cache
    pub async fn refresh(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let snapshot = self.store.load_catalog().await?;

        let mut cache = self.cache.write().await;
        cache.events = snapshot.events;
        cache.taxonomies = snapshot.taxonomies;
        info!(events = cache.events.len(), "Event catalog refreshed");

        Ok(())
    }

    // ── Reads ─────────────────────────────────────────────────────────────

    /// Filtered, ordered event list from the cache. Never touches the store.
    pub async fn list_events(&self, filter: &EventFilter, order: EventOrder) -> Vec<Event> {
        let now = Utc::now();
        let cache = self.cache.read().await;
        let mut events: Vec<Event> = cache
            .events
            .iter()
            .filter(|e| filter.matches(e, now))
            .cloned()
            .collect();
        sort_events(&mut events, order);
        events
    }

    pub async fn get_event(&self, event_id: Uuid) -> Result<Event> {
        let cache = self.cache.read().await;
        cache
            .events
            .iter()
            .find(|e| e.id == event_id)
            .cloned()
            .ok_or(UniEventError::EventNotFound { event_id })
    }

    /// Event list assembled for a viewer: derived state plus the viewer's
    /// own participation flags, resolved from the store per request.
    pub async fn event_views(
        &self,
        filter: &EventFilter,
        order: EventOrder,
        viewer: Option<&Profile>,
    ) -> Result<Vec<EventView>> {
        let marks = self.viewer_marks(viewer).await?;
        let now = Utc::now();
        let events = self.list_events(filter, order).await;

        Ok(events
            .into_iter()
            .map(|event| {
                let mark = marks.get(&event.id).copied();
                EventView::assemble(event, mark, now)
            })
            .collect())
    }

    pub async fn event_view(&self, event_id: Uuid, viewer: Option<&Profile>) -> Result<EventView> {
        let event = self.get_event(event_id).await?;
        let marks = self.viewer_marks(viewer).await?;
        Ok(EventView::assemble(
            event,
            marks.get(&event_id).copied(),
            Utc::now(),
        ))
    }

    /// All events the viewer has marked, with their flags, soonest first
    pub async fn events_for_user(&self, viewer: &Profile) -> Result<Vec<EventView>> {
        let marks = self.store.participations_for_user(viewer.user_id).await?;
        let now = Utc::now();
        let cache = self.cache.read().await;

        let mut views: Vec<EventView> = marks
            .iter()
            .filter_map(|mark| {
                cache
                    .events
                    .iter()
                    .find(|e| e.id == mark.event_id)
                    .map(|e| EventView::assemble(e.clone(), Some(mark.status), now))
            })
            .collect();
        views.sort_by(|a, b| {
            a.event
                .date
                .cmp(&b.event.date)
                .then_with(|| a.event.id.cmp(&b.event.id))
        });

        Ok(views)
    }

    pub async fn taxonomies(&self) -> TaxonomySet {
        self.cache.read().await.taxonomies.clone()
    }

    /// Admin dashboard numbers over the whole cached list
    pub async fn stats(&self) -> CatalogStats {
        let cache = self.cache.read().await;
        catalog_stats(&cache.events, Utc::now())
    }

    pub async fn health(&self) -> Result<()> {
        self.store.health_check().await
    }

    // ── Event mutations ───────────────────────────────────────────────────

    /// Create an event from an admin draft.
    ///
    /// Rejects `DuplicateEvent` when another event carries the same title
    /// (case-insensitive) on the same date. The new event gets a fresh id,
    /// zero counts and the current timestamp, and lands at the front of the
    /// cached list once persisted.
    pub async fn create_event(&self, draft: CreateEventRequest) -> Result<Event> {
        debug!(title = %draft.title, date = %draft.date, "Creating event");
        let _guard = self.write_lock.lock().await;

        let event = {
            let cache = self.cache.read().await;
            validate_draft(&draft, &cache.taxonomies)?;

            if let Some(existing) = cache
                .events
                .iter()
                .find(|e| e.collides_with(&draft.title, draft.date))
            {
                warn!(
                    title = %draft.title,
                    date = %draft.date,
                    existing_id = %existing.id,
                    "Duplicate event rejected"
                );
                return Err(UniEventError::DuplicateEvent {
                    title: draft.title,
                    date: draft.date,
                });
            }

            Event {
                id: Uuid::new_v4(),
                title: draft.title,
                description: draft.description,
                date: draft.date,
                time: draft.time,
                category: draft.category,
                location: draft.location,
                organizer: draft.organizer,
                department: draft.department.filter(|d| !d.trim().is_empty()),
                image_url: draft.image_url,
                status: draft.status,
                interested_count: 0,
                going_count: 0,
                created_at: Utc::now(),
            }
        };

        self.store.insert_event(&event).await?;
        self.cache.write().await.events.insert(0, event.clone());

        info!(event_id = %event.id, title = %event.title, "Event created");
        Ok(event)
    }

    /// Merge the provided fields into an existing event. Unknown id fails
    /// with `NotFound`; identity, counts and creation time never change.
    pub async fn update_event(&self, event_id: Uuid, partial: UpdateEventRequest) -> Result<Event> {
        debug!(event_id = %event_id, "Updating event");
        if partial.is_empty() {
            return Err(UniEventError::InvalidInput(
                "No fields to update".to_string(),
            ));
        }
        let _guard = self.write_lock.lock().await;

        let updated = {
            let cache = self.cache.read().await;
            let mut event = cache
                .events
                .iter()
                .find(|e| e.id == event_id)
                .cloned()
                .ok_or(UniEventError::EventNotFound { event_id })?;
            partial.apply_to(&mut event);
            validate_event_fields(&event, &cache.taxonomies)?;
            event
        };

        self.store.update_event(&updated).await?;
        {
            let mut cache = self.cache.write().await;
            if let Some(slot) = cache.events.iter_mut().find(|e| e.id == event_id) {
                *slot = updated.clone();
            }
        }

        info!(event_id = %event_id, "Event updated");
        Ok(updated)
    }

    /// Remove an event from the store and the cache. Unknown id fails with
    /// `NotFound`.
    pub async fn delete_event(&self, event_id: Uuid) -> Result<()> {
        debug!(event_id = %event_id, "Deleting event");
        let _guard = self.write_lock.lock().await;

        {
            let cache = self.cache.read().await;
            if !cache.events.iter().any(|e| e.id == event_id) {
                return Err(UniEventError::EventNotFound { event_id });
            }
        }

        self.store.delete_event(event_id).await?;
        self.cache.write().await.events.retain(|e| e.id != event_id);

        info!(event_id = %event_id, "Event deleted");
        Ok(())
    }

    // ── Participation toggles ─────────────────────────────────────────────

    pub async fn toggle_interested(
        &self,
        event_id: Uuid,
        viewer: Option<&Profile>,
    ) -> Result<EventView> {
        self.toggle(event_id, viewer, ParticipationStatus::Interested)
            .await
    }

    pub async fn toggle_going(
        &self,
        event_id: Uuid,
        viewer: Option<&Profile>,
    ) -> Result<EventView> {
        self.toggle(event_id, viewer, ParticipationStatus::Going)
            .await
    }

    /// Run one transition of the participation state machine.
    ///
    /// The store applies the whole plan (row + both counters) atomically and
    /// returns the updated event, which then replaces the cached row. A
    /// store failure therefore leaves both the store and the cache at the
    /// pre-toggle state.
    async fn toggle(
        &self,
        event_id: Uuid,
        viewer: Option<&Profile>,
        mark: ParticipationStatus,
    ) -> Result<EventView> {
        let viewer = viewer.ok_or(UniEventError::Unauthenticated)?;
        let _guard = self.write_lock.lock().await;

        let event = self.get_event(event_id).await?;
        let now = Utc::now();
        if event.is_past(now) {
            warn!(event_id = %event_id, user_id = %viewer.user_id, "Toggle rejected: event has passed");
            return Err(UniEventError::PastEvent { event_id });
        }

        let current = self.store.participation(event_id, viewer.user_id).await?;
        let plan = participation::plan(current.map(|p| p.status), mark);
        let updated = self
            .store
            .apply_participation(event_id, viewer.user_id, plan)
            .await?;

        {
            let mut cache = self.cache.write().await;
            if let Some(slot) = cache.events.iter_mut().find(|e| e.id == event_id) {
                *slot = updated.clone();
            }
        }

        info!(
            event_id = %event_id,
            user_id = %viewer.user_id,
            mark = %mark,
            next = ?plan.next.map(|s| s.as_str()),
            interested = updated.interested_count,
            going = updated.going_count,
            "Participation toggled"
        );
        Ok(EventView::assemble(updated, plan.next, now))
    }

    // ── Taxonomy mutations ────────────────────────────────────────────────

    /// Add a name to a taxonomy list. Names are trimmed; an empty or
    /// already-present name is rejected before any write.
    pub async fn add_taxonomy(&self, kind: TaxonomyKind, name: &str) -> Result<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(UniEventError::InvalidInput(format!(
                "{kind} name must not be empty"
            )));
        }
        let _guard = self.write_lock.lock().await;

        {
            let cache = self.cache.read().await;
            if cache.taxonomies.contains(kind, name) {
                return Err(UniEventError::DuplicateName {
                    kind,
                    name: name.to_string(),
                });
            }
        }

        self.store.insert_taxonomy(kind, name).await?;
        self.cache
            .write()
            .await
            .taxonomies
            .list_mut(kind)
            .push(name.to_string());

        info!(kind = %kind, name = %name, "Taxonomy entry added");
        Ok(name.to_string())
    }

    /// Remove a name from a taxonomy list. Fails with `InUse` and the exact
    /// number of referencing events while any event still carries the name.
    pub async fn delete_taxonomy(&self, kind: TaxonomyKind, name: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        {
            let cache = self.cache.read().await;
            if !cache.taxonomies.contains(kind, name) {
                return Err(UniEventError::TaxonomyNotFound {
                    kind,
                    name: name.to_string(),
                });
            }
            let count = cache
                .events
                .iter()
                .filter(|e| e.references(kind, name))
                .count();
            if count > 0 {
                warn!(kind = %kind, name = %name, count = count, "Taxonomy delete rejected: in use");
                return Err(UniEventError::TaxonomyInUse {
                    kind,
                    name: name.to_string(),
                    count,
                });
            }
        }

        self.store.delete_taxonomy(kind, name).await?;
        self.cache
            .write()
            .await
            .taxonomies
            .list_mut(kind)
            .retain(|n| n != name);

        info!(kind = %kind, name = %name, "Taxonomy entry deleted");
        Ok(())
    }

    // ── Internals ─────────────────────────────────────────────────────────

    async fn viewer_marks(
        &self,
        viewer: Option<&Profile>,
    ) -> Result<HashMap<Uuid, ParticipationStatus>> {
        match viewer {
            Some(profile) => {
                let marks = self.store.participations_for_user(profile.user_id).await?;
                Ok(marks.into_iter().map(|p| (p.event_id, p.status)).collect())
            }
            None => Ok(HashMap::new()),
        }
    }
}

/// Field bounds from the admin form, checked server-side since the store
/// cannot trust the select-list UI. Character counts, not bytes.
fn validate_event_fields(event: &Event, taxonomies: &TaxonomySet) -> Result<()> {
    if event.title.is_empty() || event.title.chars().count() > 100 {
        return Err(UniEventError::InvalidInput(
            "Title must be between 1 and 100 characters".to_string(),
        ));
    }
    if event.description.is_empty() || event.description.chars().count() > 1000 {
        return Err(UniEventError::InvalidInput(
            "Description must be between 1 and 1000 characters".to_string(),
        ));
    }
    if event.location.is_empty() || event.location.chars().count() > 200 {
        return Err(UniEventError::InvalidInput(
            "Location must be between 1 and 200 characters".to_string(),
        ));
    }
    if event.time.is_empty() {
        return Err(UniEventError::InvalidInput("Time is required".to_string()));
    }
    if !taxonomies.contains(TaxonomyKind::Category, &event.category) {
        return Err(UniEventError::InvalidInput(format!(
            "Unknown category \"{}\"",
            event.category
        )));
    }
    if !taxonomies.contains(TaxonomyKind::Organizer, &event.organizer) {
        return Err(UniEventError::InvalidInput(format!(
            "Unknown organizer \"{}\"",
            event.organizer
        )));
    }
    if let Some(department) = &event.department {
        if !taxonomies.contains(TaxonomyKind::Department, department) {
            return Err(UniEventError::InvalidInput(format!(
                "Unknown department \"{}\"",
                department
            )));
        }
    }

    Ok(())
}

fn validate_draft(draft: &CreateEventRequest, taxonomies: &TaxonomySet) -> Result<()> {
    // Validate through the event shape so create and update share one rule
    // set. Identity fields are placeholders here.
    let probe = Event {
        id: Uuid::nil(),
        title: draft.title.clone(),
        description: draft.description.clone(),
        date: draft.date,
        time: draft.time.clone(),
        category: draft.category.clone(),
        location: draft.location.clone(),
        organizer: draft.organizer.clone(),
        department: draft.department.clone().filter(|d| !d.trim().is_empty()),
        image_url: draft.image_url.clone(),
        status: draft.status,
        interested_count: 0,
        going_count: 0,
        created_at: Utc::now(),
    };
    validate_event_fields(&probe, taxonomies)
}
