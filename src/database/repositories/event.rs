//! Event repository implementation
//!
//! Event rows and their participation rows live in one repository because
//! the toggle write spans both tables and must commit as one transaction.

use sqlx::PgPool;
use chrono::Utc;
use uuid::Uuid;
use crate::models::event::Event;
use crate::models::participation::{Participation, TogglePlan};
use crate::utils::errors::UniEventError;

const EVENT_COLUMNS: &str = "id, title, description, date, time, category, location, organizer, department, image_url, status, interested_count, going_count, created_at";

#[derive(Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a fully-formed event row
    pub async fn insert(&self, event: &Event) -> Result<(), UniEventError> {
        sqlx::query(
            r#"
            INSERT INTO events (id, title, description, date, time, category, location, organizer, department, image_url, status, interested_count, going_count, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#
        )
        .bind(event.id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.date)
        .bind(&event.time)
        .bind(&event.category)
        .bind(&event.location)
        .bind(&event.organizer)
        .bind(&event.department)
        .bind(&event.image_url)
        .bind(event.status.as_str())
        .bind(event.interested_count)
        .bind(event.going_count)
        .bind(event.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Rewrite an event row with already-merged fields. Counts and creation
    /// time are owned by other writes and stay untouched.
    pub async fn update(&self, event: &Event) -> Result<(), UniEventError> {
        sqlx::query(
            r#"
            UPDATE events
            SET title = $2,
                description = $3,
                date = $4,
                time = $5,
                category = $6,
                location = $7,
                organizer = $8,
                department = $9,
                image_url = $10,
                status = $11
            WHERE id = $1
            "#
        )
        .bind(event.id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.date)
        .bind(&event.time)
        .bind(&event.category)
        .bind(&event.location)
        .bind(&event.organizer)
        .bind(&event.department)
        .bind(&event.image_url)
        .bind(event.status.as_str())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Delete event; participation rows cascade
    pub async fn delete(&self, id: Uuid) -> Result<(), UniEventError> {
        sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// List all events, newest first, for the session-cache load
    pub async fn list_all(&self) -> Result<Vec<Event>, UniEventError> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events ORDER BY created_at DESC, id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// Get a user's participation mark on an event
    pub async fn find_participation(&self, event_id: Uuid, user_id: Uuid) -> Result<Option<Participation>, UniEventError> {
        let participation = sqlx::query_as::<_, Participation>(
            "SELECT event_id, user_id, status, marked_at FROM participations WHERE event_id = $1 AND user_id = $2"
        )
        .bind(event_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(participation)
    }

    /// Get all participation marks held by a user
    pub async fn participations_for_user(&self, user_id: Uuid) -> Result<Vec<Participation>, UniEventError> {
        let participations = sqlx::query_as::<_, Participation>(
            "SELECT event_id, user_id, status, marked_at FROM participations WHERE user_id = $1 ORDER BY marked_at DESC"
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(participations)
    }

    /// Apply a toggle plan in one transaction: the participation row is
    /// rewritten or removed and the event counters move together, floored
    /// at zero to match the table CHECK constraints. Returns the updated
    /// event row.
    pub async fn apply_participation(&self, event_id: Uuid, user_id: Uuid, plan: TogglePlan) -> Result<Event, UniEventError> {
        let mut tx = self.pool.begin().await?;

        match plan.next {
            Some(status) => {
                sqlx::query(
                    r#"
                    INSERT INTO participations (event_id, user_id, status, marked_at)
                    VALUES ($1, $2, $3, $4)
                    ON CONFLICT (event_id, user_id)
                    DO UPDATE SET status = EXCLUDED.status, marked_at = EXCLUDED.marked_at
                    "#
                )
                .bind(event_id)
                .bind(user_id)
                .bind(status.as_str())
                .bind(Utc::now())
                .execute(&mut *tx)
                .await?;
            }
            None => {
                sqlx::query("DELETE FROM participations WHERE event_id = $1 AND user_id = $2")
                    .bind(event_id)
                    .bind(user_id)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            UPDATE events
            SET interested_count = GREATEST(interested_count + $2, 0),
                going_count = GREATEST(going_count + $3, 0)
            WHERE id = $1
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(event_id)
        .bind(plan.interested_delta)
        .bind(plan.going_delta)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(event)
    }
}
