//! Taxonomy repository implementation
//!
//! Categories, departments and organizers are three structurally identical
//! name tables; the kind selects the table. Uniqueness and in-use guards
//! are enforced by the façade against its cache before any call lands here.

use sqlx::PgPool;
use crate::models::taxonomy::TaxonomyKind;
use crate::utils::errors::UniEventError;

#[derive(Clone)]
pub struct TaxonomyRepository {
    pool: PgPool,
}

impl TaxonomyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List all names of one kind
    pub async fn list(&self, kind: TaxonomyKind) -> Result<Vec<String>, UniEventError> {
        // kind.table() is a fixed identifier, not user input.
        let rows: Vec<(String,)> = sqlx::query_as(&format!(
            "SELECT name FROM {} ORDER BY name",
            kind.table()
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(name,)| name).collect())
    }

    /// Insert a new name
    pub async fn insert(&self, kind: TaxonomyKind, name: &str) -> Result<(), UniEventError> {
        sqlx::query(&format!("INSERT INTO {} (name) VALUES ($1)", kind.table()))
            .bind(name)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Delete a name
    pub async fn delete(&self, kind: TaxonomyKind, name: &str) -> Result<(), UniEventError> {
        sqlx::query(&format!("DELETE FROM {} WHERE name = $1", kind.table()))
            .bind(name)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
