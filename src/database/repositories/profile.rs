//! Profile repository implementation

use sqlx::PgPool;
use uuid::Uuid;
use crate::models::user::{Profile, UserRole};
use crate::utils::errors::UniEventError;

#[derive(Clone)]
pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find profile by the identity provider's subject id
    pub async fn find_by_id(&self, user_id: Uuid) -> Result<Option<Profile>, UniEventError> {
        let profile = sqlx::query_as::<_, Profile>(
            "SELECT user_id, name, email, role, created_at FROM profiles WHERE user_id = $1"
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    /// Insert a profile, or refresh name/email/role when the subject is
    /// already provisioned
    pub async fn upsert(&self, profile: &Profile) -> Result<Profile, UniEventError> {
        let stored = sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO profiles (user_id, name, email, role, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id)
            DO UPDATE SET name = EXCLUDED.name, email = EXCLUDED.email, role = EXCLUDED.role
            RETURNING user_id, name, email, role, created_at
            "#
        )
        .bind(profile.user_id)
        .bind(&profile.name)
        .bind(&profile.email)
        .bind(profile.role.as_str())
        .bind(profile.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(stored)
    }

    /// Promote every profile whose email is in the configured admin list.
    /// Returns the number of rows that changed.
    pub async fn promote_admins(&self, emails: &[String]) -> Result<u64, UniEventError> {
        let result = sqlx::query(
            "UPDATE profiles SET role = $1 WHERE email = ANY($2) AND role <> $1"
        )
        .bind(UserRole::Admin.as_str())
        .bind(emails)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
