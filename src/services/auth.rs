//! Authentication service
//!
//! Verifies bearer tokens issued by the campus identity provider, resolves
//! them to stored profiles, and provisions a profile on first sign-in.
//! Role assignment follows configuration: listed admin emails become
//! admins, addresses on the student domain become students, anything else
//! is turned away.

use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::models::user::{Profile, UserRole};
use crate::store::CatalogStore;
use crate::utils::errors::{Result, UniEventError};

/// Token payload as issued by the identity provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Stable subject id, reused as the profile id
    pub sub: Uuid,
    pub email: String,
    pub name: String,
    pub exp: usize,
}

/// Token verification and profile resolution
pub struct AuthService<S> {
    store: Arc<S>,
    decoding_key: DecodingKey,
    validation: Validation,
    admin_emails: Vec<String>,
    student_email_domain: String,
}

impl<S: CatalogStore> AuthService<S> {
    /// Create a new AuthService from the auth section of the settings
    pub fn new(store: Arc<S>, config: &AuthConfig) -> Self {
        Self {
            store,
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
            admin_emails: config
                .admin_emails
                .iter()
                .map(|e| e.to_lowercase())
                .collect(),
            student_email_domain: config.student_email_domain.to_lowercase(),
        }
    }

    /// Resolve a bearer token to a profile.
    ///
    /// An unknown subject is provisioned on the spot: listed admin emails
    /// get the admin role, student-domain addresses get the student role,
    /// and any other address is rejected with `PermissionDenied`. A known
    /// profile whose email has since been added to the admin list is
    /// promoted during this resolution.
    pub async fn resolve_bearer(&self, token: &str) -> Result<Profile> {
        let claims = self.decode(token)?;
        debug!(user_id = %claims.sub, "Resolving bearer token");

        if let Some(profile) = self.store.find_profile(claims.sub).await? {
            if !profile.is_admin() && self.is_listed_admin(&profile.email) {
                let promoted = Profile {
                    role: UserRole::Admin,
                    ..profile
                };
                let promoted = self.store.upsert_profile(&promoted).await?;
                info!(user_id = %promoted.user_id, email = %promoted.email, "Profile promoted to admin");
                return Ok(promoted);
            }
            return Ok(profile);
        }

        let role = if self.is_listed_admin(&claims.email) {
            UserRole::Admin
        } else if self.is_student_email(&claims.email) {
            UserRole::Student
        } else {
            warn!(user_id = %claims.sub, email = %claims.email, "Sign-in rejected: email not eligible");
            return Err(UniEventError::PermissionDenied(format!(
                "Email {} is not eligible for an account",
                claims.email
            )));
        };

        let profile = Profile {
            user_id: claims.sub,
            name: claims.name,
            email: claims.email,
            role,
            created_at: Utc::now(),
        };
        let profile = self.store.upsert_profile(&profile).await?;
        info!(user_id = %profile.user_id, email = %profile.email, role = %profile.role, "Profile provisioned");

        Ok(profile)
    }

    /// Promote already-stored profiles whose email is on the admin list.
    /// Runs once at startup so config changes take effect without waiting
    /// for each admin to sign in.
    pub async fn sync_admin_roles(&self) -> Result<u64> {
        let promoted = self.store.promote_admins(&self.admin_emails).await?;
        if promoted > 0 {
            info!(promoted = promoted, "Admin roles synchronized from configuration");
        }
        Ok(promoted)
    }

    fn decode(&self, token: &str) -> Result<Claims> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(error = %e, "Bearer token rejected");
                UniEventError::InvalidToken(e.to_string())
            })
    }

    fn is_listed_admin(&self, email: &str) -> bool {
        let email = email.to_lowercase();
        self.admin_emails.iter().any(|listed| listed == &email)
    }

    fn is_student_email(&self, email: &str) -> bool {
        email.to_lowercase().ends_with(&self.student_email_domain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryCatalogStore;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn test_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: SECRET.to_string(),
            admin_emails: vec!["Admin@university.edu".to_string()],
            student_email_domain: "@student.university.edu".to_string(),
        }
    }

    fn service() -> AuthService<MemoryCatalogStore> {
        AuthService::new(Arc::new(MemoryCatalogStore::new()), &test_config())
    }

    fn token_for(sub: Uuid, email: &str, offset_secs: i64) -> String {
        let claims = Claims {
            sub,
            email: email.to_string(),
            name: "Test User".to_string(),
            exp: (Utc::now().timestamp() + offset_secs) as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_student_is_provisioned_on_first_sign_in() {
        let auth = service();
        let sub = Uuid::new_v4();
        let token = token_for(sub, "casey@student.university.edu", 3600);

        let profile = auth.resolve_bearer(&token).await.unwrap();
        assert_eq!(profile.user_id, sub);
        assert_eq!(profile.role, UserRole::Student);

        // Second resolution finds the stored profile.
        let again = auth.resolve_bearer(&token).await.unwrap();
        assert_eq!(again.user_id, sub);
    }

    #[tokio::test]
    async fn test_listed_admin_email_gets_admin_role() {
        let auth = service();
        let token = token_for(Uuid::new_v4(), "admin@university.edu", 3600);

        let profile = auth.resolve_bearer(&token).await.unwrap();
        assert_eq!(profile.role, UserRole::Admin);
    }

    #[tokio::test]
    async fn test_foreign_domain_is_rejected() {
        let auth = service();
        let token = token_for(Uuid::new_v4(), "someone@gmail.com", 3600);

        let err = auth.resolve_bearer(&token).await.unwrap_err();
        assert!(matches!(err, UniEventError::PermissionDenied(_)));
    }

    #[tokio::test]
    async fn test_expired_token_is_rejected() {
        let auth = service();
        let token = token_for(Uuid::new_v4(), "casey@student.university.edu", -3600);

        let err = auth.resolve_bearer(&token).await.unwrap_err();
        assert!(matches!(err, UniEventError::InvalidToken(_)));
    }

    #[tokio::test]
    async fn test_garbage_token_is_rejected() {
        let auth = service();

        let err = auth.resolve_bearer("not-a-token").await.unwrap_err();
        assert!(matches!(err, UniEventError::InvalidToken(_)));
    }

    #[tokio::test]
    async fn test_existing_student_promoted_when_listed() {
        let store = Arc::new(MemoryCatalogStore::new());
        let sub = Uuid::new_v4();
        store
            .upsert_profile(&Profile {
                user_id: sub,
                name: "Late Admin".to_string(),
                email: "admin@university.edu".to_string(),
                role: UserRole::Student,
                created_at: Utc::now(),
            })
            .await
            .unwrap();

        let auth = AuthService::new(store, &test_config());
        let token = token_for(sub, "admin@university.edu", 3600);

        let profile = auth.resolve_bearer(&token).await.unwrap();
        assert_eq!(profile.role, UserRole::Admin);
    }
}
