/// Login
///
/// Exchanges an email and password for a signed token. Unknown emails and
/// wrong passwords fail with the same [`ServiceError::InvalidCredentials`]
/// and both cost one Argon2id verification, so neither the body nor the
/// response time tells which accounts exist.

use chrono::Duration;
use tracing::{debug, info};

use super::error::{ServiceError, ServiceResult};
use crate::auth::{
    jwt::{issue_token, Identity},
    password::verify_password_blocking,
};
use crate::models::{tenant::Tenant, user::User};
use crate::store::Store;

/// Argon2id hash (same parameters as [`crate::auth::password::hash_password`])
/// that unknown emails are verified against. No password matches it.
const UNKNOWN_USER_HASH: &str =
    "$argon2id$v=19$m=65536,t=3,p=4$UtyjY/VTcO9DsU9F2p0NjA$1bqrRcecgTZFzKnRR7UwjN+IEqApBYNHAz030LADkMk";

/// Token signing settings
#[derive(Debug, Clone)]
pub struct TokenSettings {
    /// HS256 secret
    pub secret: String,

    /// Lifetime of issued tokens
    pub ttl: Duration,
}

/// Successful login
#[derive(Debug, Clone)]
pub struct Session {
    /// Signed bearer token
    pub token: String,

    /// Authenticated user
    pub user: User,

    /// The user's tenant
    pub tenant: Tenant,
}

/// Normalizes an email for lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Verifies credentials and issues a token
pub async fn login(
    store: &dyn Store,
    settings: &TokenSettings,
    email: &str,
    password: &str,
) -> ServiceResult<Session> {
    let email = normalize_email(email);
    debug!(email = %email, "Login attempt");

    let user = store.find_user_by_email(&email).await?;
    let stored_hash = user
        .as_ref()
        .map_or(UNKNOWN_USER_HASH, |u| u.password_hash.as_str())
        .to_string();

    let matched = check_password(password, stored_hash).await?;

    let Some(user) = user.filter(|_| matched) else {
        debug!(email = %email, "Login failed: invalid credentials");
        return Err(ServiceError::InvalidCredentials);
    };

    let tenant = store
        .find_tenant_by_id(user.tenant_id)
        .await?
        .ok_or_else(|| ServiceError::Internal(format!("tenant {} of user {} is missing", user.tenant_id, user.id)))?;

    let identity = Identity {
        user_id: user.id,
        role: user.role,
        tenant_id: tenant.id,
        tenant_slug: tenant.slug.clone(),
    };
    let token = issue_token(&identity, &settings.secret, settings.ttl)?;

    info!(user_id = %user.id, tenant = %tenant.slug, "User logged in");

    Ok(Session { token, user, tenant })
}

async fn check_password(password: &str, hash: String) -> ServiceResult<bool> {
    #[cfg(test)]
    tests::VERIFICATIONS.with(|count| count.set(count.get() + 1));

    Ok(verify_password_blocking(password.to_string(), hash).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::{hash_password, verify_password};
    use crate::models::user::{CreateUser, Role};
    use crate::store::memory::MemoryStore;
    use std::cell::Cell;

    thread_local! {
        pub(super) static VERIFICATIONS: Cell<usize> = Cell::new(0);
    }

    fn settings() -> TokenSettings {
        TokenSettings {
            secret: "session-test-secret-at-least-32-bytes".to_string(),
            ttl: Duration::hours(1),
        }
    }

    async fn store_with_user() -> MemoryStore {
        let store = MemoryStore::new();
        let tenant = store.upsert_tenant("acme", "Acme").await.unwrap();
        store
            .create_user(CreateUser {
                email: "admin@acme.test".to_string(),
                password_hash: hash_password("password").unwrap(),
                role: Role::Admin,
                tenant_id: tenant.id,
            })
            .await
            .unwrap();
        store
    }

    fn verifications() -> usize {
        VERIFICATIONS.with(Cell::get)
    }

    #[test]
    fn test_unknown_user_hash_matches_nothing() {
        assert!(!verify_password("password", UNKNOWN_USER_HASH).unwrap());
        assert!(!verify_password("", UNKNOWN_USER_HASH).unwrap());

        // Same cost parameters as real account hashes
        let real = hash_password("password").unwrap();
        let params = |hash: &str| hash.split('$').take(4).collect::<Vec<_>>().join("$");
        assert_eq!(params(UNKNOWN_USER_HASH), params(&real));
    }

    #[tokio::test]
    async fn test_every_login_failure_runs_one_verification() {
        let store = store_with_user().await;

        let before = verifications();
        let err = login(&store, &settings(), "ghost@acme.test", "password").await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidCredentials));
        assert_eq!(verifications() - before, 1);

        let before = verifications();
        let err = login(&store, &settings(), "admin@acme.test", "wrong").await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidCredentials));
        assert_eq!(verifications() - before, 1);

        let before = verifications();
        let session = login(&store, &settings(), "Admin@Acme.test", "password").await.unwrap();
        assert_eq!(session.user.email, "admin@acme.test");
        assert_eq!(session.tenant.slug, "acme");
        assert_eq!(verifications() - before, 1);
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Admin@Acme.TEST "), "admin@acme.test");
        assert_eq!(normalize_email("user@globex.test"), "user@globex.test");
    }
}
