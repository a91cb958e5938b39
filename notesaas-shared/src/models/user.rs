/// User model and database operations
///
/// A user belongs to exactly one tenant for its whole lifetime and has a
/// fixed role inside it.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     email VARCHAR(320) NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     role VARCHAR(16) NOT NULL DEFAULT 'member',
///     tenant_id UUID NOT NULL REFERENCES tenants(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT users_role_check CHECK (role IN ('admin', 'member'))
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use notesaas_shared::models::user::{CreateUser, Role, User};
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, tenant_id: Uuid) -> Result<(), sqlx::Error> {
/// let user = User::create(&pool, CreateUser {
///     email: "bob@acme.test".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     role: Role::Member,
///     tenant_id,
/// }).await?;
///
/// let found = User::find_by_email(&pool, "bob@acme.test").await?;
/// assert_eq!(found.map(|u| u.id), Some(user.id));
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Role of a user inside their tenant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Can invite users and upgrade the tenant plan
    Admin,

    /// Can work with notes
    Member,
}

impl Role {
    /// Converts role to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Member => "member",
        }
    }

    /// Parses role from its database representation
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Role::Admin),
            "member" => Some(Role::Member),
            _ => None,
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Member
    }
}

/// User model representing an account
///
/// Passwords are stored as Argon2id hashes and never serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID
    pub id: Uuid,

    /// Email address, unique across all tenants
    pub email: String,

    /// Argon2id password hash (PHC string)
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    /// Role inside the tenant
    pub role: Role,

    /// Owning tenant
    #[serde(rename = "tenant")]
    pub tenant_id: Uuid,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Email address (stored as given; callers normalize)
    pub email: String,

    /// Argon2id password hash (NOT plaintext password!)
    pub password_hash: String,

    /// Role to assign
    #[serde(default)]
    pub role: Role,

    /// Tenant the user belongs to
    pub tenant_id: Uuid,
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct UserRow {
    id: Uuid,
    email: String,
    password_hash: String,
    role: String,
    tenant_id: Uuid,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = sqlx::Error;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = Role::parse(&row.role)
            .ok_or_else(|| sqlx::Error::Decode(format!("unknown role '{}'", row.role).into()))?;

        Ok(User {
            id: row.id,
            email: row.email,
            password_hash: row.password_hash,
            role,
            tenant_id: row.tenant_id,
            created_at: row.created_at,
        })
    }
}

impl User {
    /// Creates a new user
    ///
    /// # Errors
    ///
    /// Returns a database error with constraint `users_email_key` when the
    /// email is already taken, or a foreign key violation when the tenant
    /// does not exist.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (email, password_hash, role, tenant_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, password_hash, role, tenant_id, created_at
            "#,
        )
        .bind(data.email)
        .bind(data.password_hash)
        .bind(data.role.as_str())
        .bind(data.tenant_id)
        .fetch_one(pool)
        .await?;

        User::try_from(row)
    }

    /// Inserts a user or overwrites password, role and tenant of an existing
    /// account with the same email
    ///
    /// Only used for provisioning demo accounts.
    pub async fn upsert(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (email, password_hash, role, tenant_id)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (email) DO UPDATE
            SET password_hash = EXCLUDED.password_hash,
                role = EXCLUDED.role,
                tenant_id = EXCLUDED.tenant_id
            RETURNING id, email, password_hash, role, tenant_id, created_at
            "#,
        )
        .bind(data.email)
        .bind(data.password_hash)
        .bind(data.role.as_str())
        .bind(data.tenant_id)
        .fetch_one(pool)
        .await?;

        User::try_from(row)
    }

    /// Finds a user by exact email address
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, password_hash, role, tenant_id, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        row.map(User::try_from).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_as_str() {
        assert_eq!(Role::Admin.as_str(), "admin");
        assert_eq!(Role::Member.as_str(), "member");
    }

    #[test]
    fn test_role_parse() {
        assert_eq!(Role::parse("admin"), Some(Role::Admin));
        assert_eq!(Role::parse("member"), Some(Role::Member));
        assert_eq!(Role::parse("owner"), None);
    }

    #[test]
    fn test_role_json_is_capitalized() {
        assert_eq!(serde_json::to_value(Role::Admin).unwrap(), "Admin");
        let role: Role = serde_json::from_str("\"Member\"").unwrap();
        assert_eq!(role, Role::Member);
    }

    #[test]
    fn test_create_user_default_role() {
        let data: CreateUser = serde_json::from_value(serde_json::json!({
            "email": "bob@acme.test",
            "password_hash": "hash",
            "tenant_id": Uuid::nil(),
        }))
        .unwrap();
        assert_eq!(data.role, Role::Member);
    }

    #[test]
    fn test_user_serialization_hides_password_hash() {
        let user = User {
            id: Uuid::new_v4(),
            email: "admin@acme.test".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            role: Role::Admin,
            tenant_id: Uuid::new_v4(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(json.contains("\"tenant\""));
    }
}
