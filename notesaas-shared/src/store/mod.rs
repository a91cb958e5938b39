/// Persistence abstraction
///
/// Services talk to storage only through the [`Store`] trait, which is
/// deliberately small: key lookups, tenant-filtered finds, upserts and
/// deletes. Two implementations exist:
///
/// - [`postgres::PgStore`]: production storage on PostgreSQL via sqlx
/// - [`memory::MemoryStore`]: process-local maps, for tests and demos
///
/// # Example
///
/// ```
/// use notesaas_shared::store::{memory::MemoryStore, Store};
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
/// let acme = store.upsert_tenant("acme", "Acme").await?;
/// assert_eq!(store.find_tenant_by_slug("acme").await?, Some(acme));
/// # Ok(())
/// # }
/// ```

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{
    note::{CreateNote, Note, UpdateNote},
    tenant::{Tenant, TenantPlan},
    user::{CreateUser, User},
};
use crate::quota::QuotaError;

/// Store result type alias
pub type StoreResult<T> = Result<T, StoreError>;

/// Storage errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique key is already taken
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A referenced record (tenant, owner) does not exist
    #[error("Missing reference: {0}")]
    MissingReference(String),

    /// Any other database failure
    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                let constraint = db_err.constraint().unwrap_or("unique key").to_string();
                return StoreError::Conflict(constraint);
            }
            if db_err.is_foreign_key_violation() {
                let constraint = db_err.constraint().unwrap_or("foreign key").to_string();
                return StoreError::MissingReference(constraint);
            }
        }
        StoreError::Database(err)
    }
}

/// Outcome of a quota-checked note insert
#[derive(Debug, Clone, PartialEq)]
pub enum NoteInsert {
    /// The note was stored
    Created(Note),

    /// The tenant's plan does not allow another note
    LimitReached(QuotaError),

    /// The tenant referenced by the note does not exist
    TenantNotFound,
}

/// Persistence operations used by the services
#[async_trait]
pub trait Store: Send + Sync {
    /// Checks that the backing storage is reachable
    async fn ping(&self) -> StoreResult<()>;

    /// Finds a tenant by ID
    async fn find_tenant_by_id(&self, id: Uuid) -> StoreResult<Option<Tenant>>;

    /// Finds a tenant by slug
    async fn find_tenant_by_slug(&self, slug: &str) -> StoreResult<Option<Tenant>>;

    /// Creates a Free tenant, or renames the existing tenant with this slug
    async fn upsert_tenant(&self, slug: &str, name: &str) -> StoreResult<Tenant>;

    /// Sets the plan of a tenant; `None` if the slug is unknown
    async fn set_tenant_plan(&self, slug: &str, plan: TenantPlan) -> StoreResult<Option<Tenant>>;

    /// Finds a user by exact email
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Creates a user; [`StoreError::Conflict`] if the email is taken
    async fn create_user(&self, data: CreateUser) -> StoreResult<User>;

    /// Creates a user or overwrites the account with the same email
    async fn upsert_user(&self, data: CreateUser) -> StoreResult<User>;

    /// Counts, checks the tenant's plan quota and inserts as one atomic step
    async fn create_note(&self, data: CreateNote) -> StoreResult<NoteInsert>;

    /// Lists a tenant's notes, newest first
    async fn list_notes(&self, tenant_id: Uuid) -> StoreResult<Vec<Note>>;

    /// Finds a note by ID regardless of tenant
    async fn find_note(&self, id: Uuid) -> StoreResult<Option<Note>>;

    /// Applies a partial update; `None` if the note is gone
    async fn update_note(&self, id: Uuid, data: UpdateNote) -> StoreResult<Option<Note>>;

    /// Deletes a note; `false` if it was already gone
    async fn delete_note(&self, id: Uuid) -> StoreResult<bool>;
}
