/// PostgreSQL-backed [`Store`]
///
/// Thin adapter over the model queries in [`crate::models`]. The only
/// multi-statement operation is [`Store::create_note`], which runs inside a
/// transaction holding a row lock on the tenant so that concurrent creates
/// for the same tenant cannot both pass the quota check.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use super::{NoteInsert, Store, StoreResult};
use crate::db::pool::health_check;
use crate::models::{
    note::{CreateNote, Note, UpdateNote},
    tenant::{Tenant, TenantPlan},
    user::{CreateUser, User},
};
use crate::quota::enforce_note_quota;

/// Store backed by a PostgreSQL pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wraps an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gives access to the underlying pool (for shutdown)
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        health_check(&self.pool).await?;
        Ok(())
    }

    async fn find_tenant_by_id(&self, id: Uuid) -> StoreResult<Option<Tenant>> {
        Ok(Tenant::find_by_id(&self.pool, id).await?)
    }

    async fn find_tenant_by_slug(&self, slug: &str) -> StoreResult<Option<Tenant>> {
        Ok(Tenant::find_by_slug(&self.pool, slug).await?)
    }

    async fn upsert_tenant(&self, slug: &str, name: &str) -> StoreResult<Tenant> {
        Ok(Tenant::upsert(&self.pool, slug, name).await?)
    }

    async fn set_tenant_plan(&self, slug: &str, plan: TenantPlan) -> StoreResult<Option<Tenant>> {
        Ok(Tenant::set_plan(&self.pool, slug, plan).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(User::find_by_email(&self.pool, email).await?)
    }

    async fn create_user(&self, data: CreateUser) -> StoreResult<User> {
        Ok(User::create(&self.pool, data).await?)
    }

    async fn upsert_user(&self, data: CreateUser) -> StoreResult<User> {
        Ok(User::upsert(&self.pool, data).await?)
    }

    async fn create_note(&self, data: CreateNote) -> StoreResult<NoteInsert> {
        let mut tx = self.pool.begin().await?;

        let Some(tenant) = Tenant::lock_for_update(&mut *tx, data.tenant_id).await? else {
            tx.rollback().await?;
            return Ok(NoteInsert::TenantNotFound);
        };

        let current = Note::count_by_tenant(&mut *tx, tenant.id).await?;
        let quota = match enforce_note_quota(tenant.plan, current.max(0) as u64) {
            Ok(quota) => quota,
            Err(err) => {
                tx.rollback().await?;
                return Ok(NoteInsert::LimitReached(err));
            }
        };

        let note = Note::create(&mut *tx, data).await?;
        tx.commit().await?;

        debug!(note_id = %note.id, tenant_id = %note.tenant_id, remaining = ?quota.remaining, "Note inserted");
        Ok(NoteInsert::Created(note))
    }

    async fn list_notes(&self, tenant_id: Uuid) -> StoreResult<Vec<Note>> {
        Ok(Note::list_by_tenant(&self.pool, tenant_id).await?)
    }

    async fn find_note(&self, id: Uuid) -> StoreResult<Option<Note>> {
        Ok(Note::find_by_id(&self.pool, id).await?)
    }

    async fn update_note(&self, id: Uuid, data: UpdateNote) -> StoreResult<Option<Note>> {
        Ok(Note::update(&self.pool, id, data).await?)
    }

    async fn delete_note(&self, id: Uuid) -> StoreResult<bool> {
        Ok(Note::delete(&self.pool, id).await?)
    }
}
