/// In-memory [`Store`]
///
/// All state sits behind one `parking_lot::RwLock`, which makes every
/// operation atomic, including the count-check-insert of quota-checked note
/// creation. Data is lost when the process exits.
///
/// Notes are kept in insertion order so listing can return them newest
/// first even when two notes share a timestamp.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

use super::{NoteInsert, Store, StoreError, StoreResult};
use crate::models::{
    note::{CreateNote, Note, UpdateNote},
    tenant::{Tenant, TenantPlan},
    user::{CreateUser, User},
};
use crate::quota::enforce_note_quota;

#[derive(Debug, Default)]
struct State {
    tenants: HashMap<Uuid, Tenant>,
    users: HashMap<String, User>,
    notes: Vec<Note>,
}

impl State {
    fn tenant_by_slug_mut(&mut self, slug: &str) -> Option<&mut Tenant> {
        self.tenants.values_mut().find(|t| t.slug == slug)
    }

    fn ensure_tenant(&self, tenant_id: Uuid) -> StoreResult<()> {
        if self.tenants.contains_key(&tenant_id) {
            Ok(())
        } else {
            Err(StoreError::MissingReference(format!("tenant {}", tenant_id)))
        }
    }

    fn new_user(data: CreateUser) -> User {
        User {
            id: Uuid::new_v4(),
            email: data.email,
            password_hash: data.password_hash,
            role: data.role,
            tenant_id: data.tenant_id,
            created_at: Utc::now(),
        }
    }
}

/// Store keeping everything in process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn find_tenant_by_id(&self, id: Uuid) -> StoreResult<Option<Tenant>> {
        Ok(self.state.read().tenants.get(&id).cloned())
    }

    async fn find_tenant_by_slug(&self, slug: &str) -> StoreResult<Option<Tenant>> {
        Ok(self
            .state
            .read()
            .tenants
            .values()
            .find(|t| t.slug == slug)
            .cloned())
    }

    async fn upsert_tenant(&self, slug: &str, name: &str) -> StoreResult<Tenant> {
        let mut state = self.state.write();
        let now = Utc::now();

        if let Some(existing) = state.tenant_by_slug_mut(slug) {
            existing.name = name.to_string();
            existing.updated_at = now;
            return Ok(existing.clone());
        }

        let tenant = Tenant {
            id: Uuid::new_v4(),
            slug: slug.to_string(),
            name: name.to_string(),
            plan: TenantPlan::Free,
            created_at: now,
            updated_at: now,
        };
        state.tenants.insert(tenant.id, tenant.clone());
        Ok(tenant)
    }

    async fn set_tenant_plan(&self, slug: &str, plan: TenantPlan) -> StoreResult<Option<Tenant>> {
        let mut state = self.state.write();

        Ok(state.tenant_by_slug_mut(slug).map(|tenant| {
            tenant.plan = plan;
            tenant.updated_at = Utc::now();
            tenant.clone()
        }))
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self.state.read().users.get(email).cloned())
    }

    async fn create_user(&self, data: CreateUser) -> StoreResult<User> {
        let mut state = self.state.write();
        state.ensure_tenant(data.tenant_id)?;

        if state.users.contains_key(&data.email) {
            return Err(StoreError::Conflict("users_email_key".to_string()));
        }

        let user = State::new_user(data);
        state.users.insert(user.email.clone(), user.clone());
        Ok(user)
    }

    async fn upsert_user(&self, data: CreateUser) -> StoreResult<User> {
        let mut state = self.state.write();
        state.ensure_tenant(data.tenant_id)?;

        let user = match state.users.get(&data.email) {
            Some(existing) => User {
                password_hash: data.password_hash,
                role: data.role,
                tenant_id: data.tenant_id,
                ..existing.clone()
            },
            None => State::new_user(data),
        };

        state.users.insert(user.email.clone(), user.clone());
        Ok(user)
    }

    async fn create_note(&self, data: CreateNote) -> StoreResult<NoteInsert> {
        let mut state = self.state.write();

        let Some(plan) = state.tenants.get(&data.tenant_id).map(|t| t.plan) else {
            return Ok(NoteInsert::TenantNotFound);
        };

        if !state.users.values().any(|u| u.id == data.owner_id) {
            return Err(StoreError::MissingReference(format!("user {}", data.owner_id)));
        }

        let current = state
            .notes
            .iter()
            .filter(|n| n.tenant_id == data.tenant_id)
            .count() as u64;

        let quota = match enforce_note_quota(plan, current) {
            Ok(quota) => quota,
            Err(err) => return Ok(NoteInsert::LimitReached(err)),
        };

        let now = Utc::now();
        let note = Note {
            id: Uuid::new_v4(),
            title: data.title,
            content: data.content,
            owner_id: data.owner_id,
            tenant_id: data.tenant_id,
            created_at: now,
            updated_at: now,
        };
        state.notes.push(note.clone());

        debug!(note_id = %note.id, tenant_id = %note.tenant_id, remaining = ?quota.remaining, "Note inserted");
        Ok(NoteInsert::Created(note))
    }

    async fn list_notes(&self, tenant_id: Uuid) -> StoreResult<Vec<Note>> {
        Ok(self
            .state
            .read()
            .notes
            .iter()
            .rev()
            .filter(|n| n.tenant_id == tenant_id)
            .cloned()
            .collect())
    }

    async fn find_note(&self, id: Uuid) -> StoreResult<Option<Note>> {
        Ok(self.state.read().notes.iter().find(|n| n.id == id).cloned())
    }

    async fn update_note(&self, id: Uuid, data: UpdateNote) -> StoreResult<Option<Note>> {
        let mut state = self.state.write();

        Ok(state.notes.iter_mut().find(|n| n.id == id).map(|note| {
            data.apply(note, Utc::now());
            note.clone()
        }))
    }

    async fn delete_note(&self, id: Uuid) -> StoreResult<bool> {
        let mut state = self.state.write();
        let before = state.notes.len();
        state.notes.retain(|n| n.id != id);
        Ok(state.notes.len() < before)
    }
}
