/// Note operations
///
/// Every operation is scoped to the caller's tenant. Lookups by ID load
/// the note first and then run the tenant-isolation check against its
/// stored tenant, so a missing note is 404 for everyone and a foreign one
/// is 403.

use tracing::{debug, info};
use uuid::Uuid;

use super::error::{ServiceError, ServiceResult};
use crate::auth::{authorization::enforce_tenant_isolation, middleware::AuthContext};
use crate::models::note::{CreateNote, Note, UpdateNote};
use crate::store::{NoteInsert, Store};

const NOTE_NOT_FOUND: &str = "Note not found.";
const FOREIGN_NOTE: &str = "Access denied: Note does not belong to your tenant.";

/// Message shown when a Free tenant is at its note limit
pub const QUOTA_EXCEEDED_MESSAGE: &str = "Note limit reached for Free plan. Please upgrade.";

/// Loads a note the caller is allowed to see
async fn load_owned_note(store: &dyn Store, ctx: &AuthContext, note_id: Uuid) -> ServiceResult<Note> {
    let note = store.find_note(note_id).await?;

    enforce_tenant_isolation(ctx, note.as_ref().map(|n| n.tenant_id))
        .map_err(|e| ServiceError::from_authz(e, FOREIGN_NOTE, NOTE_NOT_FOUND))?;

    note.ok_or_else(|| ServiceError::not_found(NOTE_NOT_FOUND))
}

/// Creates a note in the caller's tenant, subject to the plan quota
pub async fn create_note(
    store: &dyn Store,
    ctx: &AuthContext,
    title: String,
    content: String,
) -> ServiceResult<Note> {
    let insert = store
        .create_note(CreateNote {
            title,
            content,
            owner_id: ctx.user_id,
            tenant_id: ctx.tenant_id,
        })
        .await?;

    match insert {
        NoteInsert::Created(note) => {
            info!(note_id = %note.id, tenant_id = %ctx.tenant_id, user_id = %ctx.user_id, "Note created");
            Ok(note)
        }
        NoteInsert::LimitReached(err) => {
            info!(tenant = %ctx.tenant_slug, error = %err, "Note quota reached");
            Err(err.into())
        }
        NoteInsert::TenantNotFound => Err(ServiceError::not_found("Tenant not found.")),
    }
}

/// Lists the caller's tenant notes, newest first
pub async fn list_notes(store: &dyn Store, ctx: &AuthContext) -> ServiceResult<Vec<Note>> {
    let notes = store.list_notes(ctx.tenant_id).await?;
    debug!(tenant_id = %ctx.tenant_id, count = notes.len(), "Listed notes");
    Ok(notes)
}

/// Fetches one note
pub async fn get_note(store: &dyn Store, ctx: &AuthContext, note_id: Uuid) -> ServiceResult<Note> {
    load_owned_note(store, ctx, note_id).await
}

/// Applies a partial update; an empty patch returns the note unchanged
pub async fn update_note(
    store: &dyn Store,
    ctx: &AuthContext,
    note_id: Uuid,
    patch: UpdateNote,
) -> ServiceResult<Note> {
    let note = load_owned_note(store, ctx, note_id).await?;

    if patch.is_empty() {
        return Ok(note);
    }

    let updated = store
        .update_note(note_id, patch)
        .await?
        .ok_or_else(|| ServiceError::not_found(NOTE_NOT_FOUND))?;

    info!(note_id = %note_id, user_id = %ctx.user_id, "Note updated");
    Ok(updated)
}

/// Deletes a note
pub async fn delete_note(store: &dyn Store, ctx: &AuthContext, note_id: Uuid) -> ServiceResult<()> {
    load_owned_note(store, ctx, note_id).await?;

    if !store.delete_note(note_id).await? {
        return Err(ServiceError::not_found(NOTE_NOT_FOUND));
    }

    info!(note_id = %note_id, user_id = %ctx.user_id, "Note deleted");
    Ok(())
}
