/// Note model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE notes (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(200) NOT NULL,
///     content TEXT NOT NULL,
///     owner_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     tenant_id UUID NOT NULL REFERENCES tenants(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
///
/// CREATE INDEX idx_notes_tenant_created ON notes(tenant_id, created_at DESC);
/// ```
///
/// Every query that reads notes for a caller filters by `tenant_id`; lookups
/// by bare id are only used to decide between "not found" and "forbidden".

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

/// Note model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Unique note ID
    pub id: Uuid,

    /// Title
    pub title: String,

    /// Body text
    pub content: String,

    /// User who created the note
    #[serde(rename = "owner")]
    pub owner_id: Uuid,

    /// Tenant the note belongs to (never changes)
    #[serde(rename = "tenant")]
    pub tenant_id: Uuid,

    /// When the note was created
    pub created_at: DateTime<Utc>,

    /// When the note was last modified
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a note
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNote {
    pub title: String,
    pub content: String,
    pub owner_id: Uuid,
    pub tenant_id: Uuid,
}

/// Partial update of a note
///
/// Only title and content can change; owner and tenant are fixed at
/// creation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateNote {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl UpdateNote {
    /// True when the patch changes nothing
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }

    /// Applies the patch in place and bumps `updated_at`
    pub fn apply(self, note: &mut Note, now: DateTime<Utc>) {
        if self.is_empty() {
            return;
        }
        if let Some(title) = self.title {
            note.title = title;
        }
        if let Some(content) = self.content {
            note.content = content;
        }
        note.updated_at = now;
    }
}

impl Note {
    /// Inserts a note
    pub async fn create<'e, E>(executor: E, data: CreateNote) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let note = sqlx::query_as::<_, Note>(
            r#"
            INSERT INTO notes (title, content, owner_id, tenant_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, content, owner_id, tenant_id, created_at, updated_at
            "#,
        )
        .bind(data.title)
        .bind(data.content)
        .bind(data.owner_id)
        .bind(data.tenant_id)
        .fetch_one(executor)
        .await?;

        Ok(note)
    }

    /// Finds a note by ID, regardless of tenant
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let note = sqlx::query_as::<_, Note>(
            r#"
            SELECT id, title, content, owner_id, tenant_id, created_at, updated_at
            FROM notes
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(note)
    }

    /// Lists all notes of a tenant, newest first
    pub async fn list_by_tenant(pool: &PgPool, tenant_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let notes = sqlx::query_as::<_, Note>(
            r#"
            SELECT id, title, content, owner_id, tenant_id, created_at, updated_at
            FROM notes
            WHERE tenant_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(tenant_id)
        .fetch_all(pool)
        .await?;

        Ok(notes)
    }

    /// Counts the notes of a tenant
    pub async fn count_by_tenant<'e, E>(executor: E, tenant_id: Uuid) -> Result<i64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM notes WHERE tenant_id = $1")
            .bind(tenant_id)
            .fetch_one(executor)
            .await?;

        Ok(count)
    }

    /// Applies a partial update
    ///
    /// # Returns
    ///
    /// The updated note, or `None` if it no longer exists
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateNote,
    ) -> Result<Option<Self>, sqlx::Error> {
        if data.is_empty() {
            return Self::find_by_id(pool, id).await;
        }

        let note = sqlx::query_as::<_, Note>(
            r#"
            UPDATE notes
            SET title = COALESCE($2, title),
                content = COALESCE($3, content),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, content, owner_id, tenant_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(data.title)
        .bind(data.content)
        .fetch_optional(pool)
        .await?;

        Ok(note)
    }

    /// Deletes a note
    ///
    /// # Returns
    ///
    /// `true` if a row was removed
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
