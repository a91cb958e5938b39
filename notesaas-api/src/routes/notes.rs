/// Note endpoints
///
/// All routes require a valid token and only ever touch notes of the
/// caller's tenant.
///
/// # Endpoints
///
/// - `POST   /api/notes`     - Create a note (subject to the plan quota)
/// - `GET    /api/notes`     - List notes, newest first
/// - `GET    /api/notes/:id` - Fetch a note
/// - `PUT    /api/notes/:id` - Update title and/or content
/// - `DELETE /api/notes/:id` - Delete a note

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::ValidatedJson,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use notesaas_shared::{
    auth::middleware::AuthContext,
    models::note::{Note, UpdateNote},
    services::notes,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Create note request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateNoteRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[validate(length(min = 1, max = 10000, message = "Content must be 1-10000 characters"))]
    pub content: String,
}

/// Update note request
///
/// Only these two fields may be changed; anything else in the body is
/// rejected.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateNoteRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,

    #[validate(length(min = 1, max = 10000, message = "Content must be 1-10000 characters"))]
    pub content: Option<String>,
}

impl From<UpdateNoteRequest> for UpdateNote {
    fn from(req: UpdateNoteRequest) -> Self {
        UpdateNote {
            title: req.title,
            content: req.content,
        }
    }
}

/// Delete response
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub message: String,
}

/// Parses a note ID; anything unparsable cannot name an existing note
fn parse_note_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound("Note not found.".to_string()))
}

/// Create a note
///
/// # Errors
///
/// - `403 Forbidden` (`quota_exceeded`): Free tenant already holds 3 notes
/// - `422 Unprocessable Entity`: Missing or invalid title/content
pub async fn create_note(
    State(state): State<AppState>,
    auth: AuthContext,
    ValidatedJson(req): ValidatedJson<CreateNoteRequest>,
) -> ApiResult<(StatusCode, Json<Note>)> {
    let note = notes::create_note(state.store.as_ref(), &auth, req.title, req.content).await?;
    Ok((StatusCode::CREATED, Json(note)))
}

/// List the tenant's notes, newest first
pub async fn list_notes(State(state): State<AppState>, auth: AuthContext) -> ApiResult<Json<Vec<Note>>> {
    Ok(Json(notes::list_notes(state.store.as_ref(), &auth).await?))
}

/// Fetch a note
///
/// # Errors
///
/// - `403 Forbidden`: Note belongs to another tenant
/// - `404 Not Found`: No such note
pub async fn get_note(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<String>,
) -> ApiResult<Json<Note>> {
    let id = parse_note_id(&id)?;
    Ok(Json(notes::get_note(state.store.as_ref(), &auth, id).await?))
}

/// Update a note's title and/or content
///
/// # Errors
///
/// - `403 Forbidden`: Note belongs to another tenant
/// - `404 Not Found`: No such note
/// - `422 Unprocessable Entity`: Invalid values or fields other than title/content
pub async fn update_note(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateNoteRequest>,
) -> ApiResult<Json<Note>> {
    let id = parse_note_id(&id)?;
    let note = notes::update_note(state.store.as_ref(), &auth, id, req.into()).await?;
    Ok(Json(note))
}

/// Delete a note
///
/// # Errors
///
/// - `403 Forbidden`: Note belongs to another tenant
/// - `404 Not Found`: No such note
pub async fn delete_note(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    let id = parse_note_id(&id)?;
    notes::delete_note(state.store.as_ref(), &auth, id).await?;

    Ok(Json(DeleteResponse {
        message: "Note deleted successfully.".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_note_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_note_id(&id.to_string()).unwrap(), id);
        assert!(matches!(parse_note_id("64f1c0ffee"), Err(ApiError::NotFound(_))));
    }

    #[test]
    fn test_update_request_limits() {
        let ok = UpdateNoteRequest {
            title: Some("t".to_string()),
            content: None,
        };
        assert!(ok.validate().is_ok());
        assert!(UpdateNoteRequest::default().validate().is_ok());

        let too_long = UpdateNoteRequest {
            title: Some("x".repeat(201)),
            content: None,
        };
        assert!(too_long.validate().is_err());

        let empty = UpdateNoteRequest {
            title: None,
            content: Some(String::new()),
        };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_create_request_limits() {
        let ok = CreateNoteRequest {
            title: "x".repeat(200),
            content: "y".repeat(10_000),
        };
        assert!(ok.validate().is_ok());

        let bad = CreateNoteRequest {
            title: String::new(),
            content: "y".repeat(10_001),
        };
        let errors = bad.validate().unwrap_err();
        assert_eq!(errors.field_errors().len(), 2);
    }
}
