/// User management endpoints
///
/// # Endpoints
///
/// - `POST /api/users/invite` - Add a user to the caller's tenant (Admin)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::ValidatedJson,
};
use axum::{extract::State, http::StatusCode, Json};
use notesaas_shared::{
    auth::middleware::AuthContext,
    models::user::Role,
    services::{
        require_admin,
        users::{self, validate_username, Invite},
    },
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Invite request
#[derive(Debug, Deserialize, Validate)]
pub struct InviteRequest {
    /// Local part of the new user's email
    #[validate(custom(function = "validate_username"))]
    pub username: String,

    /// Role to grant (default: Member)
    #[serde(default)]
    pub role: Option<Role>,
}

/// Invited user summary
#[derive(Debug, Serialize, Deserialize)]
pub struct InvitedUser {
    pub email: String,
    pub role: Role,
}

/// Invite response
#[derive(Debug, Serialize, Deserialize)]
pub struct InviteResponse {
    pub message: String,
    pub user: InvitedUser,
}

/// Invite a user
///
/// The email becomes `<username>@<tenant-slug>.test` (lower-cased) and
/// the account starts with the configured default password. The role is
/// checked before the body, so non-admins always get 403.
///
/// # Errors
///
/// - `401 Unauthorized`: No valid token
/// - `403 Forbidden`: Caller is not an Admin
/// - `409 Conflict`: Email already taken
/// - `422 Unprocessable Entity`: Invalid username or role
pub async fn invite_user(
    State(state): State<AppState>,
    auth: AuthContext,
    body: Result<ValidatedJson<InviteRequest>, ApiError>,
) -> ApiResult<(StatusCode, Json<InviteResponse>)> {
    require_admin(&auth)?;
    let ValidatedJson(req) = body?;

    let user = users::invite_user(
        state.store.as_ref(),
        &auth,
        Invite {
            username: req.username,
            role: req.role,
        },
        &state.config.accounts.invite_default_password,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(InviteResponse {
            message: "User invited successfully.".to_string(),
            user: InvitedUser {
                email: user.email,
                role: user.role,
            },
        }),
    ))
}
