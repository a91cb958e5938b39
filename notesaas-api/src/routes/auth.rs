/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /api/login` - Exchange email and password for a bearer token

use crate::{app::AppState, error::ApiResult, extract::ValidatedJson};
use axum::{extract::State, Json};
use notesaas_shared::{
    models::{tenant::TenantPlan, user::Role},
    services::session,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address (case and surrounding whitespace are ignored)
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    /// Password
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Tenant summary in the login response
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginTenant {
    pub slug: String,
    pub plan: TenantPlan,
}

/// User summary in the login response
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginUser {
    pub email: String,
    pub role: Role,
    pub tenant: LoginTenant,
}

/// Login response
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Bearer token
    pub token: String,

    /// Who logged in
    pub user: LoginUser,
}

/// Login endpoint
///
/// # Endpoint
///
/// ```text
/// POST /api/login
/// Content-Type: application/json
///
/// { "email": "admin@acme.test", "password": "password" }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "token": "eyJ...",
///   "user": {
///     "email": "admin@acme.test",
///     "role": "Admin",
///     "tenant": { "slug": "acme", "plan": "Free" }
///   }
/// }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Unknown email or wrong password (same body for both)
/// - `422 Unprocessable Entity`: Missing fields
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let session = session::login(
        state.store.as_ref(),
        &state.token_settings(),
        &req.email,
        &req.password,
    )
    .await?;

    Ok(Json(LoginResponse {
        token: session.token,
        user: LoginUser {
            email: session.user.email,
            role: session.user.role,
            tenant: LoginTenant {
                slug: session.tenant.slug,
                plan: session.tenant.plan,
            },
        },
    }))
}
