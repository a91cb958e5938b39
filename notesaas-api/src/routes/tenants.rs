/// Tenant endpoints
///
/// # Endpoints
///
/// - `POST /api/tenants/:slug/upgrade` - Move the caller's tenant to Pro (Admin)

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Path, State},
    Json,
};
use notesaas_shared::{auth::middleware::AuthContext, models::tenant::Tenant, services::tenants};
use serde::{Deserialize, Serialize};

/// Upgrade response
#[derive(Debug, Serialize, Deserialize)]
pub struct UpgradeResponse {
    pub message: String,
    pub tenant: Tenant,
}

/// Upgrade a tenant to the Pro plan
///
/// Idempotent. Admins may only upgrade their own tenant.
///
/// # Errors
///
/// - `401 Unauthorized`: No valid token
/// - `403 Forbidden`: Not an Admin, or not the caller's tenant
/// - `404 Not Found`: No such tenant
pub async fn upgrade_tenant(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(slug): Path<String>,
) -> ApiResult<Json<UpgradeResponse>> {
    let tenant = tenants::upgrade_tenant(state.store.as_ref(), &auth, &slug).await?;

    Ok(Json(UpgradeResponse {
        message: format!("Tenant {} upgraded to Pro plan.", tenant.name),
        tenant,
    }))
}
