/// Plan upgrades

use tracing::info;

use super::error::{ServiceError, ServiceResult};
use super::require_admin;
use crate::auth::middleware::AuthContext;
use crate::models::tenant::{Tenant, TenantPlan};
use crate::store::Store;

/// Moves the caller's own tenant to the Pro plan
///
/// Idempotent: upgrading a Pro tenant succeeds and changes nothing but
/// `updated_at`.
pub async fn upgrade_tenant(store: &dyn Store, ctx: &AuthContext, slug: &str) -> ServiceResult<Tenant> {
    require_admin(ctx)?;

    if ctx.tenant_slug != slug {
        return Err(ServiceError::forbidden(
            "Access denied: You can only upgrade your own tenant.",
        ));
    }

    let tenant = store
        .set_tenant_plan(slug, TenantPlan::Pro)
        .await?
        .ok_or_else(|| ServiceError::not_found("Tenant not found."))?;

    info!(tenant = %tenant.slug, upgraded_by = %ctx.user_id, "Tenant upgraded to Pro");
    Ok(tenant)
}
