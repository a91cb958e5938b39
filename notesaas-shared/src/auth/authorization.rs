/// Authorization guard
///
/// Three checks, always applied in this order:
///
/// 1. **Authentication**: verified claims must be attached to the request
/// 2. **Role**: some operations need the Admin role
/// 3. **Tenant isolation**: a resource is visible only inside its tenant
///
/// A resource that does not exist is reported as not found whatever the
/// caller's tenant; an existing resource in another tenant is forbidden.
///
/// # Example
///
/// ```
/// use notesaas_shared::auth::authorization::{enforce_tenant_isolation, require_role, AuthzError};
/// use notesaas_shared::auth::middleware::AuthContext;
/// use notesaas_shared::models::user::Role;
/// use uuid::Uuid;
///
/// let ctx = AuthContext {
///     user_id: Uuid::new_v4(),
///     role: Role::Member,
///     tenant_id: Uuid::new_v4(),
///     tenant_slug: "acme".to_string(),
/// };
///
/// assert_eq!(require_role(&ctx, Role::Admin), Err(AuthzError::Forbidden));
/// assert_eq!(enforce_tenant_isolation(&ctx, None), Err(AuthzError::NotFound));
/// assert!(enforce_tenant_isolation(&ctx, Some(ctx.tenant_id)).is_ok());
/// ```

use tracing::warn;
use uuid::Uuid;

use super::middleware::AuthContext;
use crate::models::user::Role;

/// Error type for authorization checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthzError {
    /// No verified identity on the request
    #[error("Authentication required")]
    Unauthenticated,

    /// Identity lacks the role or tenant for this resource
    #[error("Forbidden")]
    Forbidden,

    /// Resource does not exist
    #[error("Not found")]
    NotFound,
}

/// Fails unless the request carries a verified identity
pub fn require_authenticated(ctx: Option<&AuthContext>) -> Result<&AuthContext, AuthzError> {
    ctx.ok_or(AuthzError::Unauthenticated)
}

/// Fails unless the caller has exactly `role`
pub fn require_role(ctx: &AuthContext, role: Role) -> Result<(), AuthzError> {
    if ctx.role != role {
        warn!(
            user_id = %ctx.user_id,
            required = role.as_str(),
            actual = ctx.role.as_str(),
            "Role check failed"
        );
        return Err(AuthzError::Forbidden);
    }

    Ok(())
}

/// Fails unless the resource exists and belongs to the caller's tenant
///
/// `resource_tenant` is `None` when the resource was not found.
pub fn enforce_tenant_isolation(
    ctx: &AuthContext,
    resource_tenant: Option<Uuid>,
) -> Result<(), AuthzError> {
    match resource_tenant {
        None => Err(AuthzError::NotFound),
        Some(tenant_id) if tenant_id != ctx.tenant_id => {
            warn!(
                user_id = %ctx.user_id,
                caller_tenant = %ctx.tenant_id,
                resource_tenant = %tenant_id,
                "Cross-tenant access denied"
            );
            Err(AuthzError::Forbidden)
        }
        Some(_) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(role: Role) -> AuthContext {
        AuthContext {
            user_id: Uuid::new_v4(),
            role,
            tenant_id: Uuid::new_v4(),
            tenant_slug: "acme".to_string(),
        }
    }

    #[test]
    fn test_require_authenticated() {
        let admin = ctx(Role::Admin);
        assert_eq!(require_authenticated(None), Err(AuthzError::Unauthenticated));
        assert_eq!(require_authenticated(Some(&admin)), Ok(&admin));
    }

    #[test]
    fn test_require_role() {
        assert!(require_role(&ctx(Role::Admin), Role::Admin).is_ok());
        assert_eq!(require_role(&ctx(Role::Member), Role::Admin), Err(AuthzError::Forbidden));
    }

    #[test]
    fn test_tenant_isolation() {
        let caller = ctx(Role::Member);

        assert!(enforce_tenant_isolation(&caller, Some(caller.tenant_id)).is_ok());
        assert_eq!(
            enforce_tenant_isolation(&caller, Some(Uuid::new_v4())),
            Err(AuthzError::Forbidden)
        );
        assert_eq!(enforce_tenant_isolation(&caller, None), Err(AuthzError::NotFound));
    }

    #[test]
    fn test_admin_still_isolated() {
        let admin = ctx(Role::Admin);
        assert_eq!(
            enforce_tenant_isolation(&admin, Some(Uuid::new_v4())),
            Err(AuthzError::Forbidden)
        );
    }
}
