/// Domain services
///
/// Each operation takes the store, the verified caller (where one is
/// needed) and already-validated input, and returns a domain value or a
/// [`ServiceError`]. Nothing here knows about HTTP.
///
/// - [`session`]: login
/// - [`users`]: inviting users
/// - [`notes`]: tenant-scoped note CRUD with the plan quota
/// - [`tenants`]: plan upgrades

pub mod error;
pub mod notes;
pub mod session;
pub mod tenants;
pub mod users;

pub use error::{ServiceError, ServiceResult};

use crate::auth::{authorization::require_role, middleware::AuthContext};
use crate::models::user::Role;

/// Rejects callers that are not admins of their tenant
pub fn require_admin(ctx: &AuthContext) -> ServiceResult<()> {
    require_role(ctx, Role::Admin)
        .map_err(|_| ServiceError::forbidden("Access denied: Admin role required."))
}
