/// User invitation
///
/// Admins add members to their own tenant. The new account's email is
/// derived from the username and the tenant slug
/// (`bob` in `acme` becomes `bob@acme.test`) and it starts with a
/// placeholder password.

use tracing::info;
use validator::ValidationError;

use super::error::{ServiceError, ServiceResult};
use super::require_admin;
use crate::auth::{middleware::AuthContext, password::hash_password_blocking};
use crate::models::user::{CreateUser, Role, User};
use crate::store::{Store, StoreError};

/// Longest accepted username
pub const MAX_USERNAME_LEN: usize = 64;

const DUPLICATE_EMAIL: &str = "User with this email already exists.";

/// Invitation request
#[derive(Debug, Clone)]
pub struct Invite {
    /// Local part of the new email address
    pub username: String,

    /// Role to grant; Member when absent
    pub role: Option<Role>,
}

/// Checks that a username is 1 to 64 characters of `[A-Za-z0-9._-]`
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    let valid_chars = username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));

    if username.is_empty() || username.len() > MAX_USERNAME_LEN || !valid_chars {
        let mut err = ValidationError::new("username");
        err.message = Some("Username must be 1-64 characters of letters, digits, '.', '_' or '-'".into());
        return Err(err);
    }

    Ok(())
}

/// Email address an invited username receives
pub fn invite_email(username: &str, tenant_slug: &str) -> String {
    format!("{}@{}.test", username.to_lowercase(), tenant_slug)
}

/// Creates a user in the caller's tenant
///
/// Only admins may invite. `default_password` is hashed and set as the
/// new account's password.
pub async fn invite_user(
    store: &dyn Store,
    ctx: &AuthContext,
    invite: Invite,
    default_password: &str,
) -> ServiceResult<User> {
    require_admin(ctx)?;

    let email = invite_email(&invite.username, &ctx.tenant_slug);

    if store.find_user_by_email(&email).await?.is_some() {
        return Err(ServiceError::Conflict(DUPLICATE_EMAIL.to_string()));
    }

    let password_hash = hash_password_blocking(default_password.to_string()).await?;

    let user = store
        .create_user(CreateUser {
            email,
            password_hash,
            role: invite.role.unwrap_or_default(),
            tenant_id: ctx.tenant_id,
        })
        .await
        .map_err(|e| match e {
            StoreError::Conflict(_) => ServiceError::Conflict(DUPLICATE_EMAIL.to_string()),
            other => other.into(),
        })?;

    info!(
        user_id = %user.id,
        tenant = %ctx.tenant_slug,
        role = user.role.as_str(),
        invited_by = %ctx.user_id,
        "User invited"
    );

    Ok(user)
}
