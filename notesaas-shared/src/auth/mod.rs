/// Credentials, tokens and access checks
///
/// - [`password`]: Argon2id hashing of user passwords
/// - [`jwt`]: session tokens carrying the caller's user, role and tenant
/// - [`middleware`]: Axum bearer-token layer and the [`middleware::AuthContext`] extractor
/// - [`authorization`]: authentication, role and tenant-isolation checks
///
/// # Example
///
/// ```
/// use chrono::Duration;
/// use notesaas_shared::auth::jwt::{issue_token, validate_token, Identity};
/// use notesaas_shared::models::user::Role;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let secret = "a-secret-key-that-is-at-least-32-bytes";
/// let identity = Identity {
///     user_id: Uuid::new_v4(),
///     role: Role::Member,
///     tenant_id: Uuid::new_v4(),
///     tenant_slug: "acme".to_string(),
/// };
///
/// let token = issue_token(&identity, secret, Duration::minutes(60))?;
/// assert_eq!(validate_token(&token, secret)?.identity(), identity);
/// # Ok(())
/// # }
/// ```

pub mod authorization;
pub mod jwt;
pub mod middleware;
pub mod password;
