/// JWT token generation and validation module
///
/// Tokens are signed with HS256 and carry the caller's identity: user ID,
/// role, tenant ID and tenant slug. There is no revocation list; expiry is
/// the only way a token stops being valid.
///
/// # Security
///
/// - **Algorithm**: HS256 (HMAC with SHA-256)
/// - **Expiration**: Configurable, default 1 hour
/// - **Validation**: Signature, issuer, `nbf` and `exp` with zero leeway
/// - **Secret Management**: Secrets should be at least 32 bytes (256 bits)
///
/// # Example
///
/// ```
/// use notesaas_shared::auth::jwt::{issue_token, validate_token, Identity};
/// use notesaas_shared::models::user::Role;
/// use chrono::Duration;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let identity = Identity {
///     user_id: Uuid::new_v4(),
///     role: Role::Admin,
///     tenant_id: Uuid::new_v4(),
///     tenant_slug: "acme".to_string(),
/// };
///
/// let secret = "a-secret-key-that-is-at-least-32-bytes";
/// let token = issue_token(&identity, secret, Duration::hours(1))?;
///
/// let claims = validate_token(&token, secret)?;
/// assert_eq!(claims.identity(), identity);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::Role;

/// Issuer written into and required from every token
pub const ISSUER: &str = "notesaas";

/// Default token lifetime
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 60;

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Signature, format or claim checks failed
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Token was not issued by this service
    #[error("Invalid issuer")]
    InvalidIssuer,
}

/// Who a token speaks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub role: Role,
    pub tenant_id: Uuid,
    pub tenant_slug: String,
}

/// JWT claims structure
///
/// # Standard Claims
///
/// - `iss`: Issuer (always "notesaas")
/// - `iat`: Issued at timestamp
/// - `nbf`: Not before timestamp
/// - `exp`: Expiration timestamp
///
/// # Custom Claims
///
/// - `userId`, `role`, `tenantId`, `tenantSlug`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    /// Authenticated user
    pub user_id: Uuid,

    /// Role of the user inside the tenant
    pub role: Role,

    /// Tenant the user belongs to
    pub tenant_id: Uuid,

    /// Slug of that tenant
    pub tenant_slug: String,

    /// Issuer - Always "notesaas"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Creates claims issued now, valid for `ttl`
    pub fn new(identity: &Identity, ttl: Duration) -> Self {
        Self::issued_at(identity, Utc::now(), ttl)
    }

    /// Creates claims as if issued at `issued_at`
    ///
    /// Useful for reasoning about expiry without waiting.
    pub fn issued_at(identity: &Identity, issued_at: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            user_id: identity.user_id,
            role: identity.role,
            tenant_id: identity.tenant_id,
            tenant_slug: identity.tenant_slug.clone(),
            iss: ISSUER.to_string(),
            iat: issued_at.timestamp(),
            nbf: issued_at.timestamp(),
            exp: (issued_at + ttl).timestamp(),
        }
    }

    /// Identity carried by the claims
    pub fn identity(&self) -> Identity {
        Identity {
            user_id: self.user_id,
            role: self.role,
            tenant_id: self.tenant_id,
            tenant_slug: self.tenant_slug.clone(),
        }
    }
}

/// Signs claims into a token string
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Issues a token for `identity` valid for `ttl` from now
pub fn issue_token(identity: &Identity, secret: &str, ttl: Duration) -> Result<String, JwtError> {
    create_token(&Claims::new(identity, ttl), secret)
}

/// Validates a JWT token and extracts claims
///
/// Verifies:
/// - Signature is valid
/// - Issuer is "notesaas"
/// - Token hasn't expired (no leeway)
/// - Token is not used before its nbf time
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.set_required_spec_claims(&["exp", "iss"]);
    validation.validate_exp = true;
    validation.validate_nbf = true;
    validation.leeway = 0;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => JwtError::Expired,
        ErrorKind::InvalidIssuer => JwtError::InvalidIssuer,
        _ => JwtError::InvalidToken(e.to_string()),
    })?;

    Ok(token_data.claims)
}
