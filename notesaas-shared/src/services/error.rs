/// Domain error taxonomy
///
/// Every service operation fails with a [`ServiceError`]. The HTTP layer
/// maps each variant to a status code in exactly one place.

use crate::auth::{authorization::AuthzError, jwt::JwtError, password::PasswordError};
use crate::quota::QuotaError;
use crate::store::StoreError;

/// Service result type alias
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors returned by the domain services
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// No verified identity
    #[error("Authentication required")]
    Unauthenticated,

    /// Unknown email or wrong password; the two are never distinguished
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Caller lacks the role or tenant for this action
    #[error("{0}")]
    Forbidden(String),

    /// Resource does not exist
    #[error("{0}")]
    NotFound(String),

    /// A unique value is already taken
    #[error("{0}")]
    Conflict(String),

    /// The tenant's plan does not allow another note
    #[error(transparent)]
    QuotaExceeded(#[from] QuotaError),

    /// Anything unexpected; the detail is logged, never shown to clients
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn forbidden(message: impl Into<String>) -> Self {
        ServiceError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ServiceError::NotFound(message.into())
    }

    /// Maps a guard failure, replacing the generic message with one that
    /// names the resource
    pub fn from_authz(err: AuthzError, forbidden: &str, not_found: &str) -> Self {
        match err {
            AuthzError::Unauthenticated => ServiceError::Unauthenticated,
            AuthzError::Forbidden => ServiceError::forbidden(forbidden),
            AuthzError::NotFound => ServiceError::not_found(not_found),
        }
    }
}

impl From<AuthzError> for ServiceError {
    fn from(err: AuthzError) -> Self {
        match err {
            AuthzError::Unauthenticated => ServiceError::Unauthenticated,
            AuthzError::Forbidden => ServiceError::forbidden("Access denied."),
            AuthzError::NotFound => ServiceError::not_found("Resource not found."),
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(constraint) => ServiceError::Conflict(constraint),
            other => ServiceError::Internal(other.to_string()),
        }
    }
}

impl From<PasswordError> for ServiceError {
    fn from(err: PasswordError) -> Self {
        ServiceError::Internal(err.to_string())
    }
}

impl From<JwtError> for ServiceError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::CreateError(msg) => ServiceError::Internal(msg),
            _ => ServiceError::Unauthenticated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::tenant::TenantPlan;

    #[test]
    fn test_authz_mapping() {
        assert!(matches!(ServiceError::from(AuthzError::Unauthenticated), ServiceError::Unauthenticated));
        assert!(matches!(ServiceError::from(AuthzError::Forbidden), ServiceError::Forbidden(_)));
        assert!(matches!(ServiceError::from(AuthzError::NotFound), ServiceError::NotFound(_)));

        let err = ServiceError::from_authz(AuthzError::NotFound, "no", "Note not found.");
        assert_eq!(err.to_string(), "Note not found.");
    }

    #[test]
    fn test_store_mapping() {
        let err = ServiceError::from(StoreError::Conflict("users_email_key".to_string()));
        assert!(matches!(err, ServiceError::Conflict(_)));

        let err = ServiceError::from(StoreError::MissingReference("tenant".to_string()));
        assert!(matches!(err, ServiceError::Internal(_)));
    }

    #[test]
    fn test_quota_mapping() {
        let err: ServiceError = QuotaError::LimitExceeded {
            plan: TenantPlan::Free,
            limit: 3,
            current: 3,
        }
        .into();
        assert!(matches!(err, ServiceError::QuotaExceeded(_)));
    }
}
