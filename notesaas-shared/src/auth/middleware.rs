/// Authentication middleware for Axum
///
/// Validates `Authorization: Bearer <token>` headers and attaches the
/// verified identity to the request as an [`AuthContext`] extension.
/// Handlers receive it by taking `AuthContext` as an argument; a request
/// that reached a handler without one is rejected with 401.
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::get, Router};
/// use notesaas_shared::auth::middleware::{jwt_auth_middleware, AuthContext};
///
/// async fn whoami(auth: AuthContext) -> String {
///     format!("{} in {}", auth.user_id, auth.tenant_slug)
/// }
///
/// let app: Router = Router::new()
///     .route("/api/whoami", get(whoami))
///     .layer(middleware::from_fn(|req, next| {
///         jwt_auth_middleware("a-secret-key-that-is-at-least-32-bytes".to_string(), req, next)
///     }));
/// ```

use axum::{
    async_trait,
    extract::{FromRequestParts, Request},
    http::{header, request::Parts, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use super::authorization::{require_authenticated, AuthzError};
use super::jwt::{validate_token, Claims, JwtError};
use crate::models::user::Role;

/// Verified caller identity attached to request extensions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: Uuid,

    /// Role inside the tenant
    pub role: Role,

    /// Tenant the caller belongs to
    pub tenant_id: Uuid,

    /// Slug of that tenant
    pub tenant_slug: String,
}

impl AuthContext {
    /// Creates auth context from verified JWT claims
    pub fn from_claims(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id,
            role: claims.role,
            tenant_id: claims.tenant_id,
            tenant_slug: claims.tenant_slug,
        }
    }
}

/// Error type for authentication middleware
#[derive(Debug)]
pub enum AuthError {
    /// Missing authorization header
    MissingCredentials,

    /// Authorization header is not a Bearer token
    InvalidFormat(String),

    /// Token validation failed
    InvalidToken(String),
}

impl AuthError {
    fn message(&self) -> String {
        match self {
            AuthError::MissingCredentials => "Authentication failed: No token provided.".to_string(),
            AuthError::InvalidFormat(msg) | AuthError::InvalidToken(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": "unauthorized",
            "message": self.message(),
        }));

        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .ok_or_else(|| AuthError::InvalidFormat("Authentication failed: Expected Bearer token.".to_string()))?;

    if token.is_empty() {
        return Err(AuthError::MissingCredentials);
    }

    Ok(token)
}

/// JWT authentication middleware
///
/// Returns 401 if the header is missing, is not a Bearer token, or the
/// token fails validation (bad signature, wrong issuer, expired).
pub async fn jwt_auth_middleware(
    secret: String,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = bearer_token(req.headers())?;

    let claims = validate_token(token, &secret).map_err(|e| {
        debug!(error = %e, "Rejected bearer token");
        match e {
            JwtError::Expired => AuthError::InvalidToken("Authentication failed: Token expired.".to_string()),
            _ => AuthError::InvalidToken("Authentication failed: Invalid token.".to_string()),
        }
    })?;

    req.extensions_mut().insert(AuthContext::from_claims(claims));

    Ok(next.run(req).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        require_authenticated(parts.extensions.get::<AuthContext>())
            .cloned()
            .map_err(|_: AuthzError| AuthError::MissingCredentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::Identity;
    use axum::http::HeaderValue;
    use chrono::Duration;

    #[test]
    fn test_auth_context_from_claims() {
        let identity = Identity {
            user_id: Uuid::new_v4(),
            role: Role::Admin,
            tenant_id: Uuid::new_v4(),
            tenant_slug: "acme".to_string(),
        };

        let context = AuthContext::from_claims(Claims::new(&identity, Duration::hours(1)));

        assert_eq!(context.user_id, identity.user_id);
        assert_eq!(context.tenant_id, identity.tenant_id);
        assert_eq!(context.tenant_slug, "acme");
        assert_eq!(context.role, Role::Admin);
    }

    #[test]
    fn test_bearer_token() {
        let mut headers = HeaderMap::new();
        assert!(matches!(bearer_token(&headers), Err(AuthError::MissingCredentials)));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert!(matches!(bearer_token(&headers), Err(AuthError::InvalidFormat(_))));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert!(matches!(bearer_token(&headers), Err(AuthError::MissingCredentials)));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_auth_error_is_always_unauthorized() {
        let errors = [
            AuthError::MissingCredentials,
            AuthError::InvalidFormat("x".to_string()),
            AuthError::InvalidToken("y".to_string()),
        ];

        for err in errors {
            assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[tokio::test]
    async fn test_extractor_rejects_missing_context() {
        let (mut parts, _) = axum::http::Request::new(()).into_parts();
        let result = AuthContext::from_request_parts(&mut parts, &()).await;
        assert!(result.is_err());
    }
}
