/// Request authentication
///
/// Turns the `Authorization: Bearer <token>` header of a request into an
/// [`AuthContext`] holding the caller's user record. The API server runs
/// [`authenticate`] in a middleware layer and puts the context into the
/// request extensions for handlers to extract.
///
/// Every failure here means "unauthenticated" to the client:
/// - no `Authorization` header, or a scheme other than `Bearer`
/// - bad signature, wrong issuer, malformed or expired token
/// - valid token for a user that no longer exists
///
/// # Example
///
/// ```
/// use axum::Extension;
/// use taskboard_shared::auth::middleware::AuthContext;
///
/// async fn handler(Extension(auth): Extension<AuthContext>) -> String {
///     format!("Hello, {}!", auth.user.fullname)
/// }
/// ```

use axum::http::{header, HeaderMap};
use uuid::Uuid;

use super::authorization::Principal;
use super::jwt::{JwtError, TokenService};
use crate::db::store::Store;
use crate::models::user::{Role, User};

/// Authenticated caller, valid for one request
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Record the token resolved to
    pub user: User,
}

impl AuthContext {
    pub fn new(user: User) -> Self {
        Self { user }
    }

    pub fn user_id(&self) -> Uuid {
        self.user.id
    }

    pub fn role(&self) -> Role {
        self.user.role
    }

    /// Identity for authorization decisions
    pub fn principal(&self) -> Principal {
        Principal {
            user_id: self.user.id,
            role: self.user.role,
        }
    }
}

/// Error type for authentication
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No Authorization header
    #[error("Missing credentials")]
    MissingCredentials,

    /// Authorization header present but not `Bearer <token>`
    #[error("Invalid authorization header: {0}")]
    InvalidFormat(String),

    /// Token rejected by the token service
    #[error("Invalid token: {0}")]
    InvalidToken(#[from] JwtError),

    /// Token is valid but its subject doesn't exist
    #[error("User no longer exists")]
    UnknownUser,

    /// Store lookup failed
    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// Extracts the token from an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingCredentials)?
        .to_str()
        .map_err(|_| AuthError::InvalidFormat("Header is not valid ASCII".to_string()))?;

    let token = value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?;

    if token.is_empty() {
        return Err(AuthError::InvalidFormat("Empty bearer token".to_string()));
    }

    Ok(token)
}

/// Verifies the bearer token of a request and loads its user
pub async fn authenticate(
    store: &dyn Store,
    tokens: &TokenService,
    headers: &HeaderMap,
) -> Result<AuthContext, AuthError> {
    let token = bearer_token(headers)?;
    let claims = tokens.verify(token)?;

    let user = store
        .find_user_by_id(claims.sub)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?
        .ok_or(AuthError::UnknownUser)?;

    tracing::debug!(user_id = %user.id, role = user.role.as_str(), "Authenticated request");

    Ok(AuthContext::new(user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryStore;
    use crate::models::user::CreateUser;
    use axum::http::HeaderValue;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(&headers_with("Bearer abc.def")).unwrap(), "abc.def");

        assert!(matches!(
            bearer_token(&HeaderMap::new()),
            Err(AuthError::MissingCredentials)
        ));
        assert!(matches!(
            bearer_token(&headers_with("Basic dXNlcjpwYXNz")),
            Err(AuthError::InvalidFormat(_))
        ));
        assert!(matches!(
            bearer_token(&headers_with("Bearer ")),
            Err(AuthError::InvalidFormat(_))
        ));
    }

    #[tokio::test]
    async fn test_authenticate_resolves_user() {
        let store = MemoryStore::new();
        let tokens = TokenService::new(SECRET);
        let user = store
            .create_user(CreateUser {
                fullname: "Grace Hopper".to_string(),
                email: "grace@example.com".to_string(),
                password_hash: "hash".to_string(),
                role: Role::Admin,
            })
            .await
            .unwrap();

        let token = tokens.issue(user.id).unwrap();
        let auth = authenticate(&store, &tokens, &headers_with(&format!("Bearer {}", token)))
            .await
            .unwrap();

        assert_eq!(auth.user_id(), user.id);
        assert_eq!(auth.role(), Role::Admin);
        assert_eq!(auth.principal().user_id, user.id);
    }

    #[tokio::test]
    async fn test_authenticate_unknown_user() {
        let store = MemoryStore::new();
        let tokens = TokenService::new(SECRET);
        let token = tokens.issue(Uuid::new_v4()).unwrap();

        let result = authenticate(&store, &tokens, &headers_with(&format!("Bearer {}", token))).await;
        assert!(matches!(result, Err(AuthError::UnknownUser)));
    }

    #[tokio::test]
    async fn test_authenticate_bad_signature() {
        let store = MemoryStore::new();
        let token = TokenService::new("another-secret-key-at-least-32-bytes")
            .issue(Uuid::new_v4())
            .unwrap();

        let result = authenticate(
            &store,
            &TokenService::new(SECRET),
            &headers_with(&format!("Bearer {}", token)),
        )
        .await;
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }
}
