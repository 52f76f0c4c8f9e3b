/// Bearer token authentication for protected routes
///
/// Resolves the request's token to a user through
/// `taskboard_shared::auth::middleware::authenticate` and inserts the
/// resulting `AuthContext` into the request extensions. Handlers behind this
/// layer extract it with `Extension<AuthContext>`.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use taskboard_shared::auth::middleware::authenticate;

use crate::{app::AppState, error::ApiError};

/// Rejects unauthenticated requests with 401
pub async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_context = authenticate(state.store.as_ref(), &state.tokens, req.headers())
        .await
        .map_err(|err| {
            tracing::debug!(error = %err, path = %req.uri().path(), "Authentication failed");
            ApiError::from(err)
        })?;

    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}
