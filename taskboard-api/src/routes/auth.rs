/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /auth/register` - Register a new user (public)
/// - `POST /auth/login` - Exchange credentials for a token (public)
/// - `GET /auth/users` - List every user (admin)
/// - `GET /auth/me` - The calling user
///
/// Register and login answer with the token in the body and also set it as
/// an HTTP-only `token` cookie. Only the `Authorization: Bearer` header is
/// accepted on later requests.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    validation::{normalize_email, validate, ApiJson},
};
use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use taskboard_shared::{
    auth::{
        authorization::{authorize, Action},
        middleware::AuthContext,
        password,
    },
    models::user::{CreateUser, Role, User},
};
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name
    #[validate(length(min = 3, max = 255, message = "Fullname must be 3 to 255 characters"))]
    pub fullname: String,

    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    /// Defaults to `user`
    #[serde(default)]
    pub role: Option<Role>,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Register and login response
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub message: String,

    /// Bearer token
    pub token: String,
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /auth/register
/// Content-Type: application/json
///
/// {
///   "fullname": "Ada Lovelace",
///   "email": "ada@example.com",
///   "password": "secret123",
///   "role": "admin"
/// }
/// ```
///
/// # Response
///
/// `201 Created` with `Set-Cookie: token=...`
///
/// ```json
/// { "message": "User registered successfully.", "token": "eyJ..." }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed, or the email is already registered
pub async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> ApiResult<(StatusCode, HeaderMap, Json<TokenResponse>)> {
    validate(&req)?;

    let email = normalize_email(&req.email);

    if state.store.find_user_by_email(&email).await?.is_some() {
        return Err(ApiError::Conflict("User already exists".to_string()));
    }

    let password_hash = password::hash_password(&req.password)?;

    // The unique constraint still guards against a concurrent registration
    let user = state
        .store
        .create_user(CreateUser {
            fullname: req.fullname.trim().to_string(),
            email,
            password_hash,
            role: req.role.unwrap_or_default(),
        })
        .await?;

    tracing::info!(user_id = %user.id, role = user.role.as_str(), "User registered");

    token_response(&state, &user, "User registered successfully.")
}

/// Login with email and password
///
/// # Endpoint
///
/// ```text
/// POST /auth/login
/// Content-Type: application/json
///
/// { "email": "ada@example.com", "password": "secret123" }
/// ```
///
/// # Response
///
/// `201 Created` with `Set-Cookie: token=...`
///
/// ```json
/// { "message": "User logged in successfully.", "token": "eyJ..." }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `401 Unauthorized`: Unknown email or wrong password
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<(StatusCode, HeaderMap, Json<TokenResponse>)> {
    validate(&req)?;

    let email = normalize_email(&req.email);
    let invalid = || ApiError::Unauthorized("Invalid email or password".to_string());

    let user = match state.store.find_user_by_email(&email).await? {
        Some(user) => user,
        None => {
            tracing::debug!("Login attempt for unknown email");
            return Err(invalid());
        }
    };

    if !password::verify_password(&req.password, &user.password_hash)? {
        tracing::warn!(user_id = %user.id, "Login failed: wrong password");
        return Err(invalid());
    }

    tracing::info!(user_id = %user.id, "User logged in");

    token_response(&state, &user, "User logged in successfully.")
}

/// List all users (admin only)
///
/// ```text
/// GET /auth/users
/// Authorization: Bearer <token>
/// ```
///
/// Returns users oldest first. Password hashes are never serialized.
pub async fn list_users(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<User>>> {
    authorize(&auth.principal(), Action::ListUsers).map_err(|e| {
        tracing::warn!(user_id = %auth.user_id(), "Denied listing users");
        ApiError::from(e)
    })?;

    Ok(Json(state.store.list_users().await?))
}

/// The authenticated user
///
/// ```text
/// GET /auth/me
/// Authorization: Bearer <token>
/// ```
pub async fn me(Extension(auth): Extension<AuthContext>) -> Json<User> {
    Json(auth.user)
}

fn token_response(
    state: &AppState,
    user: &User,
    message: &str,
) -> ApiResult<(StatusCode, HeaderMap, Json<TokenResponse>)> {
    let token = state.tokens.issue(user.id)?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        token_cookie(&token, state.tokens.ttl().num_seconds(), state.config.api.production)?,
    );

    Ok((
        StatusCode::CREATED,
        headers,
        Json(TokenResponse {
            message: message.to_string(),
            token,
        }),
    ))
}

/// Builds the `Set-Cookie` value carrying a token
pub fn token_cookie(token: &str, max_age_seconds: i64, secure: bool) -> ApiResult<HeaderValue> {
    let mut cookie = format!(
        "token={}; HttpOnly; SameSite=Strict; Path=/; Max-Age={}",
        token, max_age_seconds
    );
    if secure {
        cookie.push_str("; Secure");
    }

    HeaderValue::from_str(&cookie)
        .map_err(|e| ApiError::InternalError(format!("Invalid cookie header: {}", e)))
}
