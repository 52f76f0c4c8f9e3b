/// Middleware for the API server
///
/// - `auth`: Bearer token authentication for protected routes
/// - `security`: Security headers on every response

pub mod auth;
pub mod security;
