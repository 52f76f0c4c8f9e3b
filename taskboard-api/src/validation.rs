/// Request extraction and validation helpers
///
/// `ApiJson` and `ApiQuery` wrap axum's extractors so that a malformed body
/// or query string becomes an `ApiError` with the usual JSON error body
/// instead of axum's plain-text rejection.

use axum::extract::{FromRequest, FromRequestParts};
use uuid::Uuid;
use validator::Validate;

use crate::error::{ApiError, ApiResult};

/// JSON body extractor with `ApiError` rejections
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Query string extractor with `ApiError` rejections
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

/// Runs `validator` rules on a request body
pub fn validate<T: Validate>(value: &T) -> ApiResult<()> {
    value.validate().map_err(ApiError::from)
}

/// Parses a path or body identifier, naming `field` in the error
pub fn parse_id(field: &str, value: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(value.trim())
        .map_err(|_| ApiError::BadRequest(format!("Invalid {}: '{}' is not a valid id", field, value)))
}

/// Like [`parse_id`] but reports a field validation error
pub fn parse_id_field(field: &str, value: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(value.trim())
        .map_err(|_| ApiError::invalid_field(field, format!("{} must be a valid id", field)))
}

/// Lower-cases and trims an email address
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
