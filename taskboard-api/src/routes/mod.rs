/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Registration, login and user lookups
/// - `projects`: Projects and their task listings
/// - `tasks`: Tasks and their comments

pub mod auth;
pub mod health;
pub mod projects;
pub mod tasks;
