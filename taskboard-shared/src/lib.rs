//! # Taskboard Shared Library
//!
//! Domain types, persistence and auth primitives used by the Taskboard API
//! server.
//!
//! ## Module Organization
//!
//! - `models`: Users, projects, tasks and comments with their SQL
//! - `db`: The `Store` trait with PostgreSQL and in-memory backends
//! - `auth`: Passwords, bearer tokens, request authentication and the role policy

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the Taskboard shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
