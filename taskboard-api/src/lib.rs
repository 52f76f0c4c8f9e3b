//! # Taskboard API Server Library
//!
//! HTTP layer of the Taskboard project-and-task tracker.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `middleware`: Authentication and security headers
//! - `routes`: API route handlers
//! - `validation`: Request extractors and input helpers

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod validation;
