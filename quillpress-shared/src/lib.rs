//! # Quillpress Shared Library
//!
//! Domain types and business logic for the Quillpress publishing service,
//! used by the API server and its integration tests.
//!
//! ## Module Organization
//!
//! - `db`: Connection pool and embedded migrations
//! - `models`: Users, articles, tags and the article write transaction
//! - `auth`: Password hashing, JWT tokens, request auth context, ownership checks
//! - `ai`: Text-generation client behind the AI proxy endpoints

pub mod ai;
pub mod auth;
pub mod db;
pub mod models;

/// Current version of the Quillpress shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
