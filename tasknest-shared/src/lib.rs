//! # TaskNest Shared Library
//!
//! Domain types and business logic shared by the TaskNest services.
//!
//! ## Module Organization
//!
//! - `models`: User and Task models with their write operations
//! - `auth`: Password hashing, sign-in/sign-out flows, session seam
//! - `store`: Repository traits with Postgres and in-memory implementations
//! - `validate`: Ordered field-level validation errors
//! - `flash`: One-shot notices carried across redirects
//! - `db`: Connection pool and migrations

pub mod auth;
pub mod db;
pub mod flash;
pub mod models;
pub mod store;
pub mod validate;

/// Current version of the TaskNest shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
