//! # Taskify Shared Library
//!
//! This crate contains the data access layer, domain service, and shared
//! types used by the Taskify API server.
//!
//! ## Module Organization
//!
//! - `models`: Database entities and their write models
//! - `db`: Connection pool, migrations, generic repository, and seeding
//! - `service`: Todo and category business logic
//! - `auth`: Password hashing and JWT utilities
//! - `error`: Domain error types

pub mod auth;
pub mod db;
pub mod error;
pub mod models;
pub mod service;

/// Current version of the Taskify shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
