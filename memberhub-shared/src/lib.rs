//! # MemberHub Shared Library
//!
//! Data model, persistence, and validation used by the MemberHub API server.
//!
//! ## Module Organization
//!
//! - `db`: connection pool and migrations
//! - `models`: members and memberships, with their sqlx queries
//! - `pagination`: page/pageSize/sortBy/order resolution for listings
//! - `repository`: data-access traits plus PostgreSQL and in-memory stores
//! - `validation`: membership date parsing and sort-field allow-lists

pub mod db;
pub mod models;
pub mod pagination;
pub mod repository;
pub mod validation;

/// Current version of the MemberHub shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
