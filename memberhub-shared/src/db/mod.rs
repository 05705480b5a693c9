//! Database layer
//!
//! - `pool`: PostgreSQL connection pool with a startup health check
//! - `migrations`: embedded schema migrations
//!
//! Queries for each table live with their model in [`crate::models`].

pub mod migrations;
pub mod pool;
