//! # Croft Infrastructure
//!
//! Concrete implementations of the ports defined in `croft-core`.
//!
//! ## Feature Flags
//!
//! - `postgres` (default) - PostgreSQL aggregate store via SeaORM
//! - `minimal` - no external dependencies, in-memory store only

pub mod database;

pub use database::{DatabaseConfig, InMemoryPostRepository};

#[cfg(feature = "postgres")]
pub use database::PostgresPostRepository;
