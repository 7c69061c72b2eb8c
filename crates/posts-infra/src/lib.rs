//! # Posts Infrastructure
//!
//! Concrete implementations of the ports defined in `posts-core`.
//!
//! ## Feature Flags
//!
//! - `postgres` (default) - PostgreSQL store via SeaORM
//! - `minimal` - In-memory store only

pub mod database;
pub mod seed;

pub use database::{DatabaseConfig, InMemoryPostRepository};
pub use seed::{SeedError, SeedOutcome, seed_from_file};

#[cfg(feature = "postgres")]
pub use database::PostgresPostRepository;
