//! Post store adapters and connection management.

mod connections;
mod memory_repo;

#[cfg(feature = "postgres")]
pub mod entity;
#[cfg(feature = "postgres")]
pub mod postgres_repo;
#[cfg(feature = "postgres")]
mod schema;

pub use connections::DatabaseConfig;
pub use memory_repo::InMemoryPostRepository;

#[cfg(feature = "postgres")]
pub use connections::connect;
#[cfg(feature = "postgres")]
pub use postgres_repo::PostgresPostRepository;
#[cfg(feature = "postgres")]
pub use schema::ensure_schema;

#[cfg(feature = "postgres")]
#[cfg(test)]
mod tests;
