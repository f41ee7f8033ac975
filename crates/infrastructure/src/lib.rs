//! PostgreSQL adapters for the repository traits.

pub mod repository;

pub use repository::{create_pg_pool, PgMessageRepository, PgParticipantRepository};
