//! Process-local adapters for the persistence ports.
//!
//! Used when no database URL is configured and by the HTTP tests. They honour
//! the same constraints as the PostgreSQL schema (unique username and email,
//! prediction records must reference an existing user) but lose everything
//! on restart.

mod prediction_repository;
mod user_repository;

pub use prediction_repository::InMemoryPredictionRepository;
pub use user_repository::InMemoryUserRepository;
