//! # Core Library
//!
//! Configuration, error types, domain model, and store contracts for the
//! authentication subsystem. The SQLite repositories here are reference
//! implementations of the contracts; services may substitute their own.

pub mod config;
pub mod error;
pub mod model;

// Re-export commonly used types
pub use config::Config;
pub use error::{CoreError, Result};
pub use model::store::{create_pool, DbPool};
