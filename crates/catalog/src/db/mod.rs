//! Database operations for the catalog `PostgreSQL` store.
//!
//! ## Tables
//!
//! - `makes` - Vehicle makes, each owning a collection of cars
//! - `cars` - Cars referencing exactly one make
//! - `users` - Site authentication (password hashes, never plaintext)
//!
//! All default queries filter soft-deleted rows (`deleted_at IS NULL`);
//! deletes only stamp `deleted_at`, nothing is physically removed.
//!
//! Migrations are embedded from `crates/catalog/migrations/` and run at
//! startup via `sqlx::migrate!`.

pub mod cars;
pub mod makes;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use cars::CarRepository;
pub use makes::MakeRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
