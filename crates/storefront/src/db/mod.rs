//! Database operations for storefront `PostgreSQL`.
//!
//! # Database: `jm_storefront`
//!
//! The user row is the unit of persistence: cart, address book, and order
//! history live as JSONB documents on the `users` table and each save is a
//! single-column `UPDATE` of one row. Concurrent mutations of the same cart
//! are last-write-wins; there is no optimistic or pessimistic locking beyond
//! the atomicity of the single-row write.
//!
//! ## Tables
//!
//! - `users` - Account row with `cart`, `addresses`, and `orders` documents
//! - `products` - Read-only catalog documents, keyed by catalog ID
//! - `sessions` - Tower-sessions storage
//!
//! # Migrations
//!
//! Migrations are embedded from `crates/storefront/migrations/` and run at
//! startup via `sqlx::migrate!`.

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub mod products;
pub mod users;

pub use products::ProductCatalog;
pub use users::UserStore;

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The query itself failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The addressed user row does not exist.
    #[error("user not found")]
    NotFound,

    /// A stored document failed to deserialize.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
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
