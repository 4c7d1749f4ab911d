//! User repository for document load/save.
//!
//! Queries are built with runtime-checked `sqlx::query_scalar`/`sqlx::query`
//! rather than the compile-time macros so the crate builds without a live
//! database. Column names are fixed strings owned by this module; user input
//! is only ever bound as parameters.

use serde::Serialize;
use serde::de::DeserializeOwned;
use sqlx::PgPool;
use sqlx::types::Json;

use juniper_core::UserId;
use juniper_core::address::AddressBook;
use juniper_core::cart::Cart;
use juniper_core::order::OrderHistory;

use super::RepositoryError;

/// Repository for user document operations.
pub struct UserStore<'a> {
    pool: &'a PgPool,
}

impl<'a> UserStore<'a> {
    /// Create a new user store.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Load a document column for a user.
    ///
    /// Returns `NotFound` if the user row doesn't exist and `DataCorruption`
    /// if the stored JSONB doesn't match the expected shape.
    async fn load_document<T: DeserializeOwned>(
        &self,
        sql: &str,
        column: &str,
        user_id: UserId,
    ) -> Result<T, RepositoryError> {
        let value: Option<serde_json::Value> = sqlx::query_scalar(sql)
            .bind(user_id)
            .fetch_optional(self.pool)
            .await?;

        let value = value.ok_or(RepositoryError::NotFound)?;
        serde_json::from_value(value).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid {column} document: {e}"))
        })
    }

    /// Save a document column for a user as a single-row write.
    async fn save_document<T: Serialize + Sync>(
        &self,
        sql: &str,
        user_id: UserId,
        document: &T,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(sql)
            .bind(Json(document))
            .bind(user_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Load the user's cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist,
    /// `RepositoryError::DataCorruption` if the stored cart is invalid.
    pub async fn load_cart(&self, user_id: UserId) -> Result<Cart, RepositoryError> {
        self.load_document("SELECT cart FROM users WHERE id = $1", "cart", user_id)
            .await
    }

    /// Persist the user's cart, replacing the stored document.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    pub async fn save_cart(&self, user_id: UserId, cart: &Cart) -> Result<(), RepositoryError> {
        self.save_document(
            "UPDATE users SET cart = $1, updated_at = now() WHERE id = $2",
            user_id,
            cart,
        )
        .await
    }

    /// Load the user's address book.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist,
    /// `RepositoryError::DataCorruption` if the stored book is invalid.
    pub async fn load_addresses(&self, user_id: UserId) -> Result<AddressBook, RepositoryError> {
        self.load_document(
            "SELECT addresses FROM users WHERE id = $1",
            "addresses",
            user_id,
        )
        .await
    }

    /// Persist the user's address book, replacing the stored document.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    pub async fn save_addresses(
        &self,
        user_id: UserId,
        addresses: &AddressBook,
    ) -> Result<(), RepositoryError> {
        self.save_document(
            "UPDATE users SET addresses = $1, updated_at = now() WHERE id = $2",
            user_id,
            addresses,
        )
        .await
    }

    /// Load the user's order history.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist,
    /// `RepositoryError::DataCorruption` if the stored history is invalid.
    pub async fn load_orders(&self, user_id: UserId) -> Result<OrderHistory, RepositoryError> {
        self.load_document("SELECT orders FROM users WHERE id = $1", "orders", user_id)
            .await
    }

    /// Persist the user's order history, replacing the stored document.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    pub async fn save_orders(
        &self,
        user_id: UserId,
        orders: &OrderHistory,
    ) -> Result<(), RepositoryError> {
        self.save_document(
            "UPDATE users SET orders = $1, updated_at = now() WHERE id = $2",
            user_id,
            orders,
        )
        .await
    }
}
