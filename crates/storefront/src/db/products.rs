//! Read-only product catalog repository.
//!
//! Catalog rows are imported out of band; this module only reads them back
//! as the raw JSONB documents the frontend renders. Nothing in the cart or
//! order paths depends on this table.

use sqlx::PgPool;

use super::RepositoryError;

/// Repository for catalog reads.
pub struct ProductCatalog<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductCatalog<'a> {
    /// Create a new catalog reader.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All catalog documents, in catalog ID order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<serde_json::Value>, RepositoryError> {
        let documents = sqlx::query_scalar("SELECT document FROM products ORDER BY id")
            .fetch_all(self.pool)
            .await?;
        Ok(documents)
    }

    /// One catalog document by its numeric catalog ID, if present.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find(&self, id: i32) -> Result<Option<serde_json::Value>, RepositoryError> {
        let document = sqlx::query_scalar("SELECT document FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(document)
    }
}
