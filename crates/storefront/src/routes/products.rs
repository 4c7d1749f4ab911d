//! Product catalog route handlers.
//!
//! The catalog is public and read-only: no session required, and the
//! documents go out exactly as stored. The frontend picks the fields it
//! renders (title, price, images, reviews, ...) straight off the document.

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::Value;
use tracing::instrument;

use crate::db::ProductCatalog;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// List the whole catalog.
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Value>>> {
    let catalog = ProductCatalog::new(state.pool());
    Ok(Json(catalog.list().await?))
}

/// Fetch one product by its catalog ID.
///
/// The path segment is matched against the numeric catalog ID; anything
/// that is not a known ID, numeric or otherwise, is a plain 404.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Value>> {
    let catalog = ProductCatalog::new(state.pool());
    let document = match parse_catalog_id(&id) {
        Some(id) => catalog.find(id).await?,
        None => None,
    };
    document
        .map(Json)
        .ok_or(AppError::NotFound("Product not found"))
}

fn parse_catalog_id(raw: &str) -> Option<i32> {
    raw.parse().ok()
}
