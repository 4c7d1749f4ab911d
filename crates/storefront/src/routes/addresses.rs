//! Address book route handlers.
//!
//! The single-default-shipping invariant is enforced by
//! `juniper_core::address::AddressBook`; handlers load the book, apply one
//! operation, and write the whole document back in a single row update.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use juniper_core::address::{Address, AddressBook};

use crate::db::UserStore;
use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// Response wrapper for every address endpoint.
#[derive(Debug, Serialize)]
pub struct AddressesResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub addresses: Vec<Address>,
}

impl AddressesResponse {
    fn new(message: Option<&'static str>, book: AddressBook) -> Self {
        Self {
            message,
            addresses: book.addresses().to_vec(),
        }
    }
}

/// Add address request body.
#[derive(Debug, Deserialize)]
pub struct AddAddressBody {
    pub address: Address,
}

/// Index-addressed request body (set default, delete).
#[derive(Debug, Deserialize)]
pub struct AddressIndexBody {
    pub index: i64,
}

/// List the user's addresses.
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<AddressesResponse>> {
    let store = UserStore::new(state.pool());
    let book = store.load_addresses(user.id).await?;

    Ok(Json(AddressesResponse::new(None, book)))
}

/// Add an address. The first address added becomes the default.
#[instrument(skip(state, body), fields(user_id = %user.id))]
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<AddAddressBody>,
) -> Result<Json<AddressesResponse>> {
    let store = UserStore::new(state.pool());
    let mut book = store.load_addresses(user.id).await?;

    book.add(body.address);
    store.save_addresses(user.id, &book).await?;

    Ok(Json(AddressesResponse::new(Some("Address added"), book)))
}

/// Make the address at `index` the default shipping address.
#[instrument(skip(state), fields(user_id = %user.id, index = body.index))]
pub async fn make_default(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<AddressIndexBody>,
) -> Result<Json<AddressesResponse>> {
    let store = UserStore::new(state.pool());
    let mut book = store.load_addresses(user.id).await?;

    book.set_default(body.index)?;
    store.save_addresses(user.id, &book).await?;

    Ok(Json(AddressesResponse::new(
        Some("Default shipping address updated"),
        book,
    )))
}

/// Delete the address at `index`.
///
/// If the deleted address was the default, the first remaining address
/// becomes the new default.
#[instrument(skip(state), fields(user_id = %user.id, index = body.index))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<AddressIndexBody>,
) -> Result<Json<AddressesResponse>> {
    let store = UserStore::new(state.pool());
    let mut book = store.load_addresses(user.id).await?;

    book.delete(body.index)?;
    store.save_addresses(user.id, &book).await?;

    Ok(Json(AddressesResponse::new(Some("Address deleted"), book)))
}
