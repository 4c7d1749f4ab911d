//! Address book with the single-default-shipping rule.
//!
//! Invariant: at most one address in a user's book has
//! `is_default_shipping_address` set at any time. The flag is only ever
//! changed through [`AddressBook`] so the invariant holds after every
//! operation, and each operation maps to a single document write by the
//! caller.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced by address book operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    /// The requested index does not address an entry in the book.
    #[error("invalid address index: {0}")]
    InvalidIndex(i64),
}

/// A shipping address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub first_name: String,
    pub last_name: String,
    pub address_line1: String,
    #[serde(default)]
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub phone_number: String,
    #[serde(default)]
    pub is_default_shipping_address: bool,
}

/// A user's addresses, addressed by position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AddressBook {
    addresses: Vec<Address>,
}

impl AddressBook {
    /// The addresses, in insertion order.
    #[must_use]
    pub fn addresses(&self) -> &[Address] {
        &self.addresses
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    /// The current default shipping address, if any.
    #[must_use]
    pub fn default_shipping(&self) -> Option<&Address> {
        self.addresses
            .iter()
            .find(|addr| addr.is_default_shipping_address)
    }

    fn checked_index(&self, index: i64) -> Result<usize, AddressError> {
        let idx = usize::try_from(index).map_err(|_| AddressError::InvalidIndex(index))?;
        if idx >= self.addresses.len() {
            return Err(AddressError::InvalidIndex(index));
        }
        Ok(idx)
    }

    /// Add an address to the book.
    ///
    /// The first address added becomes the default shipping address
    /// regardless of the flag on the input; later additions never steal the
    /// default.
    pub fn add(&mut self, mut address: Address) {
        address.is_default_shipping_address = self.addresses.is_empty();
        self.addresses.push(address);
    }

    /// Make the address at `index` the default shipping address.
    ///
    /// Clears the flag on every entry before setting the target, so the
    /// single-default invariant holds even if stored data was inconsistent.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::InvalidIndex`] if `index` is out of range.
    pub fn set_default(&mut self, index: i64) -> Result<(), AddressError> {
        let idx = self.checked_index(index)?;
        for address in &mut self.addresses {
            address.is_default_shipping_address = false;
        }
        if let Some(address) = self.addresses.get_mut(idx) {
            address.is_default_shipping_address = true;
        }
        Ok(())
    }

    /// Delete the address at `index`.
    ///
    /// If the deleted address was the default and other addresses remain, the
    /// first remaining address becomes the new default.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::InvalidIndex`] if `index` is out of range.
    pub fn delete(&mut self, index: i64) -> Result<(), AddressError> {
        let idx = self.checked_index(index)?;
        let was_default = self.addresses.remove(idx).is_default_shipping_address;
        if was_default && let Some(first) = self.addresses.first_mut() {
            first.is_default_shipping_address = true;
        }
        Ok(())
    }
}
