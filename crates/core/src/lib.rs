//! Juniper Core - Shared types and business logic library.
//!
//! This crate provides the types and pure business rules used across all
//! Juniper Market components:
//! - `storefront` - Public-facing REST API backend
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no database
//! access, no HTTP clients. Every operation here is synchronous, request-scoped
//! compute: the caller loads state, invokes the logic, and persists the result.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and money helpers
//! - [`cart`] - The cart ledger: line pricing and whole-cart aggregation
//! - [`order`] - Frozen order snapshots and order history
//! - [`address`] - Address book with the single-default-shipping rule

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod address;
pub mod cart;
pub mod order;
pub mod types;

pub use types::*;
