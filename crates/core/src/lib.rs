//! Meada Core - Shared types library.
//!
//! This crate provides the domain types shared across the Meada storefront:
//! product and order identifiers, money, Brazilian postal codes, e-mail
//! addresses and payment methods.
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps
//! it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, postal codes and
//!   payment methods

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
