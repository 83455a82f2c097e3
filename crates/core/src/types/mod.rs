//! Core types for the Meada storefront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cep;
pub mod email;
pub mod id;
pub mod payment;
pub mod price;

pub use cep::{Cep, CepError};
pub use email::{Email, EmailError};
pub use id::*;
pub use payment::PaymentMethod;
pub use price::{CurrencyCode, Price};
