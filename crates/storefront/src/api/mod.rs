//! Client for the Meada product and order API.
//!
//! The backend is a plain JSON-over-HTTP service; this module wraps it with
//! typed endpoint methods and a small set of HTTP verbs. All wire names are
//! the backend's Portuguese field names, mapped to English struct fields via
//! serde renames.

mod client;
pub mod types;

pub use client::{ApiClient, ApiError};
