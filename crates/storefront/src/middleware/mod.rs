//! HTTP middleware stack for the storefront.
//!
//! # Middleware order (outermost first in the Router)
//!
//! 1. Sentry layers (error capture and performance)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (correlate logs, Sentry events and responses)

pub mod request_id;

pub use request_id::request_id_middleware;
