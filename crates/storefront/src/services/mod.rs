//! Clients for third-party services.

pub mod cep;
