//! Initialization module.
//!
//! Process-level setup: logger, HTTP clients, and the rustls crypto provider.

mod client;
mod logger;

pub use client::{init_client, init_rdap_client};
pub use logger::init_logger_with;

/// Installs the process-wide rustls crypto provider.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_crypto_provider() {
    if rustls::crypto::CryptoProvider::get_default().is_none() {
        let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();
    }
}
