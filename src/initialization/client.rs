//! HTTP client initialization.
//!
//! This module provides functions to initialize HTTP clients with proper
//! configuration for header fetches and RDAP queries.

use std::sync::Arc;
use std::time::Duration;

use reqwest::ClientBuilder;

use crate::config::{Config, MAX_REDIRECT_HOPS};

/// Initializes the HTTP client used for the header fetch.
///
/// Creates a `reqwest::Client` configured with:
/// - User-Agent header from config
/// - Timeout from config
/// - Redirect following enabled (up to 10 hops)
/// - Rustls TLS backend
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_client(config: &Config) -> Result<Arc<reqwest::Client>, reqwest::Error> {
    let client = ClientBuilder::new()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(config.user_agent.clone())
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECT_HOPS))
        .build()?;
    Ok(Arc::new(client))
}

/// Initializes the HTTP client used for RDAP and bootstrap queries.
///
/// RDAP endpoints serve JSON and sometimes redirect across registries, so
/// this client follows redirects but identifies itself plainly.
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_rdap_client(config: &Config) -> Result<Arc<reqwest::Client>, reqwest::Error> {
    let client = ClientBuilder::new()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(config.user_agent.clone())
        .build()?;
    Ok(Arc::new(client))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_client() {
        let config = Config::default();
        assert!(init_client(&config).is_ok());
    }

    #[test]
    fn test_init_rdap_client() {
        let config = Config::default();
        assert!(init_rdap_client(&config).is_ok());
    }
}
