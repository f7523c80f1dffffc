//! Domain extraction utilities.
//!
//! This module extracts registrable domains from hostnames using the Public
//! Suffix List (PSL), so registration lookups and brand checks operate on
//! `example.co.uk` rather than `login.example.co.uk`.

use anyhow::{Context, Result};
use tldextract::TldExtractor;

/// Extracts the registrable domain from a hostname.
///
/// # Errors
///
/// Returns an error for IP addresses (they have no registrable domain) and
/// for hostnames the extractor cannot split into domain and suffix.
///
/// Uses `tldextract` so both simple TLDs ("example.com") and multi-part
/// TLDs ("example.co.uk") resolve correctly.
pub fn registrable_domain(extractor: &TldExtractor, host: &str) -> Result<String> {
    if host.parse::<std::net::IpAddr>().is_ok() {
        return Err(anyhow::anyhow!(
            "IP addresses do not have registrable domains: {}",
            host
        ));
    }

    let result = extractor
        .extract(host)
        .with_context(|| format!("Failed to extract domain from host: {}", host))?;

    match (result.domain, result.suffix) {
        (Some(domain), Some(suffix)) => Ok(format!("{}.{}", domain, suffix)),
        (Some(domain), None) => Ok(domain),
        (None, Some(suffix)) => Ok(suffix),
        (None, None) => Err(anyhow::anyhow!("No domain or suffix found in: {}", host)),
    }
}

/// The base label of a hostname's registrable domain ("example" for
/// "login.example.co.uk"). Falls back to the leftmost-but-one label when
/// PSL extraction fails.
pub fn base_label(extractor: &TldExtractor, host: &str) -> Option<String> {
    match extractor.extract(host) {
        Ok(result) => result.domain,
        Err(_) => {
            let labels: Vec<&str> = host.split('.').filter(|l| !l.is_empty()).collect();
            if labels.len() >= 2 {
                Some(labels[labels.len() - 2].to_string())
            } else {
                None
            }
        }
    }
}
