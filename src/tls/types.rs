//! Certificate inspection data structures.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Everything learned about a host's TLS deployment.
///
/// The record is structurally complete from the moment it is created: every
/// field exists with a default, and inspection fills in what it can. Callers
/// never need to distinguish "checker did not run" from "field absent".
#[derive(Debug, Clone, Default, Serialize)]
pub struct CertificateRecord {
    /// Host answered on 443 and completed a TLS handshake
    pub https_ok: bool,
    /// Phase-one (verification-disabled) handshake succeeded
    pub handshake_ok: bool,
    /// Trusted, unexpired, and matching the hostname
    pub certificate_valid: bool,
    /// Validity window has closed (or not yet opened)
    pub expired: bool,
    pub not_before: Option<DateTime<Utc>>,
    pub expires_on: Option<DateTime<Utc>>,
    pub days_until_expiry: Option<i64>,
    pub subject_cn: Option<String>,
    pub subject_org: Option<String>,
    pub issuer_cn: Option<String>,
    pub issuer_org: Option<String>,
    pub serial_number: Option<String>,
    /// `Some(true)` / `Some(false)` when subject and issuer could be
    /// compared, `None` when the certificate named neither
    pub self_signed: Option<bool>,
    /// Chain verified against the webpki root store
    pub ca_trusted: bool,
    pub chain_complete: bool,
    pub chain_length: usize,
    pub tls_version: Option<String>,
    pub cipher_suite: Option<String>,
    pub key_algorithm: Option<String>,
    pub key_size: Option<u32>,
    pub key_curve: Option<String>,
    pub signature_algorithm: Option<String>,
    /// Leaf certificate covers the queried hostname (exact or wildcard)
    pub hostname_match: bool,
    pub san_domains: Vec<String>,
    pub wildcard_cert: bool,
    pub errors: Vec<String>,
}
