//! TLS certificate inspection.
//!
//! This module connects to HTTPS endpoints and builds a [`CertificateRecord`]:
//! - Certificate subject, issuer, serial, and validity period
//! - Subject Alternative Names (SANs) and hostname/wildcard matching
//! - Key and signature algorithms
//! - Negotiated TLS version and cipher suite
//! - Chain trust against the webpki root store
//!
//! Inspection is two-phase. The first handshake runs with verification
//! disabled so certificate details can be collected even from hosts a
//! trusted handshake would reject; the second runs fully verified and
//! decides `ca_trusted`. Uses `tokio-rustls` for async TLS connections and
//! `x509-parser` for certificate parsing.

mod extract;
mod types;
mod verifier;

pub use types::CertificateRecord;

use std::sync::Arc;

use log::debug;
use rustls::pki_types::ServerName;
use tokio::net::TcpStream;
use tokio_rustls::rustls::{ClientConfig, RootCertStore};
use tokio_rustls::TlsConnector;

use crate::config::{TCP_CONNECT_TIMEOUT_SECS, TLS_HANDSHAKE_TIMEOUT_SECS};
use crate::error_handling::{check_error, CheckErrorKind};

use extract::extract_leaf_fields;
use verifier::ObservationVerifier;

/// Session parameters and peer chain captured from one handshake.
struct HandshakeObservation {
    tls_version: Option<String>,
    cipher_suite: Option<String>,
    peer_certs: Vec<Vec<u8>>,
}

/// Inspects the TLS deployment of a host.
///
/// Always returns a structurally complete record; connection and parsing
/// failures are recorded in `errors` rather than propagated.
pub async fn inspect_certificate(domain: &str) -> CertificateRecord {
    debug!("inspecting certificate for {domain}");

    let mut record = CertificateRecord::default();

    // Phase one: observe with verification disabled.
    match handshake(domain, observation_config()).await {
        Ok(observed) => {
            record.handshake_ok = true;
            record.https_ok = true;
            record.chain_length = observed.peer_certs.len();
            record.tls_version = observed.tls_version;
            record.cipher_suite = observed.cipher_suite;

            match observed.peer_certs.first() {
                Some(leaf) => match x509_parser::parse_x509_certificate(leaf) {
                    Ok((_, cert)) => extract_leaf_fields(&cert, &mut record),
                    Err(e) => record.errors.push(check_error(
                        CheckErrorKind::CertificateParseError,
                        &e.to_string(),
                    )),
                },
                None => record.errors.push(check_error(
                    CheckErrorKind::CertificateParseError,
                    "no peer certificate presented",
                )),
            }
        }
        Err((kind, detail)) => {
            record.errors.push(check_error(kind, &detail));
            return record;
        }
    }

    // Phase two: verify the chain against the webpki roots.
    match handshake(domain, verified_config()).await {
        Ok(observed) => {
            record.ca_trusted = true;
            record.chain_complete = true;
            // Session parameters from the verified handshake supersede the
            // observation ones when both are available
            if observed.tls_version.is_some() {
                record.tls_version = observed.tls_version;
            }
            if observed.cipher_suite.is_some() {
                record.cipher_suite = observed.cipher_suite;
            }
        }
        Err((kind, detail)) => {
            let kind = match kind {
                CheckErrorKind::TlsHandshakeError => CheckErrorKind::CertificateVerifyError,
                other => other,
            };
            record.errors.push(check_error(kind, &detail));
        }
    }

    record.hostname_match = certificate_covers_host(&record, domain);
    record.chain_complete = record.chain_complete || record.chain_length > 1;
    record.certificate_valid = record.ca_trusted && !record.expired && record.hostname_match;
    record
}

fn observation_config() -> ClientConfig {
    let provider = rustls::crypto::aws_lc_rs::default_provider();
    ClientConfig::builder()
        .dangerous()
        .with_custom_certificate_verifier(Arc::new(ObservationVerifier::new(provider)))
        .with_no_client_auth()
}

fn verified_config() -> ClientConfig {
    let mut root_store = RootCertStore::empty();
    root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth()
}

/// Performs one timeout-bounded handshake and captures the session
/// parameters and the peer chain in DER form.
async fn handshake(
    domain: &str,
    config: ClientConfig,
) -> Result<HandshakeObservation, (CheckErrorKind, String)> {
    let server_name = ServerName::try_from(domain.to_string())
        .map_err(|e| (CheckErrorKind::InvalidInput, e.to_string()))?;

    let sock = match tokio::time::timeout(
        std::time::Duration::from_secs(TCP_CONNECT_TIMEOUT_SECS),
        TcpStream::connect((domain, 443)),
    )
    .await
    {
        Ok(Ok(sock)) => sock,
        Ok(Err(e)) => {
            let kind = if e.kind() == std::io::ErrorKind::ConnectionRefused {
                CheckErrorKind::ConnectionRefused
            } else {
                CheckErrorKind::DnsResolutionError
            };
            return Err((kind, format!("{}:443 - {}", domain, e)));
        }
        Err(_) => {
            return Err((
                CheckErrorKind::ConnectTimeout,
                format!("{}:443 ({}s)", domain, TCP_CONNECT_TIMEOUT_SECS),
            ));
        }
    };

    let connector = TlsConnector::from(Arc::new(config));
    let tls_stream = match tokio::time::timeout(
        std::time::Duration::from_secs(TLS_HANDSHAKE_TIMEOUT_SECS),
        connector.connect(server_name, sock),
    )
    .await
    {
        Ok(Ok(stream)) => stream,
        Ok(Err(e)) => {
            return Err((CheckErrorKind::TlsHandshakeError, e.to_string()));
        }
        Err(_) => {
            return Err((
                CheckErrorKind::TlsHandshakeError,
                format!("handshake timeout ({}s)", TLS_HANDSHAKE_TIMEOUT_SECS),
            ));
        }
    };

    let session = tls_stream.get_ref().1;
    let tls_version = session.protocol_version().map(|v| format!("{v:?}"));
    let cipher_suite = session
        .negotiated_cipher_suite()
        .map(|cs| format!("{:?}", cs.suite()));
    let peer_certs = session
        .peer_certificates()
        .map(|certs| certs.iter().map(|c| c.as_ref().to_vec()).collect())
        .unwrap_or_default();

    Ok(HandshakeObservation {
        tls_version,
        cipher_suite,
        peer_certs,
    })
}

/// Matches a hostname against a certificate name pattern.
///
/// A wildcard pattern `*.example.com` covers `example.com` itself and
/// single-label subdomains (`www.example.com`), never multi-label ones
/// (`a.b.example.com`).
pub(crate) fn hostname_matches_pattern(pattern: &str, host: &str) -> bool {
    let pattern = pattern.to_ascii_lowercase();
    let host = host.to_ascii_lowercase();

    match pattern.strip_prefix("*.") {
        Some(suffix) => {
            if host == suffix {
                return true;
            }
            match host.strip_suffix(suffix) {
                Some(prefix) => prefix
                    .strip_suffix('.')
                    .map(|label| !label.is_empty() && !label.contains('.'))
                    .unwrap_or(false),
                None => false,
            }
        }
        None => pattern == host,
    }
}

fn certificate_covers_host(record: &CertificateRecord, host: &str) -> bool {
    record
        .san_domains
        .iter()
        .any(|san| hostname_matches_pattern(san, host))
        || record
            .subject_cn
            .as_deref()
            .is_some_and(|cn| hostname_matches_pattern(cn, host))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        assert!(hostname_matches_pattern("example.com", "example.com"));
        assert!(hostname_matches_pattern("Example.COM", "example.com"));
        assert!(!hostname_matches_pattern("example.com", "other.com"));
    }

    #[test]
    fn test_wildcard_matches_bare_domain() {
        assert!(hostname_matches_pattern("*.example.com", "example.com"));
    }

    #[test]
    fn test_wildcard_matches_single_label_subdomain() {
        assert!(hostname_matches_pattern("*.example.com", "www.example.com"));
        assert!(hostname_matches_pattern("*.example.com", "login.example.com"));
    }

    #[test]
    fn test_wildcard_rejects_multi_label_subdomain() {
        assert!(!hostname_matches_pattern("*.example.com", "a.b.example.com"));
    }

    #[test]
    fn test_wildcard_rejects_suffix_lookalike() {
        assert!(!hostname_matches_pattern("*.example.com", "evil-example.com"));
        assert!(!hostname_matches_pattern(
            "*.example.com",
            "badexample.com"
        ));
    }

    #[test]
    fn test_certificate_covers_host_via_san() {
        let record = CertificateRecord {
            san_domains: vec!["*.example.com".to_string(), "example.net".to_string()],
            ..Default::default()
        };
        assert!(certificate_covers_host(&record, "www.example.com"));
        assert!(certificate_covers_host(&record, "example.net"));
        assert!(!certificate_covers_host(&record, "a.b.example.com"));
    }

    #[test]
    fn test_certificate_covers_host_via_subject_cn() {
        let record = CertificateRecord {
            subject_cn: Some("example.org".to_string()),
            ..Default::default()
        };
        assert!(certificate_covers_host(&record, "example.org"));
        assert!(!certificate_covers_host(&record, "www.example.org"));
    }

    #[test]
    fn test_default_record_is_structurally_complete() {
        let record = CertificateRecord::default();
        assert!(!record.https_ok);
        assert!(!record.certificate_valid);
        assert_eq!(record.self_signed, None);
        assert!(record.san_domains.is_empty());
        assert!(record.errors.is_empty());
    }
}
