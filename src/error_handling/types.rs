//! Error type definitions.
//!
//! This module defines all error and warning types used throughout the application.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),

    /// Error building the TLS client configuration.
    #[error("TLS configuration error: {0}")]
    TlsConfigError(String),
}

/// Types of errors that can occur while a checker runs.
///
/// This enum categorizes actual failure conditions. Each checker converts
/// its internal failures into one of these plus a detail string; nothing in
/// this family propagates past the checker boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum CheckErrorKind {
    // Connection-level failures
    ConnectTimeout,
    ConnectionRefused,
    DnsResolutionError,
    // TLS failures
    TlsHandshakeError,
    CertificateParseError,
    CertificateVerifyError,
    // HTTP failures
    HttpRequestError,
    HttpStatusError,
    // Registration lookup failures
    RdapBootstrapError,
    RdapQueryError,
    WhoisQueryError,
    WhoisParseError,
    // Pipeline-level failures
    CheckerTimeout,
    InvalidInput,
    // ML failures
    ModelNotAvailable,
    ScoringError,
}

impl std::fmt::Display for CheckErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl CheckErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckErrorKind::ConnectTimeout => "connect timeout",
            CheckErrorKind::ConnectionRefused => "connection refused",
            CheckErrorKind::DnsResolutionError => "DNS resolution error",
            CheckErrorKind::TlsHandshakeError => "TLS handshake error",
            CheckErrorKind::CertificateParseError => "certificate parse error",
            CheckErrorKind::CertificateVerifyError => "certificate verify error",
            CheckErrorKind::HttpRequestError => "HTTP request error",
            CheckErrorKind::HttpStatusError => "HTTP status error",
            CheckErrorKind::RdapBootstrapError => "RDAP bootstrap error",
            CheckErrorKind::RdapQueryError => "RDAP query error",
            CheckErrorKind::WhoisQueryError => "WHOIS query error",
            CheckErrorKind::WhoisParseError => "WHOIS parse error",
            CheckErrorKind::CheckerTimeout => "checker timeout",
            CheckErrorKind::InvalidInput => "invalid input",
            CheckErrorKind::ModelNotAvailable => "model not available",
            CheckErrorKind::ScoringError => "scoring error",
        }
    }
}

/// Formats a checker failure as the terse string that rides in a result
/// record's `errors` vector.
///
/// Detail strings are truncated so a pathological upstream message cannot
/// bloat the report.
pub fn check_error(kind: CheckErrorKind, detail: &str) -> String {
    use crate::config::MAX_ERROR_MESSAGE_LENGTH;

    let detail = detail.trim();
    if detail.is_empty() {
        return kind.as_str().to_string();
    }
    let mut message = format!("{}: {}", kind.as_str(), detail);
    if message.len() > MAX_ERROR_MESSAGE_LENGTH {
        let original_len = message.len();
        message.truncate(
            message
                .char_indices()
                .take_while(|(i, _)| *i < MAX_ERROR_MESSAGE_LENGTH)
                .last()
                .map(|(i, c)| i + c.len_utf8())
                .unwrap_or(0),
        );
        message.push_str(&format!(" [truncated from {} chars]", original_len));
    }
    message
}
