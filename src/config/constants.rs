//! Configuration constants.
//!
//! This module defines all configuration constants used throughout the application,
//! including timeouts, input limits, and scoring thresholds.

use std::time::Duration;

/// Per-URL analysis timeout
/// Formula: header fetch (10s) + TLS inspection (10s) + registration lookup (10s) + buffer (5s) = ~35s
/// Checkers run concurrently, so the usual wall clock is far below this ceiling.
pub const ANALYSIS_TIMEOUT: Duration = Duration::from_secs(35);

// Network operation timeouts
/// TCP connection timeout in seconds
pub const TCP_CONNECT_TIMEOUT_SECS: u64 = 5;
/// TLS handshake timeout in seconds
pub const TLS_HANDSHAKE_TIMEOUT_SECS: u64 = 5;
/// Timeout for a single network checker (headers, registration) in seconds
pub const CHECKER_TIMEOUT_SECS: u64 = 10;
/// WHOIS port-43 query timeout in seconds
pub const WHOIS_QUERY_TIMEOUT_SECS: u64 = 5;
/// Retries for the registry WHOIS query, on top of the initial attempt
pub const WHOIS_RETRY_ATTEMPTS: usize = 2;

/// Default User-Agent string for HTTP requests.
///
/// Users can override this via the `--user-agent` CLI flag.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

// Input limits
/// Maximum accepted input URL length in characters
/// Inputs longer than this are refused before any network work happens.
pub const MAX_URL_LENGTH: usize = 2048;
/// Maximum hostname length in characters (RFC 1035)
pub const MAX_HOSTNAME_LENGTH: usize = 253;

// Error message limits
/// Maximum error message length in characters
/// Prevents report bloat from unbounded upstream error strings.
pub const MAX_ERROR_MESSAGE_LENGTH: usize = 2000;

// Redirect handling
/// Maximum number of redirect hops to follow during the header fetch
pub const MAX_REDIRECT_HOPS: usize = 10;

// Result cache
/// Default TTL for cached analysis results in seconds
pub const CACHE_TTL_SECS: u64 = 300;

// RDAP / WHOIS discovery
/// IANA bootstrap registry for RDAP base URL discovery
pub const RDAP_BOOTSTRAP_URL: &str = "https://data.iana.org/rdap/dns.json";
/// IANA WHOIS server, queried for the TLD referral in the fallback tier
pub const IANA_WHOIS_HOST: &str = "whois.iana.org";

// Risk label thresholds (aggregate and ML scores share these)
/// Scores at or above this are labeled High Risk
pub const HIGH_RISK_THRESHOLD: u8 = 70;
/// Scores at or above this (and below high) are labeled Medium Risk
pub const MEDIUM_RISK_THRESHOLD: u8 = 40;

// Registration sub-score thresholds (stricter scale than the aggregate)
pub const REGISTRATION_HIGH_THRESHOLD: u8 = 60;
pub const REGISTRATION_SUSPICIOUS_THRESHOLD: u8 = 30;

// Confusability analysis
/// Flat penalty applied to the composite confusability score when the
/// hostname carries a phishing keyword
pub const CONFUSABILITY_KEYWORD_PENALTY: i32 = 50;
/// Homograph matches reported per hostname, first-come
pub const MAX_HOMOGRAPH_MATCHES: usize = 10;
