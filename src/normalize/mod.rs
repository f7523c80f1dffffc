//! URL and hostname normalization.
//!
//! Every analysis starts here. Normalization is a total function: any input
//! string produces a [`NormalizedTarget`], with malformed inputs flagged
//! rather than rejected with an error. The normalized URL doubles as the
//! result cache key, so the transform must be deterministic and idempotent.

use url::Url;

use crate::config::{MAX_HOSTNAME_LENGTH, MAX_URL_LENGTH};
use crate::error_handling::{check_error, CheckErrorKind};

/// The outcome of normalizing one input string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedTarget {
    /// The raw input, as given
    pub input: String,
    /// Normalized URL (scheme always present)
    pub url: String,
    /// Lowercased hostname with any port stripped
    pub host: String,
    /// Whether the host is an IP literal
    pub is_ip: bool,
    /// Whether the host passed structural validation
    pub valid: bool,
    /// What went wrong, when `valid` is false
    pub errors: Vec<String>,
}

/// Normalizes a URL or bare hostname into an analysis target.
///
/// Missing schemes get `https://` prepended. If URL parsing fails entirely,
/// the raw input is treated as a hostname. Ports are stripped; hostnames are
/// lowercased. IP literals pass through unchanged.
pub fn normalize_target(input: &str) -> NormalizedTarget {
    let raw = input.trim();

    if raw.len() > MAX_URL_LENGTH {
        return NormalizedTarget {
            input: raw.to_string(),
            url: String::new(),
            host: String::new(),
            is_ip: false,
            valid: false,
            errors: vec![check_error(
                CheckErrorKind::InvalidInput,
                &format!("input exceeds {} characters", MAX_URL_LENGTH),
            )],
        };
    }

    let with_scheme = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("https://{}", raw)
    };

    let (host, url) = match Url::parse(&with_scheme) {
        Ok(parsed) => {
            let host = parsed.host_str().unwrap_or_default().to_ascii_lowercase();
            let mut rebuilt = parsed;
            // Port stripping keeps the cache key stable across :443 variants
            let _ = rebuilt.set_port(None);
            (host, rebuilt.to_string())
        }
        Err(_) => {
            // Not parseable as a URL; treat the raw input as a hostname
            let host = raw
                .split("://")
                .last()
                .unwrap_or_default()
                .split('/')
                .next()
                .unwrap_or_default()
                .rsplit('@')
                .next()
                .unwrap_or_default()
                .split(':')
                .next()
                .unwrap_or_default()
                .to_ascii_lowercase();
            (host.clone(), format!("https://{}/", host))
        }
    };

    let is_ip = parse_ip_literal(&host);
    let mut errors = Vec::new();

    if !is_ip {
        if let Some(problem) = hostname_problem(&host) {
            errors.push(check_error(CheckErrorKind::InvalidInput, problem));
        }
    }

    NormalizedTarget {
        input: raw.to_string(),
        valid: errors.is_empty(),
        url,
        host,
        is_ip,
        errors,
    }
}

/// Structural validation for non-IP hostnames. Returns a description of the
/// first problem found, or `None` for a well-formed name.
fn hostname_problem(host: &str) -> Option<&'static str> {
    if host.is_empty() {
        return Some("empty hostname");
    }
    if host.len() > MAX_HOSTNAME_LENGTH {
        return Some("hostname exceeds 253 characters");
    }
    if host.starts_with('.') || host.ends_with('.') {
        return Some("hostname has leading or trailing dot");
    }
    if host.contains("..") {
        return Some("hostname has empty label");
    }
    None
}

fn parse_ip_literal(host: &str) -> bool {
    if host.parse::<std::net::IpAddr>().is_ok() {
        return true;
    }
    // url::Url renders IPv6 hosts in brackets
    host.strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .map(|h| h.parse::<std::net::Ipv6Addr>().is_ok())
        .unwrap_or(false)
}
