//! URL feature extraction for the ML scorer.
//!
//! The model consumes a fixed-order numeric vector. Features that draw on
//! other checkers' outputs default to 0.0 when that data is missing; the
//! model never sees an absent input.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use url::Url;

use crate::rules::ContentRuleReport;

pub const FEATURE_COUNT: usize = 27;

/// Names in vector order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "NumDots",
    "SubdomainLevel",
    "PathLevel",
    "UrlLength",
    "NumDash",
    "NumDashInHostname",
    "AtSymbol",
    "TildeSymbol",
    "NumUnderscore",
    "NumPercent",
    "NumQueryComponents",
    "NumAmpersand",
    "NumHash",
    "NumNumericChars",
    "NoHttps",
    "RandomString",
    "IpAddress",
    "DomainInSubdomains",
    "DomainInPaths",
    "HttpsInHostname",
    "HostnameLength",
    "PathLength",
    "QueryLength",
    "DoubleSlashInPath",
    "NumSensitiveWords",
    "EmbeddedBrandName",
    "FrequentDomainNameMismatch",
];

fn random_token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[A-Za-z0-9]{15,}").unwrap())
}

/// Builds the ordered feature vector for a parsed URL.
pub fn extract_features(
    url: &Url,
    rules: Option<&ContentRuleReport>,
    registered_domain: Option<&str>,
) -> [f64; FEATURE_COUNT] {
    let full = url.as_str();
    let hostname = url.host_str().unwrap_or_default();
    let path = url.path();
    let query = url.query().unwrap_or_default();

    let host_parts: Vec<&str> = hostname.split('.').filter(|p| !p.is_empty()).collect();
    let base_domain = if host_parts.len() >= 2 {
        host_parts[host_parts.len() - 2]
    } else {
        host_parts.last().copied().unwrap_or_default()
    };
    let subdomain = if host_parts.len() > 2 {
        host_parts[..host_parts.len() - 2].join(".")
    } else {
        String::new()
    };

    let query_keys: HashSet<String> = url.query_pairs().map(|(k, _)| k.into_owned()).collect();
    let is_ip = hostname.parse::<std::net::IpAddr>().is_ok()
        || hostname
            .strip_prefix('[')
            .and_then(|h| h.strip_suffix(']'))
            .is_some_and(|h| h.parse::<std::net::IpAddr>().is_ok());

    let sensitive_words = rules.map_or(0.0, |r| r.matched_suspicious.len() as f64);
    let embedded_brand = rules.is_some_and(|r| r.has_brand_words_in_host);
    let domain_mismatch = match registered_domain {
        Some(registered) if !hostname.is_empty() && !registered.is_empty() => {
            !hostname.ends_with(&registered.to_lowercase())
        }
        _ => false,
    };

    let count = |haystack: &str, needle: char| haystack.matches(needle).count() as f64;

    [
        count(hostname, '.') + count(path, '.'),
        host_parts.len().saturating_sub(2) as f64,
        path.split('/').filter(|s| !s.is_empty()).count() as f64,
        full.len() as f64,
        count(full, '-'),
        count(hostname, '-'),
        f64::from(full.contains('@')),
        f64::from(full.contains('~')),
        count(full, '_'),
        count(full, '%'),
        query_keys.len() as f64,
        count(full, '&'),
        count(full, '#'),
        full.chars().filter(char::is_ascii_digit).count() as f64,
        f64::from(url.scheme() != "https"),
        f64::from(
            random_token_pattern().is_match(&format!("{}{}", path, query)),
        ),
        f64::from(is_ip),
        f64::from(!subdomain.is_empty() && !base_domain.is_empty() && subdomain.contains(base_domain)),
        f64::from(!base_domain.is_empty() && path.contains(base_domain)),
        f64::from(hostname.contains("https")),
        hostname.len() as f64,
        path.len() as f64,
        query.len() as f64,
        f64::from(path.contains("//")),
        sensitive_words,
        f64::from(embedded_brand),
        f64::from(domain_mismatch),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features_for(url: &str) -> [f64; FEATURE_COUNT] {
        extract_features(&Url::parse(url).unwrap(), None, None)
    }

    fn get(features: &[f64; FEATURE_COUNT], name: &str) -> f64 {
        let idx = FEATURE_NAMES.iter().position(|n| *n == name).unwrap();
        features[idx]
    }

    #[test]
    fn test_basic_url_counts() {
        let f = features_for("https://www.example.com/a/b?x=1&y=2");
        assert_eq!(get(&f, "NumDots"), 2.0);
        assert_eq!(get(&f, "SubdomainLevel"), 1.0);
        assert_eq!(get(&f, "PathLevel"), 2.0);
        assert_eq!(get(&f, "NumQueryComponents"), 2.0);
        assert_eq!(get(&f, "NumAmpersand"), 1.0);
        assert_eq!(get(&f, "NoHttps"), 0.0);
    }

    #[test]
    fn test_http_scheme_flagged() {
        let f = features_for("http://example.com/");
        assert_eq!(get(&f, "NoHttps"), 1.0);
    }

    #[test]
    fn test_ip_address_detected() {
        let f = features_for("https://192.0.2.1/login");
        assert_eq!(get(&f, "IpAddress"), 1.0);
    }

    #[test]
    fn test_https_in_hostname() {
        let f = features_for("http://https-secure.example.com/");
        assert_eq!(get(&f, "HttpsInHostname"), 1.0);
        assert_eq!(get(&f, "NumDashInHostname"), 1.0);
    }

    #[test]
    fn test_random_string_in_path() {
        let f = features_for("https://example.com/a8Zk2PqW9xYv4LmN3/page");
        assert_eq!(get(&f, "RandomString"), 1.0);
        let clean = features_for("https://example.com/short/page");
        assert_eq!(get(&clean, "RandomString"), 0.0);
    }

    #[test]
    fn test_domain_in_subdomains() {
        let f = features_for("https://example.evil.example.com/");
        assert_eq!(get(&f, "DomainInSubdomains"), 1.0);
    }

    #[test]
    fn test_rules_inputs_flow_through() {
        let rules = ContentRuleReport {
            has_suspicious_words: true,
            matched_suspicious: vec!["verify", "account"],
            has_brand_words_in_host: true,
            matched_brands: vec!["paypal"],
            errors: Vec::new(),
        };
        let url = Url::parse("https://paypal.evil.com/verify").unwrap();
        let f = extract_features(&url, Some(&rules), None);
        assert_eq!(get(&f, "NumSensitiveWords"), 2.0);
        assert_eq!(get(&f, "EmbeddedBrandName"), 1.0);
    }

    #[test]
    fn test_domain_mismatch() {
        let url = Url::parse("https://login.evil.com/").unwrap();
        let f = extract_features(&url, None, Some("example.com"));
        assert_eq!(get(&f, "FrequentDomainNameMismatch"), 1.0);

        let matching = Url::parse("https://login.example.com/").unwrap();
        let f = extract_features(&matching, None, Some("example.com"));
        assert_eq!(get(&f, "FrequentDomainNameMismatch"), 0.0);
    }

    #[test]
    fn test_missing_inputs_default_to_zero() {
        let f = features_for("https://example.com/");
        assert_eq!(get(&f, "NumSensitiveWords"), 0.0);
        assert_eq!(get(&f, "EmbeddedBrandName"), 0.0);
        assert_eq!(get(&f, "FrequentDomainNameMismatch"), 0.0);
    }
}
