//! Security response header checker.
//!
//! One GET with redirects followed (the shared client caps the hop count),
//! body discarded. Reports which of the tracked security headers the final
//! response carries, plus warning codes for the gaps.

use reqwest::header::HeaderMap;
use serde::Serialize;

use crate::error_handling::{check_error, CheckErrorKind};

/// Header presence and derived warnings for one URL.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HeaderReport {
    pub url: String,
    pub final_url: Option<String>,
    pub status: Option<u16>,
    /// Final response arrived over https
    pub https_final: bool,
    pub strict_transport_security: Option<String>,
    pub content_security_policy: Option<String>,
    pub x_content_type_options: Option<String>,
    pub x_frame_options: Option<String>,
    pub referrer_policy: Option<String>,
    pub permissions_policy: Option<String>,
    pub present: Vec<&'static str>,
    pub warnings: Vec<&'static str>,
    pub errors: Vec<String>,
}

/// Fetches `url` and inspects the response headers. Total function:
/// network failures land in `errors` with every warning code set, since an
/// unreachable site proves none of the protections.
pub async fn check_headers(client: &reqwest::Client, url: &str) -> HeaderReport {
    let mut report = HeaderReport {
        url: url.to_string(),
        ..Default::default()
    };

    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            report
                .errors
                .push(check_error(CheckErrorKind::HttpRequestError, &e.to_string()));
            derive_warnings(&mut report);
            return report;
        }
    };

    report.status = Some(response.status().as_u16());
    report.https_final = response.url().scheme() == "https";
    report.final_url = Some(response.url().to_string());

    if !response.status().is_success() {
        report.errors.push(check_error(
            CheckErrorKind::HttpStatusError,
            &format!("{} returned {}", response.url(), response.status()),
        ));
    }

    extract_headers(response.headers(), &mut report);
    derive_warnings(&mut report);
    report
}

fn extract_headers(headers: &HeaderMap, report: &mut HeaderReport) {
    let get = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
    };

    report.strict_transport_security = get("strict-transport-security");
    report.content_security_policy = get("content-security-policy");
    report.x_content_type_options = get("x-content-type-options");
    report.x_frame_options = get("x-frame-options");
    report.referrer_policy = get("referrer-policy");
    report.permissions_policy = get("permissions-policy");

    let tracked: [(&'static str, bool); 6] = [
        (
            "Strict-Transport-Security",
            report.strict_transport_security.is_some(),
        ),
        (
            "Content-Security-Policy",
            report.content_security_policy.is_some(),
        ),
        (
            "X-Content-Type-Options",
            report.x_content_type_options.is_some(),
        ),
        ("X-Frame-Options", report.x_frame_options.is_some()),
        ("Referrer-Policy", report.referrer_policy.is_some()),
        ("Permissions-Policy", report.permissions_policy.is_some()),
    ];
    report.present = tracked
        .into_iter()
        .filter_map(|(name, present)| present.then_some(name))
        .collect();
}

fn derive_warnings(report: &mut HeaderReport) {
    if !report.https_final {
        report.warnings.push("no_https");
    }
    if report.strict_transport_security.is_none() {
        report.warnings.push("missing_hsts");
    }
    if report.content_security_policy.is_none() {
        report.warnings.push("missing_csp");
    }
    if report.x_content_type_options.is_none() {
        report.warnings.push("missing_content_type_options");
    }
    if report.x_frame_options.is_none() {
        report.warnings.push("missing_frame_options");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderName, HeaderValue};

    fn header_map(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            let name: HeaderName = name.parse().unwrap();
            map.insert(name, HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn test_extract_headers_tracks_presence() {
        let mut report = HeaderReport::default();
        let headers = header_map(&[
            ("strict-transport-security", "max-age=63072000"),
            ("x-content-type-options", "nosniff"),
        ]);
        extract_headers(&headers, &mut report);
        assert_eq!(
            report.present,
            vec!["Strict-Transport-Security", "X-Content-Type-Options"]
        );
        assert_eq!(
            report.strict_transport_security.as_deref(),
            Some("max-age=63072000")
        );
        assert!(report.content_security_policy.is_none());
    }

    #[test]
    fn test_warnings_for_missing_headers() {
        let mut report = HeaderReport {
            https_final: true,
            ..Default::default()
        };
        let headers = header_map(&[("strict-transport-security", "max-age=300")]);
        extract_headers(&headers, &mut report);
        derive_warnings(&mut report);
        assert!(!report.warnings.contains(&"no_https"));
        assert!(!report.warnings.contains(&"missing_hsts"));
        assert!(report.warnings.contains(&"missing_csp"));
        assert!(report.warnings.contains(&"missing_content_type_options"));
        assert!(report.warnings.contains(&"missing_frame_options"));
    }

    #[test]
    fn test_fully_hardened_response_has_no_warnings() {
        let mut report = HeaderReport {
            https_final: true,
            ..Default::default()
        };
        let headers = header_map(&[
            ("strict-transport-security", "max-age=63072000"),
            ("content-security-policy", "default-src 'self'"),
            ("x-content-type-options", "nosniff"),
            ("x-frame-options", "DENY"),
            ("referrer-policy", "no-referrer"),
            ("permissions-policy", "geolocation=()"),
        ]);
        extract_headers(&headers, &mut report);
        derive_warnings(&mut report);
        assert!(report.warnings.is_empty());
        assert_eq!(report.present.len(), 6);
    }

    #[test]
    fn test_http_final_url_warns() {
        let mut report = HeaderReport::default();
        derive_warnings(&mut report);
        assert!(report.warnings.contains(&"no_https"));
    }
}
