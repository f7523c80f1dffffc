//! Optional ML phishing scorer.
//!
//! Builds the fixed-order feature vector, runs it through the configured
//! [`UrlModel`], and damps the result for allowlisted well-known domains
//! so major sites do not trip false positives. The damping is reported
//! transparently via `original_ml_score` and `whitelisted`.

mod features;
mod model;

use log::debug;
use serde::Serialize;
use url::Url;

pub use features::{extract_features, FEATURE_COUNT, FEATURE_NAMES};
pub use model::{LinearModel, MlError, UrlModel};

use crate::rules::ContentRuleReport;

/// Registrable domains exempt from high ML scores. Matched exact or as a
/// `.{domain}` suffix, so `www.google.com` rides on `google.com`.
const LEGITIMATE_DOMAINS: &[&str] = &[
    "google.com",
    "google.co.uk",
    "google.ca",
    "google.com.au",
    "microsoft.com",
    "office.com",
    "outlook.com",
    "live.com",
    "apple.com",
    "icloud.com",
    "amazon.com",
    "amazon.co.uk",
    "amazon.ca",
    "facebook.com",
    "fb.com",
    "twitter.com",
    "x.com",
    "linkedin.com",
    "github.com",
    "paypal.com",
    "netflix.com",
    "youtube.com",
    "instagram.com",
    "reddit.com",
    "wikipedia.org",
    "stackoverflow.com",
    "example.com",
    "example.org",
    "example.net",
];

#[derive(Debug, Clone, Default, Serialize)]
pub struct MlReport {
    pub score: u8,
    pub label: String,
    pub probability: f64,
    pub reasons: Vec<String>,
    /// Ordered per [`FEATURE_NAMES`]
    pub features: Vec<f64>,
    /// Pre-damping score, present only when the allowlist adjusted it
    pub original_ml_score: Option<u8>,
    pub whitelisted: bool,
    pub errors: Vec<String>,
}

/// Scores a URL with the given model.
///
/// # Errors
///
/// `ModelNotAvailable` when no model is configured (e.g. `--no-ml`),
/// `ScoringFailed` for an unparseable URL or model failure. Both leave the
/// caller free to omit the ML signal.
pub fn score_url(
    url: &str,
    rules: Option<&ContentRuleReport>,
    registered_domain: Option<&str>,
    model: Option<&dyn UrlModel>,
) -> Result<MlReport, MlError> {
    let model =
        model.ok_or_else(|| MlError::ModelNotAvailable("no model configured".to_string()))?;

    let parsed =
        Url::parse(url).map_err(|e| MlError::ScoringFailed(format!("invalid url: {}", e)))?;
    let features = extract_features(&parsed, rules, registered_domain);
    let probability = model.predict(&features)?;
    debug!(
        "ML model {} scored {} -> {:.3}",
        model.name(),
        url,
        probability
    );

    let raw_score = (probability * 100.0).round() as u8;
    let hostname = parsed.host_str().unwrap_or_default().to_lowercase();
    let whitelisted = is_allowlisted(&hostname);

    let (score, original) = if whitelisted && raw_score > 20 {
        (((raw_score / 3).clamp(5, 20)), Some(raw_score))
    } else {
        (raw_score, None)
    };

    let label = if score >= 70 {
        "High Risk"
    } else if score >= 40 {
        "Medium Risk"
    } else {
        "Low Risk"
    };

    let mut reasons: Vec<String> = Vec::new();
    if let Some(original) = original {
        reasons.push(format!(
            "Domain is allowlisted as legitimate (original ML score {}, adjusted to {})",
            original, score
        ));
    }
    reasons.push(match label {
        "High Risk" => "ML model predicts high probability of phishing".to_string(),
        "Medium Risk" => "ML model predicts moderate risk".to_string(),
        _ => "ML model predicts low risk".to_string(),
    });

    Ok(MlReport {
        score,
        label: label.to_string(),
        probability,
        reasons,
        features: features.to_vec(),
        original_ml_score: original,
        whitelisted,
        errors: Vec::new(),
    })
}

fn is_allowlisted(hostname: &str) -> bool {
    LEGITIMATE_DOMAINS.iter().any(|domain| {
        hostname == *domain || hostname.ends_with(&format!(".{}", domain))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedModel(f64);

    impl UrlModel for FixedModel {
        fn name(&self) -> &'static str {
            "fixed"
        }
        fn predict(&self, _features: &[f64; FEATURE_COUNT]) -> Result<f64, MlError> {
            Ok(self.0)
        }
    }

    #[test]
    fn test_missing_model_is_distinct_error() {
        let err = score_url("https://example.com/", None, None, None).unwrap_err();
        assert!(matches!(err, MlError::ModelNotAvailable(_)));
    }

    #[test]
    fn test_invalid_url_is_scoring_failure() {
        let model = LinearModel::calibrated();
        let err = score_url("not a url", None, None, Some(&model)).unwrap_err();
        assert!(matches!(err, MlError::ScoringFailed(_)));
    }

    #[test]
    fn test_allowlist_damps_high_score() {
        let model = FixedModel(0.9);
        let report = score_url("https://www.google.com/", None, None, Some(&model)).unwrap();
        assert!(report.whitelisted);
        assert_eq!(report.original_ml_score, Some(90));
        assert!(report.score >= 5 && report.score <= 20);
        assert_eq!(report.label, "Low Risk");
    }

    #[test]
    fn test_allowlist_leaves_low_score_alone() {
        let model = FixedModel(0.1);
        let report = score_url("https://github.com/", None, None, Some(&model)).unwrap();
        assert!(report.whitelisted);
        assert_eq!(report.score, 10);
        assert!(report.original_ml_score.is_none());
    }

    #[test]
    fn test_unlisted_domain_keeps_raw_score() {
        let model = FixedModel(0.9);
        let report = score_url("https://evil.test/", None, None, Some(&model)).unwrap();
        assert!(!report.whitelisted);
        assert_eq!(report.score, 90);
        assert_eq!(report.label, "High Risk");
    }

    #[test]
    fn test_label_thresholds() {
        let model = FixedModel(0.40);
        let report = score_url("https://evil.test/", None, None, Some(&model)).unwrap();
        assert_eq!(report.label, "Medium Risk");

        let model = FixedModel(0.39);
        let report = score_url("https://evil.test/", None, None, Some(&model)).unwrap();
        assert_eq!(report.label, "Low Risk");
    }

    #[test]
    fn test_calibrated_model_on_clean_url() {
        let model = LinearModel::calibrated();
        let report = score_url("https://example.com/", None, None, Some(&model)).unwrap();
        assert_eq!(report.label, "Low Risk");
    }

    #[test]
    fn test_suffix_match_not_substring() {
        assert!(is_allowlisted("www.google.com"));
        assert!(is_allowlisted("google.com"));
        assert!(!is_allowlisted("notgoogle.com"));
        assert!(!is_allowlisted("google.com.evil.test"));
    }
}
