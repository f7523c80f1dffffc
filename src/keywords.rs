//! Hostname/URL keyword checker.
//!
//! Conservative by construction: common terms like "login" carry zero risk
//! on their own and only add weight when a high-risk term is also present.

use serde::Serialize;

/// Generic terms, never risky alone.
const COMMON_KEYWORDS: &[&str] = &["login", "signin", "sign-in", "sign_in", "log-in", "log_in"];

/// Red-flag terms that carry risk directly.
const HIGH_RISK_KEYWORDS: &[&str] = &[
    "secure-login",
    "update-account",
    "verify",
    "reset-password",
    "free-gift",
    "account-verify",
    "confirm",
    "bank-login",
    "urgent",
    "unauthorized",
    "account-locked",
    "account-suspend",
    "validate",
    "credential",
    "reactivate",
];

#[derive(Debug, Clone, Default, Serialize)]
pub struct KeywordReport {
    pub url: String,
    pub common: Vec<&'static str>,
    pub high_risk: Vec<&'static str>,
    /// Local sub-score; the aggregate verdict consumes only the booleans
    pub risk_score: u8,
    pub risk_factors: Vec<String>,
    pub errors: Vec<String>,
}

/// Scans the full URL text for keyword hits and scores them.
pub fn check_keywords(url: &str) -> KeywordReport {
    let lowered = url.to_lowercase();

    let common: Vec<&'static str> = COMMON_KEYWORDS
        .iter()
        .copied()
        .filter(|kw| lowered.contains(kw))
        .collect();
    let high_risk: Vec<&'static str> = HIGH_RISK_KEYWORDS
        .iter()
        .copied()
        .filter(|kw| lowered.contains(kw))
        .collect();

    let mut score: u32 = 0;
    let mut factors: Vec<String> = Vec::new();

    if !high_risk.is_empty() {
        score += 40 + (high_risk.len() as u32 - 1) * 10;
        factors.push(format!("High-risk keyword(s): {}", high_risk.join(", ")));
    }
    if !common.is_empty() {
        if high_risk.is_empty() {
            factors.push("Common term(s) found, not risky alone".to_string());
        } else {
            score += 10;
            factors.push("Common and high-risk keywords combined".to_string());
        }
    }

    KeywordReport {
        url: url.to_string(),
        common,
        high_risk,
        risk_score: score.min(100) as u8,
        risk_factors: factors,
        errors: Vec::new(),
    }
}
