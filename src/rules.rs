//! Content rules: suspicious-word and brand-impersonation checks.
//!
//! Suspicious words are matched against host and path together; brand
//! words against the host only, and a brand that IS the registrable base
//! label is not impersonation (paypal.com is PayPal, paypal-support.com
//! is not).

use serde::Serialize;

const SUSPICIOUS_WORDS: &[&str] = &[
    "login",
    "verify",
    "update",
    "confirm",
    "unlock",
    "password",
    "credential",
    "billing",
    "invoice",
    "urgent",
    "suspend",
    "limited",
    "gift",
    "prize",
    "support",
    "helpdesk",
    "secure",
    "security",
    "account",
    "wallet",
];

const BRAND_WORDS: &[&str] = &[
    "apple",
    "microsoft",
    "google",
    "facebook",
    "amazon",
    "paypal",
    "netflix",
    "instagram",
    "whatsapp",
    "outlook",
];

#[derive(Debug, Clone, Default, Serialize)]
pub struct ContentRuleReport {
    pub has_suspicious_words: bool,
    pub matched_suspicious: Vec<&'static str>,
    pub has_brand_words_in_host: bool,
    pub matched_brands: Vec<&'static str>,
    pub errors: Vec<String>,
}

/// Runs the word rules over a hostname and path. `base_label` is the
/// registrable domain's own label, used to exempt the brand's real site.
pub fn check_rules(host: &str, path: &str, base_label: Option<&str>) -> ContentRuleReport {
    let host_lower = host.to_lowercase();
    let haystack = format!("{}{}", host_lower, path.to_lowercase());

    let matched_suspicious: Vec<&'static str> = SUSPICIOUS_WORDS
        .iter()
        .copied()
        .filter(|word| haystack.contains(word))
        .collect();

    let matched_brands: Vec<&'static str> = BRAND_WORDS
        .iter()
        .copied()
        .filter(|brand| host_lower.contains(brand))
        .filter(|brand| base_label != Some(*brand))
        .collect();

    ContentRuleReport {
        has_suspicious_words: !matched_suspicious.is_empty(),
        has_brand_words_in_host: !matched_brands.is_empty(),
        matched_suspicious,
        matched_brands,
        errors: Vec::new(),
    }
}
