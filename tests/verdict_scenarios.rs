//! End-to-end verdict scenarios built from the pure checkers.
//!
//! Network checkers are exercised against constructed records; the pure
//! checkers (confusability, keywords, rules) run for real.

use riskprobe::aggregate::{aggregate, RiskLabel};
use riskprobe::confusability;
use riskprobe::keywords::check_keywords;
use riskprobe::registration::RegistrationRecord;
use riskprobe::rules::check_rules;
use riskprobe::tls::CertificateRecord;

fn reachable_https() -> CertificateRecord {
    CertificateRecord {
        https_ok: true,
        certificate_valid: true,
        ..Default::default()
    }
}

fn registration_aged(days: i64) -> RegistrationRecord {
    RegistrationRecord {
        age_days: Some(days),
        ..RegistrationRecord::new("example.com")
    }
}

#[test]
fn test_established_ascii_site_is_low_risk() {
    let idn = confusability::analyze("example.com", Some("https://example.com/"));
    let rules = check_rules("example.com", "/", Some("example"));

    let verdict = aggregate(&reachable_https(), &registration_aged(8000), &idn, &rules);
    assert!(verdict.score < 40, "score was {}", verdict.score);
    assert_eq!(verdict.label, RiskLabel::LowRisk);
    assert!(verdict.reasons.is_empty());
}

#[test]
fn test_fresh_mixed_script_http_site_is_high_risk() {
    // Cyrillic а in an otherwise Latin hostname
    let host = "p\u{0430}ypal-verify.example";
    let idn = confusability::analyze(host, None);
    assert!(idn.unicode_detection.mixed_confusable_scripts);

    let rules = check_rules(host, "/", Some("example"));
    let verdict = aggregate(
        &CertificateRecord::default(),
        &registration_aged(10),
        &idn,
        &rules,
    );

    assert!(verdict.reasons.contains(&"no_https"));
    assert!(verdict.reasons.contains(&"very_new_domain"));
    assert!(verdict.reasons.contains(&"mixed_scripts"));
    assert!(verdict.score >= 70, "score was {}", verdict.score);
    assert_eq!(verdict.label, RiskLabel::HighRisk);
}

#[test]
fn test_punycode_hostname_scores_below_ascii() {
    let ascii = confusability::analyze("example.com", None);
    let punycode = confusability::analyze("xn--80ak6aa92e.com", None);
    assert!(
        punycode.score < ascii.score,
        "punycode {} should be below ascii {}",
        punycode.score,
        ascii.score
    );
}

#[test]
fn test_phishing_keyword_caps_confusability_at_50() {
    let report = confusability::analyze("secure-login.example.com", None);
    assert!(report.keyword_penalty_applied);
    assert!(report.score <= 50, "score was {}", report.score);
}

#[test]
fn test_brand_impersonation_contributes_signals() {
    let host = "paypal.secure-update.example";
    let rules = check_rules(host, "/", Some("secure-update"));
    assert!(rules.has_brand_words_in_host);
    assert!(rules.has_suspicious_words);

    let idn = confusability::analyze(host, None);
    let verdict = aggregate(&reachable_https(), &registration_aged(5000), &idn, &rules);
    assert!(verdict.reasons.contains(&"brand_in_host"));
    assert!(verdict.reasons.contains(&"phishy_words"));
    assert_eq!(verdict.score, 35);
    assert_eq!(verdict.label, RiskLabel::LowRisk);
}

#[test]
fn test_keyword_checker_independent_of_aggregate() {
    // The keyword sub-score rides in the report without feeding the verdict
    let keywords = check_keywords("https://example.com/verify/urgent");
    assert_eq!(keywords.risk_score, 50);

    let idn = confusability::analyze("example.com", None);
    let rules = check_rules("example.com", "/verify/urgent", Some("example"));
    let verdict = aggregate(&reachable_https(), &registration_aged(5000), &idn, &rules);
    assert_eq!(verdict.reasons, vec!["phishy_words"]);
    assert_eq!(verdict.score, 15);
}
