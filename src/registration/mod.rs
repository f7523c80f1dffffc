//! Domain registration checker.
//!
//! Two-tier lookup: RDAP first, port-43 WHOIS as fallback when RDAP fails
//! or leaves the registrar or creation date empty. Results from both tiers
//! merge first-writer-wins, then derived fields (domain age, expiry window,
//! privacy detection) and a registration-local risk sub-score are computed.

mod parse;
mod rdap;
mod types;
mod whois;

use chrono::{DateTime, Utc};
use log::debug;

use crate::config::{REGISTRATION_HIGH_THRESHOLD, REGISTRATION_SUSPICIOUS_THRESHOLD};

pub use types::{RegistrationRecord, RegistrationSource};

/// Substrings that mark a registrar or registrant as a privacy service.
const PRIVACY_KEYWORDS: &[&str] = &[
    "privacy",
    "protected",
    "redacted",
    "withheld",
    "contact privacy",
    "whois privacy",
    "domain privacy",
];

/// EPP statuses that indicate a domain in distress. Matched with spaces
/// stripped, so RDAP's "client hold" and WHOIS's "clientHold" both hit.
const SUSPICIOUS_STATUSES: &[&str] = &["clienthold", "serverhold", "pendingdelete"];

/// Looks up a domain's registration and scores it.
///
/// Never fails outright: lookup errors accumulate in `record.errors` and
/// scoring proceeds on whatever data was obtained.
pub async fn check_registration(client: &reqwest::Client, domain: &str) -> RegistrationRecord {
    let mut record = match rdap::lookup_rdap(client, domain).await {
        Ok(record) => {
            debug!("RDAP lookup succeeded for {}", domain);
            let mut record = record;
            record.source = RegistrationSource::Rdap;
            record
        }
        Err(e) => {
            debug!("RDAP lookup failed for {}: {}", domain, e);
            let mut record = RegistrationRecord::new(domain);
            record.errors.push(e);
            record
        }
    };

    if record.registrar.is_none() || record.creation_date.is_none() {
        match whois::lookup_whois(domain).await {
            Ok(fallback) => {
                debug!("WHOIS fallback produced data for {}", domain);
                record.merge_missing_from(fallback);
                if record.source == RegistrationSource::None {
                    record.source = RegistrationSource::WhoisFallback;
                }
            }
            Err(e) => {
                debug!("WHOIS fallback failed for {}: {}", domain, e);
                record.errors.push(e);
            }
        }
    }

    finalize(&mut record, Utc::now());
    record
}

/// Fills derived fields and computes the sub-score against a fixed `now`.
fn finalize(record: &mut RegistrationRecord, now: DateTime<Utc>) {
    if let Some(created) = record.creation_date {
        let days = (now - created).num_days();
        record.age_days = Some(days);
        record.age_months = Some(days / 30);
    }
    if let Some(expires) = record.expiration_date {
        record.days_until_expiry = Some((expires - now).num_days());
    }

    record.privacy_protected = detect_privacy(record);
    score(record);
}

/// A registrar or registrant field naming a privacy service counts.
fn detect_privacy(record: &RegistrationRecord) -> bool {
    let fields = [&record.registrar, &record.registrant_org];
    fields.into_iter().flatten().any(|value| {
        let lower = value.to_lowercase();
        PRIVACY_KEYWORDS.iter().any(|kw| lower.contains(kw))
    })
}

/// Registration-local risk sub-score. The aggregate verdict consumes only
/// the age signals; the rest of this rides in the report for the reader.
fn score(record: &mut RegistrationRecord) {
    let mut points: i32 = 0;
    let mut reasons: Vec<&'static str> = Vec::new();

    match record.age_days {
        Some(days) if days < 30 => {
            points += 40;
            reasons.push("very_new_domain");
        }
        Some(days) if days < 90 => {
            points += 25;
            reasons.push("new_domain");
        }
        Some(days) if days < 365 => {
            points += 10;
            reasons.push("young_domain");
        }
        Some(_) => {}
        None => {
            points += 20;
            reasons.push("missing_creation_date");
        }
    }

    if let Some(days) = record.days_until_expiry {
        if days < 30 {
            points += 20;
            reasons.push("expiring_soon");
        }
    }

    if record.privacy_protected {
        points += 15;
        reasons.push("privacy_protected");
    }

    if record.registrar.is_none() {
        points += 10;
        reasons.push("missing_registrar");
    }

    let signed = record
        .dnssec
        .as_deref()
        .is_some_and(|d| d.eq_ignore_ascii_case("signedDelegation"));
    if !signed {
        points += 5;
        reasons.push("dnssec_unsigned");
    }

    let distressed = record.statuses.iter().any(|status| {
        let folded = status.to_lowercase().replace(' ', "");
        SUSPICIOUS_STATUSES.iter().any(|s| folded.contains(s))
    });
    if distressed {
        points += 30;
        reasons.push("suspicious_status");
    }

    record.risk_score = points.clamp(0, 100) as u8;
    record.risk_label = if record.risk_score >= REGISTRATION_HIGH_THRESHOLD {
        "High Risk".to_string()
    } else if record.risk_score >= REGISTRATION_SUSPICIOUS_THRESHOLD {
        "Suspicious".to_string()
    } else {
        "Low Risk".to_string()
    };
    record.reasons = reasons;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn aged_record(age_days: i64) -> RegistrationRecord {
        let now = Utc::now();
        let mut record = RegistrationRecord::new("example.com");
        record.registrar = Some("Example Registrar LLC".to_string());
        record.creation_date = Some(now - Duration::days(age_days));
        record.expiration_date = Some(now + Duration::days(365));
        record.dnssec = Some("signedDelegation".to_string());
        finalize(&mut record, now);
        record
    }

    #[test]
    fn test_very_new_domain_scores_high() {
        let record = aged_record(5);
        assert_eq!(record.age_days, Some(5));
        assert!(record.reasons.contains(&"very_new_domain"));
        assert_eq!(record.risk_score, 40);
        assert_eq!(record.risk_label, "Suspicious");
    }

    #[test]
    fn test_established_domain_scores_low() {
        let record = aged_record(4000);
        assert!(record.reasons.is_empty());
        assert_eq!(record.risk_score, 0);
        assert_eq!(record.risk_label, "Low Risk");
    }

    #[test]
    fn test_age_bands() {
        assert!(aged_record(45).reasons.contains(&"new_domain"));
        assert!(aged_record(200).reasons.contains(&"young_domain"));
    }

    #[test]
    fn test_missing_data_penalized() {
        let mut record = RegistrationRecord::new("example.com");
        finalize(&mut record, Utc::now());
        assert!(record.reasons.contains(&"missing_creation_date"));
        assert!(record.reasons.contains(&"missing_registrar"));
        assert!(record.reasons.contains(&"dnssec_unsigned"));
        assert_eq!(record.risk_score, 35);
        assert_eq!(record.risk_label, "Suspicious");
    }

    #[test]
    fn test_expiring_soon() {
        let now = Utc::now();
        let mut record = RegistrationRecord::new("example.com");
        record.registrar = Some("Example Registrar LLC".to_string());
        record.creation_date = Some(now - Duration::days(4000));
        record.expiration_date = Some(now + Duration::days(10));
        record.dnssec = Some("signedDelegation".to_string());
        finalize(&mut record, now);
        assert_eq!(record.days_until_expiry, Some(10));
        assert!(record.reasons.contains(&"expiring_soon"));
    }

    #[test]
    fn test_privacy_detection_from_registrant_org() {
        let now = Utc::now();
        let mut record = RegistrationRecord::new("example.com");
        record.registrar = Some("Example Registrar LLC".to_string());
        record.registrant_org = Some("Domains By Proxy, Privacy Protected".to_string());
        record.creation_date = Some(now - Duration::days(4000));
        record.dnssec = Some("signedDelegation".to_string());
        finalize(&mut record, now);
        assert!(record.privacy_protected);
        assert!(record.reasons.contains(&"privacy_protected"));
    }

    #[test]
    fn test_privacy_detection_case_insensitive() {
        let mut record = RegistrationRecord::new("example.com");
        record.registrar = Some("REDACTED FOR PRIVACY".to_string());
        assert!(detect_privacy(&record));
    }

    #[test]
    fn test_suspicious_status() {
        let now = Utc::now();
        let mut record = RegistrationRecord::new("example.com");
        record.registrar = Some("Example Registrar LLC".to_string());
        record.creation_date = Some(now - Duration::days(4000));
        record.dnssec = Some("signedDelegation".to_string());
        record.statuses = vec!["clientHold https://icann.org/epp#clientHold".to_string()];
        finalize(&mut record, now);
        assert!(record.reasons.contains(&"suspicious_status"));
        assert_eq!(record.risk_score, 30);
    }

    #[test]
    fn test_dnssec_case_insensitive() {
        let now = Utc::now();
        let mut record = RegistrationRecord::new("example.com");
        record.registrar = Some("Example Registrar LLC".to_string());
        record.creation_date = Some(now - Duration::days(4000));
        record.dnssec = Some("SignedDelegation".to_string());
        finalize(&mut record, now);
        assert!(!record.reasons.contains(&"dnssec_unsigned"));
    }

    #[test]
    fn test_score_clamped_to_100() {
        let mut record = RegistrationRecord::new("example.com");
        record.statuses = vec!["pendingDelete".to_string()];
        record.registrant_org = Some("Whois Privacy Service".to_string());
        let now = Utc::now();
        record.expiration_date = Some(now + Duration::days(5));
        finalize(&mut record, now);
        // 20 + 20 + 15 + 10 + 5 + 30 = 100
        assert_eq!(record.risk_score, 100);
        assert_eq!(record.risk_label, "High Risk");
    }
}
