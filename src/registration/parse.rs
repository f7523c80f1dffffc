//! Registration data parsing: dates and raw WHOIS text.

use chrono::{DateTime, Utc};
use regex::Regex;
use std::sync::OnceLock;

use super::types::RegistrationRecord;

/// Attempts to parse a date string in the formats registries actually emit.
pub(crate) fn parse_date_string(date_str: &str) -> Option<DateTime<Utc>> {
    let date_str = date_str.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(date_str) {
        return Some(dt.with_timezone(&Utc));
    }

    let formats = [
        "%Y-%m-%dT%H:%M:%S%.fZ",
        "%Y-%m-%dT%H:%M:%SZ",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d",
        "%d-%b-%Y",
        "%d/%m/%Y",
    ];

    for format in &formats {
        if let Ok(dt) = DateTime::parse_from_str(date_str, format) {
            return Some(dt.with_timezone(&Utc));
        }
        if let Ok(naive_dt) = chrono::NaiveDateTime::parse_from_str(date_str, format) {
            return Some(naive_dt.and_utc());
        }
        if let Ok(naive_date) = chrono::NaiveDate::parse_from_str(date_str, format) {
            return Some(naive_date.and_hms_opt(0, 0, 0)?.and_utc());
        }
    }

    None
}

struct WhoisPatterns {
    registry_domain_id: Regex,
    registrar: Regex,
    registrar_iana_id: Regex,
    abuse_email: Regex,
    abuse_phone: Regex,
    creation_date: Regex,
    expiration_date: Regex,
    updated_date: Regex,
    status: Regex,
    nameserver: Regex,
    dnssec: Regex,
}

fn patterns() -> &'static WhoisPatterns {
    static PATTERNS: OnceLock<WhoisPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| WhoisPatterns {
        registry_domain_id: Regex::new(r"(?im)^\s*Registry Domain ID:\s*(.+)$").unwrap(),
        registrar: Regex::new(r"(?im)^\s*Registrar:\s*(.+)$").unwrap(),
        registrar_iana_id: Regex::new(r"(?im)^\s*Registrar IANA ID:\s*(.+)$").unwrap(),
        abuse_email: Regex::new(r"(?im)^\s*Registrar Abuse Contact Email:\s*(.+)$").unwrap(),
        abuse_phone: Regex::new(r"(?im)^\s*Registrar Abuse Contact Phone:\s*(.+)$").unwrap(),
        creation_date: Regex::new(r"(?im)^\s*(?:Creation Date|Created On|Registered On):\s*(.+)$")
            .unwrap(),
        expiration_date: Regex::new(
            r"(?im)^\s*(?:Registry Expiry Date|Expiration Date|Expiry Date):\s*(.+)$",
        )
        .unwrap(),
        updated_date: Regex::new(r"(?im)^\s*(?:Updated Date|Last Updated):\s*(.+)$").unwrap(),
        status: Regex::new(r"(?im)^\s*Domain Status:\s*(\S+)").unwrap(),
        nameserver: Regex::new(r"(?im)^\s*Name Server:\s*(\S+)").unwrap(),
        dnssec: Regex::new(r"(?im)^\s*DNSSEC:\s*(.+)$").unwrap(),
    })
}

/// Extracts registration fields from raw port-43 WHOIS text.
///
/// Only the fields present in the text are populated; the caller merges the
/// result into whatever RDAP produced.
pub(crate) fn parse_whois_text(domain: &str, text: &str) -> RegistrationRecord {
    let p = patterns();
    let mut record = RegistrationRecord::new(domain);

    let capture = |re: &Regex| {
        re.captures(text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| !s.is_empty())
    };

    record.registry_domain_id = capture(&p.registry_domain_id);
    record.registrar = capture(&p.registrar);
    record.registrar_iana_id = capture(&p.registrar_iana_id);
    record.registrar_abuse_email = capture(&p.abuse_email);
    record.registrar_abuse_phone = capture(&p.abuse_phone);
    record.creation_date = capture(&p.creation_date).and_then(|s| parse_date_string(&s));
    record.expiration_date = capture(&p.expiration_date).and_then(|s| parse_date_string(&s));
    record.updated_date = capture(&p.updated_date).and_then(|s| parse_date_string(&s));
    record.dnssec = capture(&p.dnssec);

    record.statuses = p
        .status
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .collect();
    record.nameservers = p
        .nameserver
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().to_lowercase())
        .collect();

    record
}
