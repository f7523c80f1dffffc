//! Registration lookup data structures.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Which tier produced the primary registration data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationSource {
    Rdap,
    WhoisFallback,
    #[default]
    None,
}

impl RegistrationSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationSource::Rdap => "rdap",
            RegistrationSource::WhoisFallback => "whois_fallback",
            RegistrationSource::None => "none",
        }
    }
}

/// Everything learned about a domain's registration.
///
/// Structurally complete from creation; lookups only fill fields in. Merging
/// across tiers is first-writer-wins: a later source never overwrites a
/// field an earlier source populated.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RegistrationRecord {
    /// Registrable domain the lookup ran against
    pub domain: String,
    pub registrar: Option<String>,
    pub registry_domain_id: Option<String>,
    pub registrar_iana_id: Option<String>,
    pub registrar_abuse_email: Option<String>,
    pub registrar_abuse_phone: Option<String>,
    pub creation_date: Option<DateTime<Utc>>,
    pub expiration_date: Option<DateTime<Utc>>,
    pub updated_date: Option<DateTime<Utc>>,
    pub age_days: Option<i64>,
    pub age_months: Option<i64>,
    pub days_until_expiry: Option<i64>,
    /// EPP status codes, e.g. "clientTransferProhibited"
    pub statuses: Vec<String>,
    pub nameservers: Vec<String>,
    /// "signedDelegation" or "unsigned"
    pub dnssec: Option<String>,
    /// Registrar or registrant fields indicate a privacy service
    pub privacy_protected: bool,
    pub registrant_org: Option<String>,
    /// ISO 3166-1 alpha-2 where the source provides one
    pub registrant_country: Option<String>,
    pub admin_email: Option<String>,
    pub tech_email: Option<String>,
    pub abuse_email: Option<String>,
    pub source: RegistrationSource,
    /// Registration-local risk sub-score; the aggregate verdict consumes
    /// only the age signals, this rides in the report
    pub risk_score: u8,
    pub risk_label: String,
    pub reasons: Vec<&'static str>,
    pub errors: Vec<String>,
}

impl RegistrationRecord {
    pub fn new(domain: &str) -> Self {
        RegistrationRecord {
            domain: domain.to_string(),
            ..Default::default()
        }
    }

    /// First-writer-wins merge: fields already populated in `self` are kept,
    /// gaps are filled from `other`. Errors accumulate from both sides.
    pub fn merge_missing_from(&mut self, other: RegistrationRecord) {
        fn fill<T>(slot: &mut Option<T>, value: Option<T>) {
            if slot.is_none() {
                *slot = value;
            }
        }

        fill(&mut self.registrar, other.registrar);
        fill(&mut self.registry_domain_id, other.registry_domain_id);
        fill(&mut self.registrar_iana_id, other.registrar_iana_id);
        fill(&mut self.registrar_abuse_email, other.registrar_abuse_email);
        fill(&mut self.registrar_abuse_phone, other.registrar_abuse_phone);
        fill(&mut self.creation_date, other.creation_date);
        fill(&mut self.expiration_date, other.expiration_date);
        fill(&mut self.updated_date, other.updated_date);
        fill(&mut self.dnssec, other.dnssec);
        fill(&mut self.registrant_org, other.registrant_org);
        fill(&mut self.registrant_country, other.registrant_country);
        fill(&mut self.admin_email, other.admin_email);
        fill(&mut self.tech_email, other.tech_email);
        fill(&mut self.abuse_email, other.abuse_email);
        if self.statuses.is_empty() {
            self.statuses = other.statuses;
        }
        if self.nameservers.is_empty() {
            self.nameservers = other.nameservers;
        }
        self.errors.extend(other.errors);
    }
}
