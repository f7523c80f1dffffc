//! Analysis report assembly.
//!
//! The report is the crate's output contract: one fixed-shape structure per
//! analyzed URL, carrying every checker's record, per-checker timings and
//! errors, and the aggregate verdict. Fixed fields rather than a keyed map,
//! so a missing entry is a compile error instead of a serialization surprise.

use colored::Colorize;
use serde::Serialize;

use crate::aggregate::{AggregateVerdict, RiskLabel};
use crate::confusability::ConfusabilityReport;
use crate::headers::HeaderReport;
use crate::keywords::KeywordReport;
use crate::ml::MlReport;
use crate::registration::RegistrationRecord;
use crate::rules::ContentRuleReport;
use crate::tls::CertificateRecord;

/// Wall-clock duration of each checker, in milliseconds.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct CheckerTimings {
    pub ssl_ms: u64,
    pub registration_ms: u64,
    pub idn_ms: u64,
    pub rules_ms: u64,
    pub keywords_ms: u64,
    pub headers_ms: u64,
    pub ml_ms: u64,
}

/// Per-checker error strings, mirrored out of the individual records so a
/// consumer can scan failures without walking every record.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CheckerErrors {
    pub ssl: Vec<String>,
    pub registration: Vec<String>,
    pub idn: Vec<String>,
    pub rules: Vec<String>,
    pub keywords: Vec<String>,
    pub headers: Vec<String>,
    pub ml: Vec<String>,
}

/// The full checker bundle for one URL.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CheckResults {
    pub ssl: CertificateRecord,
    pub registration: RegistrationRecord,
    pub idn: ConfusabilityReport,
    pub rules: ContentRuleReport,
    pub keywords: KeywordReport,
    pub headers: HeaderReport,
    /// Absent when the model is disabled or unavailable
    pub ml: Option<MlReport>,
}

/// Complete analysis result for one normalized URL.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub url: String,
    pub results: CheckResults,
    pub timings: CheckerTimings,
    pub errors: CheckerErrors,
    pub reasons: Vec<&'static str>,
    pub risk_score: u8,
    pub risk_label: RiskLabel,
}

impl AnalysisReport {
    /// Assembles the report from the checker bundle and the verdict. Error
    /// lists are copied out of the records here, once, so the two views
    /// cannot drift.
    pub fn assemble(
        url: &str,
        results: CheckResults,
        timings: CheckerTimings,
        verdict: AggregateVerdict,
    ) -> Self {
        let errors = CheckerErrors {
            ssl: results.ssl.errors.clone(),
            registration: results.registration.errors.clone(),
            idn: results.idn.errors.clone(),
            rules: results.rules.errors.clone(),
            keywords: results.keywords.errors.clone(),
            headers: results.headers.errors.clone(),
            ml: results
                .ml
                .as_ref()
                .map(|ml| ml.errors.clone())
                .unwrap_or_default(),
        };

        AnalysisReport {
            url: url.to_string(),
            results,
            timings,
            errors,
            reasons: verdict.reasons,
            risk_score: verdict.score,
            risk_label: verdict.label,
        }
    }

    /// Human-readable verdict block for terminal output.
    pub fn render_plain(&self) -> String {
        let label = match self.risk_label {
            RiskLabel::HighRisk => self.risk_label.as_str().red().bold(),
            RiskLabel::MediumRisk => self.risk_label.as_str().yellow().bold(),
            RiskLabel::LowRisk => self.risk_label.as_str().green().bold(),
        };

        let mut out = String::new();
        out.push_str(&format!("{}\n", self.url.bold()));
        out.push_str(&format!(
            "  Risk:          {}/100 ({})\n",
            self.risk_score, label
        ));
        if self.reasons.is_empty() {
            out.push_str("  Reasons:       none\n");
        } else {
            out.push_str(&format!("  Reasons:       {}\n", self.reasons.join(", ")));
        }

        let ssl = &self.results.ssl;
        let https = if ssl.certificate_valid {
            "valid certificate".to_string()
        } else if ssl.https_ok {
            "reachable, certificate not trusted".to_string()
        } else {
            "unreachable".to_string()
        };
        out.push_str(&format!("  HTTPS:         {}\n", https));

        let registration = &self.results.registration;
        match registration.age_days {
            Some(age) => out.push_str(&format!("  Domain age:    {} days\n", age)),
            None => out.push_str("  Domain age:    unknown\n"),
        }
        if let Some(registrar) = &registration.registrar {
            out.push_str(&format!("  Registrar:     {}\n", registrar));
        }

        out.push_str(&format!(
            "  Legibility:    {}/100\n",
            self.results.idn.score
        ));

        if let Some(ml) = &self.results.ml {
            out.push_str(&format!(
                "  ML score:      {}/100 ({})\n",
                ml.score, ml.label
            ));
        }

        let error_count = self.errors.ssl.len()
            + self.errors.registration.len()
            + self.errors.idn.len()
            + self.errors.rules.len()
            + self.errors.keywords.len()
            + self.errors.headers.len()
            + self.errors.ml.len();
        if error_count > 0 {
            out.push_str(&format!("  Checker errors: {}\n", error_count));
        }
        out
    }
}
