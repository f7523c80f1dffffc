//! Risk aggregation.
//!
//! Folds the checkers' already-normalized outputs into one verdict. Scoring
//! is purely additive over [`RiskSignal`]s, clamped to [0,100]; the label is
//! a step function of the score. Signals read derived boolean fields only,
//! never raw checker data, and a checker that failed simply contributes no
//! signals.

use serde::Serialize;

use crate::config::{HIGH_RISK_THRESHOLD, MEDIUM_RISK_THRESHOLD};
use crate::confusability::ConfusabilityReport;
use crate::registration::RegistrationRecord;
use crate::rules::ContentRuleReport;
use crate::tls::CertificateRecord;

/// One additive contribution to the aggregate score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiskSignal {
    pub reason_code: &'static str,
    pub weight: u8,
}

/// Final risk classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskLabel {
    #[serde(rename = "Low Risk")]
    LowRisk,
    #[serde(rename = "Medium Risk")]
    MediumRisk,
    #[serde(rename = "High Risk")]
    HighRisk,
}

impl RiskLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLabel::LowRisk => "Low Risk",
            RiskLabel::MediumRisk => "Medium Risk",
            RiskLabel::HighRisk => "High Risk",
        }
    }

    pub fn from_score(score: u8) -> Self {
        if score >= HIGH_RISK_THRESHOLD {
            RiskLabel::HighRisk
        } else if score >= MEDIUM_RISK_THRESHOLD {
            RiskLabel::MediumRisk
        } else {
            RiskLabel::LowRisk
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AggregateVerdict {
    pub score: u8,
    pub label: RiskLabel,
    /// Reason codes in emission order: certificate, registration, IDN,
    /// then content signals
    pub reasons: Vec<&'static str>,
}

/// Computes the final verdict from the checker bundle.
pub fn aggregate(
    certificate: &CertificateRecord,
    registration: &RegistrationRecord,
    confusability: &ConfusabilityReport,
    rules: &ContentRuleReport,
) -> AggregateVerdict {
    fold_signals(&collect_signals(
        certificate,
        registration,
        confusability,
        rules,
    ))
}

/// Emits each signal at most once, in fixed category order.
pub fn collect_signals(
    certificate: &CertificateRecord,
    registration: &RegistrationRecord,
    confusability: &ConfusabilityReport,
    rules: &ContentRuleReport,
) -> Vec<RiskSignal> {
    let mut signals = Vec::new();

    if !certificate.https_ok {
        signals.push(RiskSignal {
            reason_code: "no_https",
            weight: 30,
        });
    }
    if certificate.expired {
        signals.push(RiskSignal {
            reason_code: "expired_cert",
            weight: 30,
        });
    }

    match registration.age_days {
        Some(age) if age < 30 => signals.push(RiskSignal {
            reason_code: "very_new_domain",
            weight: 30,
        }),
        Some(age) if age < 180 => signals.push(RiskSignal {
            reason_code: "new_domain",
            weight: 15,
        }),
        _ => {}
    }

    if confusability.unicode_detection.is_idn {
        signals.push(RiskSignal {
            reason_code: "idn_domain",
            weight: 10,
        });
    }
    if confusability.unicode_detection.mixed_confusable_scripts {
        signals.push(RiskSignal {
            reason_code: "mixed_scripts",
            weight: 25,
        });
    }

    if rules.has_suspicious_words {
        signals.push(RiskSignal {
            reason_code: "phishy_words",
            weight: 15,
        });
    }
    if rules.has_brand_words_in_host {
        signals.push(RiskSignal {
            reason_code: "brand_in_host",
            weight: 20,
        });
    }

    signals
}

/// Sums signal weights with saturation, clamps to 100, and labels the
/// result. Reason order follows signal order.
pub fn fold_signals(signals: &[RiskSignal]) -> AggregateVerdict {
    let total: u32 = signals.iter().map(|s| u32::from(s.weight)).sum();
    let score = total.min(100) as u8;

    AggregateVerdict {
        score,
        label: RiskLabel::from_score(score),
        reasons: signals.iter().map(|s| s.reason_code).collect(),
    }
}
