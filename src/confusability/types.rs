//! Confusability analysis data structures.
//!
//! Every sub-check carries its own 0-100 score (higher is safer) so the
//! composite in `mod.rs` is a plain weighted sum over fields the report
//! already exposes.

use serde::Serialize;

/// Non-ASCII presence in the hostname as given.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CharacterSetCheck {
    pub ascii_only: bool,
    pub suspicious_chars: Vec<String>,
    pub score: u8,
}

/// IDN and script analysis, run over the Unicode form of the hostname.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UnicodeCheck {
    pub is_idn: bool,
    /// ACE (punycode) form of the hostname when encodable
    pub punycode: Option<String>,
    pub scripts: Vec<String>,
    pub mixed_scripts: bool,
    /// More than one of Latin, Cyrillic, Greek present
    pub mixed_confusable_scripts: bool,
    pub has_rtl: bool,
    pub score: u8,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PunycodeCheck {
    pub is_punycode: bool,
    pub decoded: Option<String>,
    pub score: u8,
}

/// One look-alike character found in the hostname.
#[derive(Debug, Clone, Serialize)]
pub struct HomographMatch {
    pub position: usize,
    pub character: String,
    pub looks_like: Option<String>,
    pub unicode_name: &'static str,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct HomographCheck {
    pub detected: bool,
    pub patterns: Vec<HomographMatch>,
    pub score: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct EncodedPair {
    pub encoded: String,
    pub decoded: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct EncodedCheck {
    pub detected: bool,
    pub decoded: Vec<EncodedPair>,
    pub score: u8,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct InvisibleCheck {
    pub detected: bool,
    /// "U+XXXX" notation for each zero-width character found
    pub characters: Vec<String>,
    pub score: u8,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct EntropyCheck {
    /// Shannon entropy over case-folded alphanumerics
    pub entropy: f64,
    pub level: &'static str,
    pub score: u8,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct LegibilityCheck {
    pub readability: &'static str,
    pub issues: Vec<&'static str>,
    pub score: u8,
}

/// Full confusability report for one hostname.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfusabilityReport {
    pub hostname: String,
    pub character_set: CharacterSetCheck,
    pub unicode_detection: UnicodeCheck,
    pub punycode_check: PunycodeCheck,
    pub homograph_detection: HomographCheck,
    pub encoded_characters: EncodedCheck,
    pub invisible_characters: InvisibleCheck,
    pub entropy_check: EntropyCheck,
    pub url_legibility: LegibilityCheck,
    /// Flat penalty was applied for a phishing keyword in the hostname
    pub keyword_penalty_applied: bool,
    /// Composite legibility score, higher is safer
    pub score: u8,
    pub errors: Vec<String>,
}
