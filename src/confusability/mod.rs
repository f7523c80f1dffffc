//! Unicode/IDN confusability checker.
//!
//! Pure function over the hostname: eight sub-checks, each scored 0-100
//! (higher is safer), combined by fixed weights into one composite
//! legibility score. A flat penalty applies when the hostname itself
//! contains a phishing keyword; the penalty lands after the weighted sum
//! and before clamping, so it can drive a perfect hostname to the floor.

mod homoglyph;
mod types;

use std::collections::{BTreeSet, HashMap};
use std::sync::OnceLock;

use regex::Regex;
use unicode_script::{Script, UnicodeScript};

use crate::config::CONFUSABILITY_KEYWORD_PENALTY;

pub use types::{
    CharacterSetCheck, ConfusabilityReport, EncodedCheck, EncodedPair, EntropyCheck,
    HomographCheck, HomographMatch, InvisibleCheck, LegibilityCheck, PunycodeCheck, UnicodeCheck,
};

/// Hostname-level phishing keywords that trigger the flat penalty.
const PENALTY_KEYWORDS: &[&str] = &[
    "login", "signin", "verify", "secure", "account", "update", "confirm", "password", "banking",
    "wallet",
];

/// Zero-width and BOM code points abused to disguise hostnames.
const ZERO_WIDTH: &[char] = &['\u{200B}', '\u{200C}', '\u{200D}', '\u{2060}', '\u{FEFF}'];

/// Explicit bidirectional control characters.
const RTL_CONTROLS: &[char] = &['\u{200F}', '\u{202B}', '\u{202E}'];

/// Analyzes a hostname (and optionally the full URL, for percent-encoding
/// checks) for confusability. Total function: malformed input degrades
/// individual sub-checks and lands in `errors`, never panics.
pub fn analyze(hostname: &str, full_url: Option<&str>) -> ConfusabilityReport {
    let mut report = ConfusabilityReport {
        hostname: hostname.to_string(),
        ..Default::default()
    };

    // The Unicode form drives script and homograph analysis; a punycode
    // hostname is decoded first so the disguise is analyzed, not the ACE
    // armor around it.
    let is_punycode = hostname
        .split('.')
        .any(|label| label.starts_with("xn--"));
    let unicode_form = if is_punycode {
        let (decoded, result) = idna::domain_to_unicode(hostname);
        if let Err(e) = result {
            report.errors.push(format!("punycode decode error: {:?}", e));
        }
        decoded
    } else {
        hostname.to_string()
    };

    report.character_set = check_character_set(hostname);
    report.punycode_check = PunycodeCheck {
        is_punycode,
        decoded: is_punycode.then(|| unicode_form.clone()),
        score: if is_punycode { 40 } else { 100 },
    };
    report.unicode_detection = check_unicode(&unicode_form, &mut report.errors);
    report.homograph_detection = check_homographs(&unicode_form);
    report.encoded_characters = check_encoded(full_url.unwrap_or(hostname));
    report.invisible_characters = check_invisible(hostname, &unicode_form);
    report.entropy_check = check_entropy(hostname);
    report.url_legibility = check_legibility(hostname);

    let composite = weighted_sum(&report).round() as i32;
    let lowered = hostname.to_lowercase();
    report.keyword_penalty_applied = PENALTY_KEYWORDS.iter().any(|kw| lowered.contains(kw));
    let penalized = if report.keyword_penalty_applied {
        composite - CONFUSABILITY_KEYWORD_PENALTY
    } else {
        composite
    };
    report.score = penalized.clamp(0, 100) as u8;

    report
}

/// Fixed sub-check weights. Exposed for tests that verify the penalty
/// arithmetic against the reported sub-scores.
pub(crate) fn weighted_sum(report: &ConfusabilityReport) -> f64 {
    f64::from(report.character_set.score) * 0.20
        + f64::from(report.unicode_detection.score) * 0.20
        + f64::from(report.punycode_check.score) * 0.15
        + f64::from(report.homograph_detection.score) * 0.20
        + f64::from(report.encoded_characters.score) * 0.10
        + f64::from(report.invisible_characters.score) * 0.10
        + f64::from(report.entropy_check.score) * 0.05
        + f64::from(report.url_legibility.score) * 0.10
}

fn check_character_set(hostname: &str) -> CharacterSetCheck {
    let mut suspicious: Vec<String> = Vec::new();
    for ch in hostname.chars() {
        if !ch.is_ascii() {
            let rendered = ch.to_string();
            if !suspicious.contains(&rendered) {
                suspicious.push(rendered);
            }
        }
    }
    let ascii_only = suspicious.is_empty();
    CharacterSetCheck {
        ascii_only,
        score: if ascii_only { 100 } else { 40 },
        suspicious_chars: suspicious,
    }
}

fn script_name(ch: char) -> Option<&'static str> {
    match ch.script() {
        Script::Latin => Some("Latin"),
        Script::Cyrillic => Some("Cyrillic"),
        Script::Greek => Some("Greek"),
        Script::Hebrew => Some("Hebrew"),
        Script::Arabic => Some("Arabic"),
        Script::Devanagari => Some("Devanagari"),
        Script::Hiragana => Some("Hiragana"),
        Script::Katakana => Some("Katakana"),
        Script::Hangul => Some("Hangul"),
        Script::Han => Some("CJK"),
        Script::Common | Script::Inherited => None,
        _ => Some("Other"),
    }
}

fn check_unicode(unicode_form: &str, errors: &mut Vec<String>) -> UnicodeCheck {
    let mut check = UnicodeCheck::default();

    match idna::domain_to_ascii(unicode_form) {
        Ok(ace) => {
            check.is_idn = ace.split('.').any(|label| label.starts_with("xn--"));
            check.punycode = Some(ace);
        }
        Err(e) => errors.push(format!("idn encode error: {:?}", e)),
    }

    let mut scripts: BTreeSet<&'static str> = BTreeSet::new();
    let mut has_rtl = false;
    for ch in unicode_form.chars() {
        if ch == '.' || ch.is_control() {
            continue;
        }
        if let Some(name) = script_name(ch) {
            scripts.insert(name);
            if name == "Hebrew" || name == "Arabic" {
                has_rtl = true;
            }
        }
        if RTL_CONTROLS.contains(&ch) {
            has_rtl = true;
        }
    }

    let confusable = ["Latin", "Cyrillic", "Greek"]
        .iter()
        .filter(|s| scripts.contains(**s))
        .count();

    check.mixed_scripts = scripts.len() > 1;
    check.mixed_confusable_scripts = confusable > 1;
    check.has_rtl = has_rtl;
    check.scripts = scripts.into_iter().map(String::from).collect();
    check.score = if check.mixed_confusable_scripts {
        20
    } else if check.is_idn {
        60
    } else {
        100
    };
    check
}

fn check_homographs(unicode_form: &str) -> HomographCheck {
    let patterns = homoglyph::detect_homographs(unicode_form);
    let detected = !patterns.is_empty();
    let score = (100 - 25 * patterns.len() as i32).max(0) as u8;
    HomographCheck {
        detected,
        patterns,
        score,
    }
}

fn percent_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"%[0-9A-Fa-f]{2}").unwrap())
}

fn check_encoded(text: &str) -> EncodedCheck {
    let decoded: Vec<EncodedPair> = percent_pattern()
        .find_iter(text)
        .filter_map(|m| {
            let encoded = m.as_str();
            let byte = u8::from_str_radix(&encoded[1..], 16).ok()?;
            Some(EncodedPair {
                encoded: encoded.to_string(),
                decoded: if byte.is_ascii_graphic() || byte == b' ' {
                    (byte as char).to_string()
                } else {
                    format!("0x{:02X}", byte)
                },
            })
        })
        .collect();

    let detected = !decoded.is_empty();
    let score = if detected {
        (100 - 15 * decoded.len() as i32).max(20) as u8
    } else {
        100
    };
    EncodedCheck {
        detected,
        decoded,
        score,
    }
}

fn check_invisible(hostname: &str, unicode_form: &str) -> InvisibleCheck {
    let mut characters: Vec<String> = Vec::new();
    for source in [hostname, unicode_form] {
        for ch in source.chars() {
            if ZERO_WIDTH.contains(&ch) {
                let rendered = format!("U+{:04X}", ch as u32);
                if !characters.contains(&rendered) {
                    characters.push(rendered);
                }
            }
        }
    }
    let detected = !characters.is_empty();
    InvisibleCheck {
        detected,
        characters,
        score: if detected { 0 } else { 100 },
    }
}

/// Shannon entropy over the case-folded alphanumeric characters.
pub(crate) fn shannon_entropy(text: &str) -> f64 {
    let chars: Vec<char> = text
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect();
    if chars.is_empty() {
        return 0.0;
    }

    let mut counts: HashMap<char, usize> = HashMap::new();
    for &ch in &chars {
        *counts.entry(ch).or_default() += 1;
    }

    let total = chars.len() as f64;
    counts
        .values()
        .map(|&count| {
            let p = count as f64 / total;
            -p * p.log2()
        })
        .sum()
}

fn entropy_level(entropy: f64) -> &'static str {
    if entropy < 2.0 {
        "Low"
    } else if entropy < 3.0 {
        "Moderate"
    } else if entropy < 4.0 {
        "High"
    } else {
        "Very High"
    }
}

fn check_entropy(hostname: &str) -> EntropyCheck {
    let entropy = shannon_entropy(hostname);
    let level = entropy_level(entropy);
    let score = match level {
        "Low" => 100,
        "Moderate" => 80,
        "High" => 50,
        _ => 20,
    };
    EntropyCheck {
        entropy,
        level,
        score,
    }
}

fn check_legibility(hostname: &str) -> LegibilityCheck {
    let mut issues: Vec<&'static str> = Vec::new();

    if hostname.len() > 30 {
        issues.push("long_hostname");
    }

    let total = hostname.chars().count();
    if total > 0 {
        let digits = hostname.chars().filter(char::is_ascii_digit).count();
        if digits as f64 / total as f64 > 0.3 {
            issues.push("digit_heavy");
        }
    }

    if hostname.matches('-').count() > 3 {
        issues.push("hyphen_heavy");
    }
    if hostname.matches('.').count() > 3 {
        issues.push("deep_subdomains");
    }

    let score = (100 - 25 * issues.len() as i32).max(20) as u8;
    LegibilityCheck {
        readability: if issues.is_empty() {
            "Readable and structured"
        } else {
            "Hard to read"
        },
        issues,
        score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_hostname_scores_high() {
        let report = analyze("example.com", None);
        assert!(report.character_set.ascii_only);
        assert!(!report.unicode_detection.is_idn);
        assert!(!report.keyword_penalty_applied);
        assert!(report.score >= 90);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_punycode_scores_strictly_lower_than_ascii() {
        let ascii = analyze("example.com", None);
        let punycode = analyze("xn--80ak6aa92e.com", None);
        assert!(punycode.punycode_check.is_punycode);
        assert!(punycode.score < ascii.score);
    }

    #[test]
    fn test_keyword_penalty_is_exactly_fifty() {
        let report = analyze("secure-login.example.com", None);
        assert!(report.keyword_penalty_applied);
        let expected = (weighted_sum(&report).round() as i32 - 50).clamp(0, 100) as u8;
        assert_eq!(report.score, expected);
        assert!(report.score <= 50);
    }

    #[test]
    fn test_mixed_confusable_scripts_detected() {
        let report = analyze("pаypal.com", None);
        assert!(report.unicode_detection.mixed_confusable_scripts);
        assert!(report.homograph_detection.detected);
        assert!(!report.character_set.ascii_only);
    }

    #[test]
    fn test_single_script_idn_not_mixed() {
        let report = analyze("bücher.example", None);
        assert!(report.unicode_detection.is_idn);
        assert!(!report.unicode_detection.mixed_confusable_scripts);
    }

    #[test]
    fn test_zero_width_characters_floor_the_subscore() {
        let report = analyze("exam\u{200B}ple.com", None);
        assert!(report.invisible_characters.detected);
        assert_eq!(report.invisible_characters.score, 0);
        assert_eq!(report.invisible_characters.characters, vec!["U+200B"]);
    }

    #[test]
    fn test_percent_encoding_decoded() {
        let report = analyze("example.com", Some("https://example.com/a%2Eb%20c"));
        assert!(report.encoded_characters.detected);
        assert_eq!(report.encoded_characters.decoded.len(), 2);
        assert_eq!(report.encoded_characters.decoded[0].decoded, ".");
        assert_eq!(report.encoded_characters.decoded[1].decoded, " ");
    }

    #[test]
    fn test_entropy_levels() {
        assert_eq!(entropy_level(1.5), "Low");
        assert_eq!(entropy_level(2.5), "Moderate");
        assert_eq!(entropy_level(3.5), "High");
        assert_eq!(entropy_level(4.5), "Very High");
    }

    #[test]
    fn test_entropy_of_repeated_char_is_zero() {
        assert_eq!(shannon_entropy("aaaa"), 0.0);
    }

    #[test]
    fn test_entropy_empty_input() {
        assert_eq!(shannon_entropy("..."), 0.0);
    }

    #[test]
    fn test_legibility_issues() {
        let report = analyze("a1-b2-c3-d4-e5.really.long.random.host12345.com", None);
        assert!(!report.url_legibility.issues.is_empty());
        assert!(report.url_legibility.issues.contains(&"long_hostname"));
        assert_eq!(report.url_legibility.readability, "Hard to read");
    }

    #[test]
    fn test_score_clamped_at_floor() {
        // Penalty keyword plus a pile of bad sub-scores cannot go below 0
        let report = analyze("secure-login-verify.xn--80ak6aa92e.com", None);
        assert!(report.keyword_penalty_applied);
        assert!(report.score <= 50);
    }
}
