//! Homoglyph detection.
//!
//! Two passes over the Unicode form of the hostname: a direct table of
//! known look-alike code points, then a script heuristic that flags any
//! remaining non-ASCII character from a visually-overlapping block and
//! guesses its ASCII counterpart from the NFKD decomposition.

use unicode_normalization::UnicodeNormalization;
use unicode_script::{Script, UnicodeScript};

use crate::config::MAX_HOMOGRAPH_MATCHES;

use super::types::HomographMatch;

/// ASCII base letter and the code points commonly substituted for it.
const CONFUSABLES: &[(char, &[char])] = &[
    ('a', &['а', 'ɑ', 'ά', 'à', 'á', 'â', 'ä', 'ã', 'å']),
    ('e', &['е', 'є', 'ẻ', 'é', 'è', 'ê', 'ë']),
    ('o', &['ο', 'о', 'ỏ', 'ó', 'ò', 'ô', 'ö', 'õ']),
    ('p', &['р']),
    ('c', &['с', 'ϲ']),
    ('y', &['у', 'ү']),
    ('x', &['х']),
    ('g', &['ɡ']),
    ('l', &['ⅼ', 'ӏ']),
];

/// Block tag used in the report in place of a full Unicode name.
pub(crate) fn script_tag(ch: char) -> &'static str {
    if ('\u{FF01}'..='\u{FF5E}').contains(&ch) {
        return "FULLWIDTH";
    }
    if ('\u{FF61}'..='\u{FFDC}').contains(&ch) {
        return "HALFWIDTH";
    }
    match ch.script() {
        Script::Latin => "LATIN",
        Script::Cyrillic => "CYRILLIC",
        Script::Greek => "GREEK",
        Script::Arabic => "ARABIC",
        Script::Hebrew => "HEBREW",
        _ => "OTHER",
    }
}

fn table_lookup(ch: char) -> Option<char> {
    CONFUSABLES
        .iter()
        .find(|(_, variants)| variants.contains(&ch))
        .map(|(base, _)| *base)
}

/// Guesses the ASCII letter a character imitates. Fullwidth forms map by
/// offset; everything else goes through NFKD and keeps the first ASCII
/// alphanumeric the decomposition yields.
fn ascii_guess(ch: char) -> Option<char> {
    if ('\u{FF01}'..='\u{FF5E}').contains(&ch) {
        return char::from_u32(ch as u32 - 0xFEE0);
    }
    ch.nfkd().find(|c| c.is_ascii_alphanumeric())
}

/// Runs both passes and merges the matches, capped at the first
/// [`MAX_HOMOGRAPH_MATCHES`] for payload-size control.
pub(crate) fn detect_homographs(hostname: &str) -> Vec<HomographMatch> {
    let mut matches: Vec<HomographMatch> = Vec::new();

    for (position, ch) in hostname.chars().enumerate() {
        if matches.len() >= MAX_HOMOGRAPH_MATCHES {
            break;
        }
        if ch.is_ascii() {
            continue;
        }

        if let Some(base) = table_lookup(ch) {
            matches.push(HomographMatch {
                position,
                character: ch.to_string(),
                looks_like: Some(base.to_string()),
                unicode_name: script_tag(ch),
            });
            continue;
        }

        let tag = script_tag(ch);
        if matches!(
            tag,
            "CYRILLIC" | "GREEK" | "ARABIC" | "FULLWIDTH" | "HALFWIDTH"
        ) {
            matches.push(HomographMatch {
                position,
                character: ch.to_string(),
                looks_like: ascii_guess(ch).map(|c| c.to_string()),
                unicode_name: tag,
            });
        }
    }

    matches
}
