//! Header field extraction: labeled scalar fields pulled from the full
//! document text via the ordered rule table in [`patterns`].

use regex::Regex;

use super::patterns::EXPORT_FIELD_RULES;
use crate::record::FieldMap;
use crate::schema::{EXPORT_COLUMNS, NOISE_WORDS};

/// True if a captured value is really a neighbouring table-header word.
pub fn is_noise(value: &str) -> bool {
    let trimmed = value.trim();
    NOISE_WORDS.iter().any(|w| trimmed.eq_ignore_ascii_case(w))
}

/// First capture group for the rule, trimmed and noise-filtered.
/// Returns "" on no match or a noise capture; never errors.
pub fn find_first(rule: &Regex, text: &str) -> String {
    match rule.captures(text) {
        Some(caps) => {
            let value = caps[1].trim();
            if is_noise(value) {
                String::new()
            } else {
                value.to_string()
            }
        }
        None => String::new(),
    }
}

/// Run the export header rule table over the text. Every schema field is
/// present in the result; unmatched fields stay empty.
pub fn extract_headers(text: &str) -> FieldMap {
    let mut map = FieldMap::new(&EXPORT_COLUMNS);
    for (field, rule) in EXPORT_FIELD_RULES.iter() {
        let value = find_first(rule, text);
        if !value.is_empty() {
            map.set(field, value);
        }
    }
    map
}
