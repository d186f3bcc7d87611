//! Token-plucking decomposition of a product-description line into
//! Variety / Grade / Size / Packaging.
//!
//! The algorithm is destructive: each step extracts a value and removes
//! the matched span from the working remainder, so later steps never
//! re-match it. Order is fixed: material code, Size, Packaging, Grade,
//! then cleanup of whatever is left into Variety.

use std::ops::Range;

use super::patterns::{
    normalize_pack_word, BULK_PHRASE, GRADE_TABLE, MATERIAL_CODE, PACK_TOKEN, RESIDUAL_CODE,
    SIZE_TOKEN,
};
use crate::schema::SIZE_SENTINEL;
use crate::text::{collapse_whitespace, title_case};

/// The four descriptive attributes of a product line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductAttributes {
    pub variety: String,
    pub grade: String,
    pub size: String,
    pub packaging: String,
}

impl Default for ProductAttributes {
    fn default() -> Self {
        Self {
            variety: String::new(),
            grade: String::new(),
            size: SIZE_SENTINEL.to_string(),
            packaging: String::new(),
        }
    }
}

impl ProductAttributes {
    /// True when nothing beyond the defaults was extracted.
    pub fn is_blank(&self) -> bool {
        self.variety.is_empty()
            && self.grade.is_empty()
            && self.packaging.is_empty()
            && self.size == SIZE_SENTINEL
    }
}

fn remove_span(rest: &mut String, range: Range<usize>) {
    rest.replace_range(range, " ");
}

fn pluck_size(rest: &mut String) -> String {
    let found = SIZE_TOKEN
        .captures(rest)
        .map(|c| (format!("{}/{}", &c[1], &c[2]), c.get(0).unwrap().range()));
    match found {
        Some((size, range)) => {
            remove_span(rest, range);
            size
        }
        None => SIZE_SENTINEL.to_string(),
    }
}

fn pluck_packaging(rest: &mut String) -> String {
    let found = PACK_TOKEN.captures(rest).map(|c| {
        let number = c[1].to_string();
        let unit = c[2].to_string();
        let word = c.get(3).map(|m| m.as_str().to_string());
        let unit_end = c.get(2).unwrap().end();
        (number, unit, word, c.get(0).unwrap().range(), unit_end)
    });

    if let Some((number, unit, word, full_range, unit_end)) = found {
        // A grade token right after the unit belongs to Grade, not to
        // Packaging; shrink the removal to the unit in that case.
        let word = word.filter(|w| !GRADE_TABLE.iter().any(|(_, rule)| rule.is_match(w)));
        let range = match word {
            Some(_) => full_range,
            None => full_range.start..unit_end,
        };

        let mut word = word.map(|w| normalize_pack_word(&w)).unwrap_or_default();
        if word.is_empty() && unit.eq_ignore_ascii_case("t") {
            // A bare tonne quantity is a big bag, e.g. "1T" -> "1T bag".
            word = "bag".to_string();
        }

        let packaging = if word.is_empty() {
            format!("{number}{unit}")
        } else {
            format!("{number}{unit} {word}")
        };
        remove_span(rest, range);
        return packaging;
    }

    if let Some(m) = BULK_PHRASE.find(rest) {
        let range = m.range();
        remove_span(rest, range);
        return "Bulk Bags".to_string();
    }

    String::new()
}

fn pluck_grade(rest: &mut String) -> String {
    for (normalized, rule) in GRADE_TABLE.iter() {
        if let Some(range) = rule.find(rest).map(|m| m.range()) {
            remove_span(rest, range);
            return normalized.to_string();
        }
    }
    String::new()
}

/// Decompose a description line into [`ProductAttributes`]. Never errors;
/// any token that cannot be plucked leaves its attribute at the default.
pub fn decompose(line: &str) -> ProductAttributes {
    let mut rest = MATERIAL_CODE.replace(line, "").to_string();

    let size = pluck_size(&mut rest);
    let packaging = pluck_packaging(&mut rest);
    let grade = pluck_grade(&mut rest);

    // Cleanup: residual numeric/tariff codes and stray slashes out,
    // whitespace collapsed, title case in.
    let mut variety = RESIDUAL_CODE.replace_all(&rest, " ").replace('/', " ");
    variety = title_case(&collapse_whitespace(&variety));
    if !variety.chars().any(|c| c.is_ascii_alphabetic()) {
        variety.clear();
    }

    ProductAttributes {
        variety,
        grade,
        size,
        packaging,
    }
}
