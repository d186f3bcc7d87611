//! Product description-line location.
//!
//! An ordered chain of independent strategies; the first one that
//! matches wins and no further strategies are tried. Priority lives in
//! the strategy table, not in control flow, so strategies can be added
//! or reordered without touching this module.

use tracing::debug;

use super::patterns::{DESCRIPTION_STRATEGIES, MATERIAL_CODE};
use crate::text::has_letter_run;

/// A candidate product-description line and the strategy that found it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptionCandidate {
    pub line: String,
    pub strategy: &'static str,
}

/// Locate the single line most likely to describe the product.
///
/// The accepted candidate is rejected outright (no fallback to later
/// strategies) when, after stripping a leading material code, it has
/// fewer than 3 consecutive letters; such lines are numeric noise.
pub fn locate(text: &str) -> Option<DescriptionCandidate> {
    for (strategy, rule) in DESCRIPTION_STRATEGIES.iter() {
        let Some(caps) = rule.captures(text) else {
            continue;
        };
        let line = caps[1].trim().to_string();

        let stripped = MATERIAL_CODE.replace(&line, "");
        if !has_letter_run(&stripped, 3) {
            debug!(strategy, line = %line, "description candidate rejected as numeric noise");
            return None;
        }

        debug!(strategy, line = %line, "description line selected");
        return Some(DescriptionCandidate { line, strategy });
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_primary_strategy() {
        let text = "Order 123\nAlmonds Kern Supr 23/25 50lb ctn\n";
        let candidate = locate(text).unwrap();
        assert_eq!(candidate.strategy, "primary");
        assert_eq!(candidate.line, "Almonds Kern Supr 23/25 50lb ctn");
    }

    #[test]
    fn test_short_circuit_primary_beats_size_shape() {
        // Both strategy 1 and strategy 3 would match different lines; the
        // primary keyword line must win even though the size line is first.
        let text = "widgets 23/25 packed\nAlmonds Kern Non Var H&S Bulk Bags\n";
        let candidate = locate(text).unwrap();
        assert_eq!(candidate.strategy, "primary");
        assert_eq!(candidate.line, "Almonds Kern Non Var H&S Bulk Bags");
    }

    #[test]
    fn test_ocr_variant_fallback() {
        let text = "AImonds Kern Supr 23/25 50lb ctn\n";
        let candidate = locate(text).unwrap();
        assert_eq!(candidate.strategy, "ocr-variant");
    }

    #[test]
    fn test_keyword_fallback() {
        let text = "line one\nStockfeed grade product\n";
        let candidate = locate(text).unwrap();
        assert_eq!(candidate.strategy, "keyword");
    }

    #[test]
    fn test_numeric_noise_rejected() {
        // Strategy 3 matches, but after stripping the material code the
        // line has no 3-letter run.
        let text = "9054 / 23/25 18 2\n";
        assert_eq!(locate(text), None);
    }

    #[test]
    fn test_no_candidate() {
        assert_eq!(locate("totally unrelated text"), None);
    }
}
