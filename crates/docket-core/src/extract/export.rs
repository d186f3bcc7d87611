//! Export-order pipeline: header rules, layout overrides, description
//! decomposition and per-batch row expansion, glued in document order.

use std::time::Instant;

use tracing::debug;

use super::batches::{apply_attributes, expand};
use super::description::locate;
use super::header::extract_headers;
use super::patterns::{FUMIGATION_DAYS, FUMIGATION_LINE, PACKER_BLOCK, PALLET_TYPE, PAL_LINE};
use super::product::decompose;
use crate::record::FieldMap;
use crate::text::{collapse_whitespace, squeeze};

/// Result of parsing one document.
#[derive(Debug, Clone)]
pub struct ParseOutcome {
    /// Extracted rows, one per batch (or one base row).
    pub records: Vec<FieldMap>,
    /// Non-fatal warnings, e.g. positional alignment mismatches.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Parse the text of one export order into per-batch rows.
pub fn parse_export_text(text: &str) -> ParseOutcome {
    let start = Instant::now();

    // First pass: the shared header rule table.
    let mut fields = extract_headers(text);

    // Layout overrides for the fields the label rules get wrong on this
    // packing layout.

    // SSCC Qty from a line like "22.000 PAL". Anchored to line start so
    // batch digits above are not swallowed.
    if let Some(caps) = PAL_LINE.captures(text) {
        fields.set("SSCC Qty", format!("{} PAL", squeeze(&caps[1])));
    }

    // 3rd Party Storage from the 1-2 lines after "Packer :", cut short
    // if the capture ran into the Consignee block.
    if let Some(caps) = PACKER_BLOCK.captures(text) {
        let mut raw = caps[1].to_string();
        if let Some(pos) = raw.find("Consignee") {
            raw.truncate(pos);
        }
        fields.set("3rd Party Storage", collapse_whitespace(&raw.replace('\n', " ")));
    }

    // Variety / Grade / Size / Packaging from the description line.
    if let Some(candidate) = locate(text) {
        debug!(strategy = candidate.strategy, "decomposing description line");
        let attrs = decompose(&candidate.line);
        apply_attributes(&mut fields, &attrs);
    }

    // Pallet type, e.g. "loaded on PLASTIC export pallets".
    if let Some(caps) = PALLET_TYPE.captures(text) {
        fields.set("Pallet", caps[1].trim().to_string());
    }

    // Fumigation: the explicit "<n> days Fumigation ..." form first,
    // otherwise the last line mentioning Fumigation.
    if let Some(caps) = FUMIGATION_DAYS.captures(text) {
        fields.set("Fumigation", caps[1].trim().to_string());
    } else if let Some(m) = FUMIGATION_LINE.find_iter(text).last() {
        fields.set("Fumigation", m.as_str().trim().to_string());
    }

    let (records, warnings) = expand(&fields, text);

    ParseOutcome {
        records,
        warnings,
        processing_time_ms: start.elapsed().as_millis() as u64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SIZED_ORDER: &str = "\
Delivery Number: 801234
Destination: Rotterdam
Vessel ETD: 12/09/2026
Packer :
Seaway Storage Co
Consignee :
Someone Else
Almonds Kern Supr 23/25 50lb ctn
Batch : F012322001
12.000 PAL
Batch : F012322002
8.000 PAL
loaded on PLASTIC export pallets
2 days Fumigation with Profume
";

    #[test]
    fn test_sized_order_end_to_end() {
        let outcome = parse_export_text(SIZED_ORDER);
        assert_eq!(outcome.records.len(), 2);

        let first = &outcome.records[0];
        assert_eq!(first.get("Delivery Number"), "801234");
        assert_eq!(first.get("Destination"), "Rotterdam");
        assert_eq!(first.get("3rd Party Storage"), "Seaway Storage Co");
        assert_eq!(first.get("Variety"), "Almonds Kern");
        assert_eq!(first.get("Grade"), "Supr");
        assert_eq!(first.get("Size"), "23/25");
        assert_eq!(first.get("Packaging"), "50lb ctn");
        assert_eq!(first.get("Batch Number"), "F012322001");
        assert_eq!(first.get("SSCC Qty"), "12.000 PAL");
        assert_eq!(first.get("Pallet"), "PLASTIC export pallets");
        assert_eq!(first.get("Fumigation"), "2 days Fumigation with Profume");

        let second = &outcome.records[1];
        assert_eq!(second.get("Batch Number"), "F012322002");
        assert_eq!(second.get("SSCC Qty"), "8.000 PAL");
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn test_rejects_order_uses_bags_and_per_line_grades() {
        let text = "\
Delivery Number: 801235
Almonds Kern Non Var H&S Bulk Bags
Batch : F012322003
14 BAGS
H&S Satake
Batch : F012322004
3 BAGS
H&S Beltuza
";
        let outcome = parse_export_text(text);
        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.records[0].get("Size"), "N/A");
        assert_eq!(outcome.records[0].get("Packaging"), "Bulk Bags");
        assert_eq!(outcome.records[0].get("SSCC Qty"), "14 BAGS");
        assert_eq!(outcome.records[0].get("Grade"), "H&S Satake");
        assert_eq!(outcome.records[1].get("SSCC Qty"), "3 BAGS");
        assert_eq!(outcome.records[1].get("Grade"), "H&S Beltuza");
    }

    #[test]
    fn test_no_batches_single_row() {
        let text = "Delivery Number: 801236\nAlmonds Kern Supr 23/25 50lb ctn\n";
        let outcome = parse_export_text(text);
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].get("Batch Number"), "");
    }

    #[test]
    fn test_fumigation_fallback_last_line() {
        let text = "Fumigation required\nsee below\nFumigation at destination\n";
        let outcome = parse_export_text(text);
        assert_eq!(
            outcome.records[0].get("Fumigation"),
            "Fumigation at destination"
        );
    }
}
