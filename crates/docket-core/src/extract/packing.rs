//! Packing-list pipeline for `_PI`/`_ZAPI` documents.
//!
//! These list an explicit pallet count and a cleaner Packer layout than
//! export orders, so a single row on the export schema is enough.

use std::time::Instant;

use super::export::ParseOutcome;
use super::header::extract_headers;
use super::patterns::{
    GRADE_TABLE, MATERIAL_CODE, PACKING_DESC, PACKING_PACK, PACKING_PACKER, PACKING_PAL,
    SIZE_TOKEN,
};

/// Storage/packing facilities whose names are accepted from the line
/// after a "Packer:" label. Anything else is layout noise.
const KNOWN_PACKERS: [&str; 3] = ["Seaway", "RJN", "Olam"];

/// Parse the text of one packing list into a single-row outcome.
pub fn parse_packing_text(text: &str) -> ParseOutcome {
    let start = Instant::now();

    let mut fields = extract_headers(text);

    // Explicit pallet count, e.g. "22.000 PAL"; taken directly instead
    // of counting shipping units.
    if let Some(caps) = PACKING_PAL.captures(text) {
        fields.set("SSCC Qty", format!("{} PAL", caps[1].trim()));
    }

    // "Packer:" then the facility name on the next line; only accepted
    // when it names a known facility.
    if let Some(caps) = PACKING_PACKER.captures(text) {
        let value = caps[1].trim();
        if KNOWN_PACKERS.iter().any(|p| value.contains(p)) {
            fields.set("3rd Party Storage", value.to_string());
        }
    }

    // Description line: the full cleaned line is the variety, with
    // grade/size/packaging pulled out of it when present.
    if let Some(m) = PACKING_DESC.find(text) {
        let clean = MATERIAL_CODE.replace(m.as_str().trim(), "").to_string();
        fields.set("Variety", clean.clone());

        for (normalized, rule) in GRADE_TABLE.iter() {
            if rule.is_match(&clean) {
                fields.set("Grade", normalized.to_string());
                break;
            }
        }
        if let Some(caps) = SIZE_TOKEN.captures(&clean) {
            fields.set("Size", format!("{}/{}", &caps[1], &caps[2]));
        }
        if let Some(m) = PACKING_PACK.find(&clean) {
            fields.set("Packaging", m.as_str().to_string());
        }
    }

    ParseOutcome {
        records: vec![fields],
        warnings: Vec::new(),
        processing_time_ms: start.elapsed().as_millis() as u64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PACKING_LIST: &str = "\
Delivery Number: 801240
22.000 PAL
Packer:
Seaway Storage Co
8571/0802 Almonds Kern XNo1 23/25 50lb ctn
";

    #[test]
    fn test_single_row_with_explicit_pallet_count() {
        let outcome = parse_packing_text(PACKING_LIST);
        assert_eq!(outcome.records.len(), 1);

        let row = &outcome.records[0];
        assert_eq!(row.get("Delivery Number"), "801240");
        assert_eq!(row.get("SSCC Qty"), "22.000 PAL");
        assert_eq!(row.get("3rd Party Storage"), "Seaway Storage Co");
        assert_eq!(row.get("Variety"), "Almonds Kern XNo1 23/25 50lb ctn");
        assert_eq!(row.get("Grade"), "XNo1");
        assert_eq!(row.get("Size"), "23/25");
        assert_eq!(row.get("Packaging"), "50lb");
    }

    #[test]
    fn test_unknown_packer_rejected() {
        let text = "Packer:\nSomebody Else\n";
        let outcome = parse_packing_text(text);
        assert_eq!(outcome.records[0].get("3rd Party Storage"), "");
    }

    #[test]
    fn test_material_code_stripped_from_variety() {
        let text = "9054 / Almonds Kern Supr 25/27\n";
        let outcome = parse_packing_text(text);
        assert_eq!(outcome.records[0].get("Variety"), "Almonds Kern Supr 25/27");
    }
}
