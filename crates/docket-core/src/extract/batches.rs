//! Batch row expansion: fan the base record out into one row per batch
//! identifier, substituting per-batch quantity and grade tokens.
//!
//! The quantity/grade streams are scanned independently of the batch
//! ids and paired by position. That pairing assumes the document lays
//! out batches and their quantities in matching textual order; it is a
//! best-effort approximation, so a length mismatch is surfaced as a
//! warning rather than an error.

use tracing::warn;

use super::patterns::{BAG_COUNT, BATCH_LABEL, PAL_COUNT, REJECT_GRADE};
use super::product::ProductAttributes;
use crate::record::{dedup_rows, FieldMap};
use crate::schema::SIZE_SENTINEL;
use crate::text::squeeze;

/// True when a row describes bulk/reject product rather than sized
/// cartons: bag packaging, or no size grading at all.
fn is_bulk_row(row: &FieldMap) -> bool {
    row.get("Packaging").to_lowercase().contains("bag") || row.get("Size") == SIZE_SENTINEL
}

/// All unique batch identifiers in first-seen order.
pub fn scan_batches(text: &str) -> Vec<String> {
    let mut batches: Vec<String> = Vec::new();
    for caps in BATCH_LABEL.captures_iter(text) {
        let batch = caps[1].to_string();
        if !batches.contains(&batch) {
            batches.push(batch);
        }
    }
    batches
}

/// Expand the base record into per-batch rows. With no batch identifiers
/// at all, the document is a single order and one base row is emitted.
pub fn expand(base: &FieldMap, text: &str) -> (Vec<FieldMap>, Vec<String>) {
    let batches = scan_batches(text);
    if batches.is_empty() {
        return (vec![base.clone()], Vec::new());
    }

    // Flat per-line token streams, one scan per kind.
    let bag_counts: Vec<String> = BAG_COUNT
        .captures_iter(text)
        .map(|c| squeeze(&c[1]))
        .collect();
    let pal_counts: Vec<String> = PAL_COUNT
        .captures_iter(text)
        .map(|c| squeeze(&c[1]))
        .collect();
    // "H&S Bulk"/"H&S Bags" are the description line's packaging words
    // bleeding into the grade scan, not per-line grades.
    let reject_grades: Vec<String> = REJECT_GRADE
        .captures_iter(text)
        .map(|c| c[1].to_string())
        .filter(|g| {
            !matches!(
                g.split_whitespace().nth(1).map(str::to_lowercase).as_deref(),
                Some("bulk") | Some("bags")
            )
        })
        .collect();

    let mut warnings = Vec::new();
    let mut rows = Vec::with_capacity(batches.len());
    let mut bag_idx = 0;
    let mut pal_idx = 0;
    let mut grade_idx = 0;
    let mut bulk_rows = 0;
    let mut normal_rows = 0;

    for batch in &batches {
        let mut row = base.clone();
        row.set("Batch Number", batch.clone());

        if is_bulk_row(&row) {
            bulk_rows += 1;
            if bag_idx < bag_counts.len() {
                row.set("SSCC Qty", format!("{} BAGS", bag_counts[bag_idx]));
                bag_idx += 1;
            }
            if grade_idx < reject_grades.len() {
                row.set("Grade", reject_grades[grade_idx].clone());
                grade_idx += 1;
            }
        } else {
            normal_rows += 1;
            if pal_idx < pal_counts.len() {
                row.set("SSCC Qty", format!("{} PAL", pal_counts[pal_idx]));
                pal_idx += 1;
            }
        }

        rows.push(row);
    }

    if bulk_rows > 0 && bag_counts.len() != bulk_rows {
        let msg = format!(
            "bag counts ({}) do not line up with bulk batches ({}); pairing is best-effort",
            bag_counts.len(),
            bulk_rows
        );
        warn!("{msg}");
        warnings.push(msg);
    }
    if normal_rows > 0 && pal_counts.len() != normal_rows {
        let msg = format!(
            "pallet counts ({}) do not line up with sized batches ({}); pairing is best-effort",
            pal_counts.len(),
            normal_rows
        );
        warn!("{msg}");
        warnings.push(msg);
    }

    (dedup_rows(rows), warnings)
}

/// Apply decomposed product attributes onto the base record, overriding
/// whatever the header rules produced.
pub fn apply_attributes(base: &mut FieldMap, attrs: &ProductAttributes) {
    base.set("Variety", attrs.variety.clone());
    base.set("Grade", attrs.grade.clone());
    base.set("Size", attrs.size.clone());
    base.set("Packaging", attrs.packaging.clone());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::EXPORT_COLUMNS;
    use pretty_assertions::assert_eq;

    fn sized_base() -> FieldMap {
        let mut base = FieldMap::new(&EXPORT_COLUMNS);
        base.set("Size", "23/25");
        base.set("Packaging", "50lb ctn");
        base.set("Grade", "Supr");
        base
    }

    #[test]
    fn test_two_batches_two_pallet_counts() {
        let text = "Batch : F012322001\n12 .000 PAL\nBatch : F012322002\n8.000 PAL\n";
        let (rows, warnings) = expand(&sized_base(), text);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("Batch Number"), "F012322001");
        assert_eq!(rows[0].get("SSCC Qty"), "12.000 PAL");
        assert_eq!(rows[1].get("Batch Number"), "F012322002");
        assert_eq!(rows[1].get("SSCC Qty"), "8.000 PAL");
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_no_batches_emits_single_base_row() {
        let base = sized_base();
        let (rows, warnings) = expand(&base, "no batch labels here\n4.000 PAL\n");
        assert_eq!(rows, vec![base]);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_duplicate_batch_yields_one_row() {
        let text = "Batch : F012322001\n12.000 PAL\nBatch : F012322001\n";
        let (rows, _) = expand(&sized_base(), text);
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_bulk_rows_consume_bags_and_reject_grades() {
        let mut base = FieldMap::new(&EXPORT_COLUMNS);
        base.set("Packaging", "Bulk Bags");
        base.set("Size", "N/A");
        base.set("Grade", "H&S");

        let text = "Batch : F1\n14 BAGS\nH&S Satake\nBatch : F2\n3 BAGS\nH&S Beltuza\n";
        let (rows, warnings) = expand(&base, text);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("SSCC Qty"), "14 BAGS");
        assert_eq!(rows[0].get("Grade"), "H&S Satake");
        assert_eq!(rows[1].get("SSCC Qty"), "3 BAGS");
        assert_eq!(rows[1].get("Grade"), "H&S Beltuza");
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_exhausted_stream_skips_and_warns() {
        let text = "Batch : F1\nBatch : F2\n12.000 PAL\n";
        let (rows, warnings) = expand(&sized_base(), text);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("SSCC Qty"), "12.000 PAL");
        // Second batch keeps whatever the base carried.
        assert_eq!(rows[1].get("SSCC Qty"), "");
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("pallet counts"));
    }
}
