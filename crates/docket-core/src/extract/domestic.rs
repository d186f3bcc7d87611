//! Domestic delivery-note pipeline: a batch-level table plus an SSCC
//! detail table keyed by individual pallet codes.

use std::time::Instant;

use chrono::NaiveDate;
use tracing::{debug, warn};

use super::header::find_first;
use super::patterns::{
    ADDRESS_STOP, COMPANY_SUFFIX, DOMESTIC_BATCH, DOMESTIC_DATE, DOMESTIC_DELIVERY,
    DOMESTIC_GROSS, DOMESTIC_PICKING, DOMESTIC_PLANT, EXPORT_FIELD_RULES, PACK_TOKEN, SIZE_TOKEN,
    SSCC_CODE, SSCC_LABEL_LINE,
};
use super::product::{decompose, ProductAttributes};
use crate::record::FieldMap;
use crate::schema::{DOMESTIC_BATCH_COLUMNS, SSCC_COLUMNS};

/// How many lines after a batch id are searched for SSCCs and product
/// descriptions before giving up.
const BATCH_WINDOW: usize = 60;

/// Result of parsing one domestic delivery note.
#[derive(Debug, Clone)]
pub struct DomesticOutcome {
    /// One row per batch, on the domestic batch schema.
    pub batch_rows: Vec<FieldMap>,
    /// One row per SSCC, on the SSCC detail schema.
    pub sscc_rows: Vec<FieldMap>,
    /// Non-fatal warnings.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

struct Headers {
    delivery: String,
    picking: String,
    olam: String,
    delivery_date: String,
    plant: String,
    gross_weight: String,
    customer: String,
    address: String,
}

/// Normalize a header date ("2026-08-12", "12.08.2026", "12/08/2026")
/// to DD/MM/YYYY; unparseable input passes through as captured.
fn to_ddmmyyyy(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    for format in ["%d.%m.%Y", "%d/%m/%Y", "%d-%m-%Y", "%Y-%m-%d", "%Y.%m.%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return date.format("%d/%m/%Y").to_string();
        }
    }
    raw.to_string()
}

fn olam_rule() -> &'static regex::Regex {
    // The OLAM reference label is shared with the export header table.
    &EXPORT_FIELD_RULES
        .iter()
        .find(|(name, _)| *name == "OLAM Ref Number")
        .expect("OLAM rule is in the export table")
        .1
}

fn parse_headers(text: &str) -> Headers {
    let gross = find_first(&DOMESTIC_GROSS, text);

    // Customer heuristic: the first line carrying a company suffix is
    // the customer; up to 4 following lines form the delivery address,
    // stopping at the next known label.
    let lines: Vec<&str> = text.lines().collect();
    let mut customer = String::new();
    let mut address_parts: Vec<String> = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        if !COMPANY_SUFFIX.is_match(line) {
            continue;
        }
        customer = line.trim().to_string();
        for follow in lines.iter().skip(i + 1).take(4) {
            if ADDRESS_STOP.is_match(follow) {
                break;
            }
            let clean = follow.trim();
            if clean.is_empty() {
                continue;
            }
            // "Ship-to party" labels and bare plant codes are layout
            // noise, not address lines.
            if clean.to_lowercase().contains("ship-to party") {
                continue;
            }
            if clean.chars().all(|c| c.is_ascii_digit()) {
                continue;
            }
            address_parts.push(clean.to_string());
        }
        break;
    }

    Headers {
        delivery: find_first(&DOMESTIC_DELIVERY, text),
        picking: find_first(&DOMESTIC_PICKING, text),
        olam: find_first(olam_rule(), text),
        delivery_date: to_ddmmyyyy(&find_first(&DOMESTIC_DATE, text)),
        plant: find_first(&DOMESTIC_PLANT, text),
        gross_weight: gross.replace(',', ""),
        customer,
        address: address_parts.join(", "),
    }
}

struct BatchBlock {
    batch: String,
    ssccs: Vec<String>,
    product_lines: Vec<String>,
}

fn parse_batch_blocks(text: &str) -> Vec<BatchBlock> {
    let lines: Vec<&str> = text.lines().collect();
    let mut blocks = Vec::new();

    for (idx, line) in lines.iter().enumerate() {
        let Some(caps) = DOMESTIC_BATCH.captures(line) else {
            continue;
        };
        let batch = caps[1].to_string();

        let mut ssccs = Vec::new();
        let mut product_lines: Vec<String> = Vec::new();

        for next in lines.iter().skip(idx + 1).take(BATCH_WINDOW) {
            if DOMESTIC_BATCH.is_match(next) {
                break;
            }

            for sscc in SSCC_CODE.captures_iter(next) {
                ssccs.push(sscc[1].to_string());
            }

            // Summary and label lines are not product descriptions.
            if DOMESTIC_GROSS.is_match(next) || SSCC_LABEL_LINE.is_match(next) {
                continue;
            }

            // A real product line carries a size or a pack token.
            if SIZE_TOKEN.is_match(next) || PACK_TOKEN.is_match(next) {
                product_lines.push(next.to_string());
            }
        }

        // The last few lines are usually closest to the batch.
        if product_lines.len() > 4 {
            product_lines.drain(..product_lines.len() - 4);
        }

        blocks.push(BatchBlock {
            batch,
            ssccs,
            product_lines,
        });
    }

    blocks
}

/// Parse the text of one domestic delivery note into batch and SSCC rows.
pub fn parse_domestic_text(text: &str) -> DomesticOutcome {
    let start = Instant::now();
    let mut warnings = Vec::new();

    let headers = parse_headers(text);
    if headers.delivery.is_empty() {
        let msg = "no delivery number matched".to_string();
        warn!("{msg}");
        warnings.push(msg);
    }

    let blocks = parse_batch_blocks(text);
    if blocks.is_empty() {
        let msg = "no batches found".to_string();
        warn!("{msg}");
        warnings.push(msg);
    }

    let mut batch_rows = Vec::with_capacity(blocks.len());
    let mut sscc_rows = Vec::new();

    // Carry the last non-empty product attributes forward: later batch
    // blocks of the same product often omit the description line.
    let mut last_attrs = ProductAttributes::default();

    for block in &blocks {
        let mut attrs = decompose(&block.product_lines.join(" "));
        if attrs.is_blank() && !last_attrs.is_blank() {
            debug!(batch = %block.batch, "reusing previous batch's product attributes");
            attrs = last_attrs.clone();
        } else if !attrs.is_blank() {
            last_attrs = attrs.clone();
        }

        let sscc_qty = if block.ssccs.is_empty() {
            String::new()
        } else {
            format!("{} PAL", block.ssccs.len())
        };

        let mut row = FieldMap::new(&DOMESTIC_BATCH_COLUMNS);
        row.set("Picking Request Number", headers.picking.clone());
        row.set("Delivery Number", headers.delivery.clone());
        row.set("OLAM Ref Number", headers.olam.clone());
        row.set("Batch Number", block.batch.clone());
        row.set("SSCC Qty", sscc_qty);
        row.set("Customer Delivery Date", headers.delivery_date.clone());
        row.set("Customer", headers.customer.clone());
        row.set("Customer/Delivery Address", headers.address.clone());
        row.set("Plant/Storage Location", headers.plant.clone());
        row.set("Variety", attrs.variety.clone());
        row.set("Grade", attrs.grade.clone());
        row.set("Size", attrs.size.clone());
        row.set("Packaging", attrs.packaging.clone());
        // Not part of the batch schema; dropped on emission.
        row.set("Total Gross Weight", headers.gross_weight.clone());
        batch_rows.push(row);

        for sscc in &block.ssccs {
            let mut detail = FieldMap::new(&SSCC_COLUMNS);
            detail.set("Delivery Number", headers.delivery.clone());
            detail.set("Batch Number", block.batch.clone());
            detail.set("SSCC", sscc.clone());
            detail.set("Variety", attrs.variety.clone());
            detail.set("Grade", attrs.grade.clone());
            detail.set("Size", attrs.size.clone());
            detail.set("Packaging", attrs.packaging.clone());
            sscc_rows.push(detail);
        }
    }

    DomesticOutcome {
        batch_rows,
        sscc_rows,
        warnings,
        processing_time_ms: start.elapsed().as_millis() as u64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const DELIVERY_NOTE: &str = "\
Delivery 800123
Picking request: 50012
Olam Reference 4500123456
Customer Delivery Date 12.08.2026
Plant/Storage location AU01/3001
Ship-to party
Acme Foods Pty Ltd
12 Mill Road
Wodonga VIC 3690
Gross weight 19,800 KG
F0123456
26132 Alm Kern WC SSR 27/30 12.5KG ctn
SSCC 393123456789012345
SSCC 393123456789012346
F0123457
SSCC 393123456789012347
";

    #[test]
    fn test_headers() {
        let headers = parse_headers(DELIVERY_NOTE);
        assert_eq!(headers.delivery, "800123");
        assert_eq!(headers.picking, "50012");
        assert_eq!(headers.olam, "4500123456");
        assert_eq!(headers.delivery_date, "12/08/2026");
        assert_eq!(headers.plant, "AU01/3001");
        assert_eq!(headers.gross_weight, "19800");
        assert_eq!(headers.customer, "Acme Foods Pty Ltd");
        assert_eq!(headers.address, "12 Mill Road, Wodonga VIC 3690");
    }

    #[test]
    fn test_batch_blocks_and_sscc_qty() {
        let outcome = parse_domestic_text(DELIVERY_NOTE);
        assert_eq!(outcome.batch_rows.len(), 2);

        let first = &outcome.batch_rows[0];
        assert_eq!(first.get("Batch Number"), "F0123456");
        assert_eq!(first.get("SSCC Qty"), "2 PAL");
        assert_eq!(first.get("Variety"), "Alm Kern Wc");
        assert_eq!(first.get("Grade"), "SSR");
        assert_eq!(first.get("Size"), "27/30");
        assert_eq!(first.get("Packaging"), "12.5KG ctn");

        assert_eq!(outcome.sscc_rows.len(), 3);
        assert_eq!(outcome.sscc_rows[0].get("SSCC"), "393123456789012345");
        assert_eq!(outcome.sscc_rows[2].get("Batch Number"), "F0123457");
    }

    #[test]
    fn test_product_carry_forward() {
        let outcome = parse_domestic_text(DELIVERY_NOTE);
        // Second batch has no product line of its own.
        let second = &outcome.batch_rows[1];
        assert_eq!(second.get("Variety"), "Alm Kern Wc");
        assert_eq!(second.get("Grade"), "SSR");
        assert_eq!(second.get("SSCC Qty"), "1 PAL");
    }

    #[test]
    fn test_date_normalization() {
        assert_eq!(to_ddmmyyyy("2026-08-12"), "12/08/2026");
        assert_eq!(to_ddmmyyyy("12.08.2026"), "12/08/2026");
        assert_eq!(to_ddmmyyyy("12/08/2026"), "12/08/2026");
        assert_eq!(to_ddmmyyyy(""), "");
    }

    #[test]
    fn test_missing_delivery_number_warns() {
        let outcome = parse_domestic_text("nothing here");
        assert!(outcome.warnings.iter().any(|w| w.contains("delivery number")));
        assert!(outcome.warnings.iter().any(|w| w.contains("no batches")));
    }
}
