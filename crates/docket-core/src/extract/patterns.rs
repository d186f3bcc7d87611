//! Common regex patterns for consignment-document extraction.
//!
//! Label rules are written permissively: source documents carry typos,
//! split labels, optional colons and common OCR substitutions
//! (`0`<->`O`, `l`<->`1`, `3`<->`e`), so rules tolerate those rather
//! than requiring the exact label string.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Ordered header rule table for export orders and packing lists.
    /// Each rule has exactly one capture group; first match wins.
    pub static ref EXPORT_FIELD_RULES: Vec<(&'static str, Regex)> = vec![
        ("Name", Regex::new(r"(?im)^\s*Name[:\s]+([^\n]+?)\s*$").unwrap()),
        ("Date Requested", Regex::new(r"(?im)^\s*Date\s*Requested[:\s]+([\d\-/]+)\s*$").unwrap()),
        ("OLAM Ref Number", Regex::new(r"(?im)\b[O0]lam\s*Ref(?:erence)?(?:\s*Number)?[:\s]*([0-9A-Z\-/]+)\b").unwrap()),
        ("Delivery Number", Regex::new(r"(?im)^\s*De[l1]ivery\s*Number[:\s]+([\w-]+)\s*$").unwrap()),
        ("Sale Order Number", Regex::new(r"(?im)^\s*Sa[l1]e\s*Order\s*Number[:\s]+([\w-]+)\s*$").unwrap()),
        ("Batch Number", Regex::new(r"(?im)^\s*Batch\s*Number[:\s]+([\w-]+)\s*$").unwrap()),
        ("SSCC Qty", Regex::new(r"(?im)^\s*SSCC\s*Qty[:\s]+([\w-]+)\s*$").unwrap()),
        ("Vessel ETD", Regex::new(r"(?im)^\s*V[e3]ss[e3][l1]\s*ETD[:\s]+([\w\-/]+)\s*$").unwrap()),
        ("Destination", Regex::new(r"(?im)^\s*Destinati[o0]n[:\s]+([^\n]+?)\s*$").unwrap()),
        ("3rd Party Storage", Regex::new(r"(?im)^\s*3rd\s*Party\s*St[o0]rage[:\s]+([^\n]+?)\s*$").unwrap()),
        ("Variety", Regex::new(r"(?im)^\s*Variety[:\s]+([^\n]+?)\s*$").unwrap()),
        ("Grade", Regex::new(r"(?im)^\s*Grade[:\s]+(\w+)\s*$").unwrap()),
        ("Size", Regex::new(r"(?im)^\s*Size[:\s]+([\w/]+)\s*$").unwrap()),
        ("Packaging", Regex::new(r"(?im)^\s*Packaging[:\s]+([^\n]+?)\s*$").unwrap()),
        ("Pallet", Regex::new(r"(?im)^\s*Pa[l1][l1]et[:\s]+([\w-]+)\s*$").unwrap()),
        ("Fumigation", Regex::new(r"(?im)^\s*Fumigati[o0]n[:\s]+([^\n]+?)\s*$").unwrap()),
        ("Container", Regex::new(r"(?im)^\s*C[o0]ntainer[:\s]+([\w-]+)\s*$").unwrap()),
    ];

    /// Description-line strategies, tried in order; first non-empty match
    /// wins and the rest are never evaluated.
    pub static ref DESCRIPTION_STRATEGIES: Vec<(&'static str, Regex)> = vec![
        ("primary", Regex::new(r"(?i)(Almonds[^\n]+)").unwrap()),
        ("ocr-variant", Regex::new(r"(?i)((?:A[lI1]monds|Kern|\bALM\b)[^\n]+)").unwrap()),
        ("size-shape", Regex::new(r"([^\n]*\d{2}\s*/\s*\d{2}[^\n]*)").unwrap()),
        ("keyword", Regex::new(r"(?i)((?:Stockfeed|Mfr|Manufacturing|Inshell|Hulls)[^\n]+)").unwrap()),
    ];

    /// Grade tokens in priority order. Longest/most specific first so a
    /// multi-word grade pre-empts its prefix word; first table entry
    /// found anywhere in the remainder wins, regardless of textual order.
    pub static ref GRADE_TABLE: Vec<(&'static str, Regex)> = vec![
        ("H&S Satake", Regex::new(r"(?i)\bH&S\s+Satake\b").unwrap()),
        ("H&S Beltuza", Regex::new(r"(?i)\bH&S\s+Beltuza\b").unwrap()),
        ("Splits&Brokens", Regex::new(r"(?i)\bSplits\s*&\s*Brokens\b").unwrap()),
        ("H&S", Regex::new(r"(?i)\bH&S\b").unwrap()),
        ("SSR", Regex::new(r"(?i)\bSSR\b").unwrap()),
        ("Supr", Regex::new(r"(?i)\bSUPR\b").unwrap()),
        ("XNo1", Regex::new(r"(?i)\bX\s*N[O0]\.?\s*1\b").unwrap()),
        ("Std Gr", Regex::new(r"(?i)\bStd\s+Gr\b").unwrap()),
        ("Mfg", Regex::new(r"(?i)\bMfg\b").unwrap()),
        ("Splits", Regex::new(r"(?i)\bSplits\b").unwrap()),
        ("Brokens", Regex::new(r"(?i)\bBrokens\b").unwrap()),
        ("Rejects", Regex::new(r"(?i)\bRejects\b").unwrap()),
        ("NP", Regex::new(r"(?i)\bNP\b").unwrap()),
    ];

    /// Leading numeric material code, e.g. "9054 / ", "26132 " or the
    /// chained form "8571/0802 ". Real codes are 4-5 digits; the leading
    /// number must be 3+ digits so a line starting with an "NN/NN" size
    /// token keeps its size.
    pub static ref MATERIAL_CODE: Regex = Regex::new(r"^\s*\d{3,}(?:[\s/]+\d+)*[\s/]+").unwrap();

    /// Size grading token like "23/25" or "30 / 32".
    pub static ref SIZE_TOKEN: Regex = Regex::new(r"\b(\d{2})\s*/\s*(\d{2})\b").unwrap();

    /// Packaging quantity+unit token: "50lb ctn", "12.5KG ctn", "1T bag",
    /// "850KG D-Sp". Unit vocabulary is fixed; the trailing packaging
    /// word is optional.
    pub static ref PACK_TOKEN: Regex = Regex::new(
        r"(?i)\b(\d+(?:[.,]\d+)?)\s*(lb|kg|t)\b(?:\s+([A-Za-z][A-Za-z-]{1,6})\b)?"
    ).unwrap();

    /// Literal bulk-packaging phrase used when no quantity+unit exists.
    pub static ref BULK_PHRASE: Regex = Regex::new(r"(?i)\bBulk\s+Bags?\b").unwrap();

    /// Residual numeric codes left in a variety after plucking, e.g.
    /// tariff codes like "0802.12.00".
    pub static ref RESIDUAL_CODE: Regex = Regex::new(r"\b\d[\d.,/]*\b").unwrap();

    // Batch row expansion scans. Each is a flat ordered scan over the
    // whole text, unrelated to batch boundaries.
    pub static ref BATCH_LABEL: Regex = Regex::new(r"(?i)Batch\s*:\s*([A-Za-z0-9]+)").unwrap();
    pub static ref BAG_COUNT: Regex = Regex::new(r"(?i)(\d[\d.,]*)\s+BAGS\b").unwrap();
    pub static ref PAL_COUNT: Regex = Regex::new(r"(?i)([\d., ]+)\s+PAL\b").unwrap();
    pub static ref PAL_LINE: Regex = Regex::new(r"(?im)^\s*([\d., ]+)\s+PAL\b").unwrap();
    pub static ref REJECT_GRADE: Regex = Regex::new(r"(?i)(H&S\s+[A-Za-z]+)").unwrap();

    // Export layout overrides.
    pub static ref PACKER_BLOCK: Regex = Regex::new(r"(?i)Packer\s*:\s*\n([^\n]+(?:\n[^\n]+)?)").unwrap();
    pub static ref PALLET_TYPE: Regex = Regex::new(r"(?i)loaded on\s+([A-Za-z ]+pallets)").unwrap();
    pub static ref FUMIGATION_DAYS: Regex = Regex::new(r"(?i)(\d+\s+days\s+Fumigati[o0]n[^\n]*)").unwrap();
    pub static ref FUMIGATION_LINE: Regex = Regex::new(r"(?i)[^\n]*Fumigati[o0]n[^\n]*").unwrap();

    // Domestic delivery-note patterns.
    pub static ref DOMESTIC_DELIVERY: Regex = Regex::new(r"(?i)\bDe[l1]ivery\s+([0-9]{6,})\b").unwrap();
    pub static ref DOMESTIC_PICKING: Regex = Regex::new(r"(?i)Picking\s*request[:\s]*([0-9]{5,})").unwrap();
    pub static ref DOMESTIC_DATE: Regex = Regex::new(r"(?i)\bCust[o0]mer\s*De[l1]ivery\s*Date\s*([0-9./-]{8,10})\b").unwrap();
    pub static ref DOMESTIC_PLANT: Regex = Regex::new(r"(?i)\bP[l1]ant/St[o0]rage\s*[l1][o0]cati[o0]n\s*([A-Z0-9/]+)\b").unwrap();
    pub static ref DOMESTIC_GROSS: Regex = Regex::new(r"(?i)\bGr[o0]ss\s*weight\s*([0-9.,]+)\s*KG\b").unwrap();
    pub static ref DOMESTIC_BATCH: Regex = Regex::new(r"(?i)\b(F\d{6,})\b").unwrap();
    pub static ref SSCC_CODE: Regex = Regex::new(r"\b(\d{18,20})\b").unwrap();
    pub static ref SSCC_LABEL_LINE: Regex = Regex::new(r"(?i)^\s*SSCC\b").unwrap();
    pub static ref COMPANY_SUFFIX: Regex = Regex::new(r"\b(?:Pty|Limited|Ltd)\b\.?").unwrap();
    pub static ref ADDRESS_STOP: Regex = Regex::new(r"(?i)(Delivery|Olam|Picking|Plant/Storage|Gross\s*weight)").unwrap();

    // Packing-list patterns.
    pub static ref PACKING_PAL: Regex = Regex::new(r"(?i)\b(\d+(?:[.,]\d+)?)\s+PAL\b").unwrap();
    pub static ref PACKING_PACKER: Regex = Regex::new(r"(?i)Packer\s*[:\s]*\n([^\n]+)").unwrap();
    pub static ref PACKING_DESC: Regex = Regex::new(r"(?im)^.*(?:Almonds|Kern|Inshell).*$").unwrap();
    pub static ref PACKING_PACK: Regex = Regex::new(r"(?i)\b\d+(?:[.,]\d+)?\s*(?:lb|kg|ctn)\b").unwrap();
}

/// Normalize a packaging-type word through the fixed synonym table.
/// Unknown words pass through unchanged.
pub fn normalize_pack_word(word: &str) -> String {
    match word.to_lowercase().as_str() {
        "carton" | "ctn" | "ctns" => "ctn".to_string(),
        "dsp" | "d-sp" => "D-Sp".to_string(),
        "bag" | "bags" => "bag".to_string(),
        "case" | "cases" => "case".to_string(),
        _ => word.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_rule_tolerates_ocr_substitutions() {
        let rule = &EXPORT_FIELD_RULES
            .iter()
            .find(|(name, _)| *name == "Delivery Number")
            .unwrap()
            .1;
        assert!(rule.is_match("De1ivery Number: 801234"));
        assert!(rule.is_match("delivery number 801234"));
    }

    #[test]
    fn test_pack_token_skips_tariff_codes() {
        let caps = PACK_TOKEN.captures("SSR 0802.12.00 1T bag").unwrap();
        assert_eq!(&caps[1], "1");
        assert_eq!(&caps[2], "T");
        assert_eq!(&caps[3], "bag");
    }

    #[test]
    fn test_material_code_requires_code_width() {
        assert!(MATERIAL_CODE.is_match("9054 / Almonds"));
        assert!(MATERIAL_CODE.is_match("26132 Alm Kern"));
        assert!(MATERIAL_CODE.is_match("8571/0802 Almonds"));
        assert!(!MATERIAL_CODE.is_match("23/25 Almonds"));
    }

    #[test]
    fn test_normalize_pack_word() {
        assert_eq!(normalize_pack_word("carton"), "ctn");
        assert_eq!(normalize_pack_word("DSP"), "D-Sp");
        assert_eq!(normalize_pack_word("sack"), "sack");
    }
}
