//! Record validation (QC): schema completeness and value-domain checks.
//!
//! Advisory only. A failing check is reported, never fatal, and never
//! blocks writing output.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use crate::record::FieldMap;
use crate::schema::VALID_GRADES;

lazy_static! {
    /// Valid Size shapes: "NN/NN" or the "N/A" bulk sentinel.
    static ref SIZE_SHAPE: Regex = Regex::new(r"^(?:\d{2}/\d{2}|N/A)$").unwrap();
}

/// Per-document QC diagnostic.
#[derive(Debug, Clone, Serialize)]
pub struct QcResult {
    /// Document the records came from.
    pub source: String,
    /// Expected columns absent from the record set.
    pub missing_columns: Vec<String>,
    /// Rows whose Grade is outside the valid set.
    pub invalid_grade: usize,
    /// Rows whose Size is neither "NN/NN" nor "N/A".
    pub invalid_size: usize,
}

impl QcResult {
    pub fn has_issues(&self) -> bool {
        !self.missing_columns.is_empty() || self.invalid_grade > 0 || self.invalid_size > 0
    }
}

/// Validate a record set against an expected column schema.
pub fn validate(rows: &[FieldMap], schema: &[&str], source: &str) -> QcResult {
    let missing_columns = match rows.first() {
        Some(first) => schema
            .iter()
            .filter(|c| !first.contains(c))
            .map(|c| c.to_string())
            .collect(),
        // No rows means no columns to check against.
        None => schema.iter().map(|c| c.to_string()).collect(),
    };

    let invalid_grade = rows
        .iter()
        .filter(|r| !VALID_GRADES.contains(&r.get("Grade")))
        .count();

    let invalid_size = rows
        .iter()
        .filter(|r| !SIZE_SHAPE.is_match(r.get("Size")))
        .count();

    QcResult {
        source: source.to_string(),
        missing_columns,
        invalid_grade,
        invalid_size,
    }
}

/// Render per-document results into a Markdown report with an aggregate
/// summary line. Stateless; the caller decides where it is written.
pub fn render_report(results: &[QcResult]) -> String {
    let mut lines = vec!["# QC Report".to_string(), String::new()];
    let total = results.len();
    let mut flagged = 0;

    for result in results {
        let missing = if result.missing_columns.is_empty() {
            "None".to_string()
        } else {
            result.missing_columns.join(", ")
        };
        lines.push(format!("## {}", result.source));
        lines.push(format!("- Missing columns: {missing}"));
        lines.push(format!("- Invalid grade rows: {}", result.invalid_grade));
        lines.push(format!("- Invalid size rows: {}", result.invalid_size));
        lines.push(String::new());

        if result.has_issues() {
            flagged += 1;
        }
    }

    lines.push(format!("**Summary:** {flagged}/{total} had QC issues."));
    lines.push(String::new());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::EXPORT_COLUMNS;
    use pretty_assertions::assert_eq;

    fn valid_row() -> FieldMap {
        let mut row = FieldMap::new(&EXPORT_COLUMNS);
        row.set("Grade", "Supr");
        row.set("Size", "23/25");
        row
    }

    #[test]
    fn test_clean_records_pass() {
        let result = validate(&[valid_row()], &EXPORT_COLUMNS, "a.pdf");
        assert!(result.missing_columns.is_empty());
        assert_eq!(result.invalid_grade, 0);
        assert_eq!(result.invalid_size, 0);
        assert!(!result.has_issues());
    }

    #[test]
    fn test_out_of_domain_grade_counted() {
        let mut row = valid_row();
        row.set("Grade", "ZZ");
        let result = validate(&[row], &EXPORT_COLUMNS, "a.pdf");
        assert_eq!(result.invalid_grade, 1);
    }

    #[test]
    fn test_size_sentinel_is_valid() {
        let mut row = valid_row();
        row.set("Size", "N/A");
        let result = validate(&[row], &EXPORT_COLUMNS, "a.pdf");
        assert_eq!(result.invalid_size, 0);
    }

    #[test]
    fn test_malformed_size_counted() {
        let mut row = valid_row();
        row.set("Size", "23-25");
        let result = validate(&[row], &EXPORT_COLUMNS, "a.pdf");
        assert_eq!(result.invalid_size, 1);
    }

    #[test]
    fn test_missing_columns_reported() {
        let row = FieldMap::from_pairs(&["Grade", "Size"], &["Supr", "23/25"]);
        let result = validate(&[row], &EXPORT_COLUMNS, "a.pdf");
        assert!(result.missing_columns.contains(&"Delivery Number".to_string()));
        assert!(result.has_issues());
    }

    #[test]
    fn test_report_summary_line() {
        let clean = validate(&[valid_row()], &EXPORT_COLUMNS, "a.pdf");
        let mut bad_row = valid_row();
        bad_row.set("Grade", "ZZ");
        let dirty = validate(&[bad_row], &EXPORT_COLUMNS, "b.pdf");

        let report = render_report(&[clean, dirty]);
        assert!(report.contains("## a.pdf"));
        assert!(report.contains("## b.pdf"));
        assert!(report.contains("**Summary:** 1/2 had QC issues."));
    }
}
