//! Audit command: re-read a combined CSV and flag rows that need manual
//! attention before the spreadsheet goes to reviewers.

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::Args;
use console::style;

use docket_core::extract::patterns::MATERIAL_CODE;
use docket_core::record::FieldMap;
use docket_core::schema::SOURCE_FILE_COLUMN;
use docket_core::sink;

/// Arguments for the audit command.
#[derive(Args)]
pub struct AuditArgs {
    /// Combined CSV to audit (e.g. export_combined.csv)
    #[arg(required = true)]
    input: PathBuf,
}

/// Fields a usable row must carry.
const ESSENTIAL_FIELDS: [&str; 3] = ["Variety", "Grade", "Packaging"];

fn looks_like_material_code(variety: &str) -> bool {
    let trimmed = variety.trim();
    if trimmed.is_empty() {
        return false;
    }
    MATERIAL_CODE.is_match(trimmed) || trimmed.chars().all(|c| c.is_ascii_digit())
}

fn row_issues(row: &FieldMap) -> Vec<String> {
    let mut issues = Vec::new();

    for field in ESSENTIAL_FIELDS {
        if row.get(field).trim().is_empty() {
            issues.push(format!("Missing {field}"));
        }
    }

    let variety = row.get("Variety");
    if looks_like_material_code(variety) {
        issues.push(format!("Garbage in Variety ('{variety}')"));
    }

    if row.get("3rd Party Storage").trim().is_empty() {
        issues.push("Missing Packer".to_string());
    }

    issues
}

fn value_counts<'a>(rows: &'a [FieldMap], field: &str) -> Vec<(&'a str, usize)> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for row in rows {
        let value = row.get(field);
        if !value.trim().is_empty() {
            *counts.entry(value).or_default() += 1;
        }
    }
    let mut counts: Vec<_> = counts.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
    counts
}

pub async fn run(args: AuditArgs) -> anyhow::Result<()> {
    let rows = sink::read_csv(&args.input)?;
    println!("Auditing {} rows from {}...", rows.len(), args.input.display());
    println!();

    let mut failures: Vec<(String, Vec<String>)> = Vec::new();
    for (index, row) in rows.iter().enumerate() {
        let source = match row.get(SOURCE_FILE_COLUMN) {
            "" => format!("Row_{index}"),
            name => name.to_string(),
        };
        let issues = row_issues(row);
        if !issues.is_empty() {
            failures.push((source, issues));
        }
    }

    if failures.is_empty() {
        println!("{} No failures found! All rows passed the audit.", style("✓").green());
    } else {
        let mut unique_files: Vec<&str> = failures.iter().map(|(f, _)| f.as_str()).collect();
        unique_files.sort();
        unique_files.dedup();

        println!(
            "{} Found issues in {} unique files:",
            style("!").yellow(),
            unique_files.len()
        );
        println!();
        for (file, issues) in &failures {
            println!("File: {file}");
            for issue in issues {
                println!("  - {issue}");
            }
            println!("{}", "-".repeat(20));
        }
    }

    for field in ["Variety", "Grade", "Packaging"] {
        println!();
        println!("{}", style(format!("{field} values:")).cyan());
        for (value, count) in value_counts(&rows, field) {
            println!("  {count:>4}  {value}");
        }
    }

    if !failures.is_empty() {
        let mut unique_files: Vec<&str> = failures.iter().map(|(f, _)| f.as_str()).collect();
        unique_files.sort();
        unique_files.dedup();
        println!();
        println!(
            "{} unique files need attention",
            style(unique_files.len()).yellow()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_code_garbage_detected() {
        assert!(looks_like_material_code("9054 / Almonds"));
        assert!(looks_like_material_code("26115"));
        assert!(!looks_like_material_code("Almonds Kern"));
        assert!(!looks_like_material_code(""));
    }

    #[test]
    fn test_row_issues() {
        let row = FieldMap::from_pairs(
            &["Variety", "Grade", "Packaging", "3rd Party Storage"],
            &["9054 / Almonds", "Supr", "", "Seaway"],
        );
        let issues = row_issues(&row);
        assert!(issues.iter().any(|i| i == "Missing Packaging"));
        assert!(issues.iter().any(|i| i.starts_with("Garbage in Variety")));
        assert!(!issues.iter().any(|i| i == "Missing Packer"));
    }
}
