//! Export command: parse export orders into per-batch CSV rows.
//!
//! Files named `*_PI.pdf` / `*_ZAPI.pdf` are packing lists that show up
//! in export folders; they are auto-routed to the packing pipeline.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, warn};

use docket_core::extract::{parse_export_text, parse_packing_text};
use docket_core::merge::apply_overrides;
use docket_core::qc::{render_report, validate, QcResult};
use docket_core::record::{tag_source, FieldMap};
use docket_core::schema::{EXPORT_COLUMNS, SOURCE_FILE_COLUMN};
use docket_core::sink;

use super::{
    batch_progress, collect_inputs, fetch_text, file_name, file_stem, load_config, run_parallel,
};

/// Arguments for the export command.
#[derive(Args)]
pub struct ExportArgs {
    /// Input file, directory or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long, default_value = "output")]
    output_dir: PathBuf,

    /// Write one combined CSV instead of per-file CSVs
    #[arg(long)]
    combine: bool,

    /// Write a Markdown QC report alongside the CSVs
    #[arg(long)]
    qc: bool,

    /// CSV of reviewed override rows keyed by Delivery/Batch number
    #[arg(long)]
    overrides: Option<PathBuf>,

    /// Number of parallel workers (defaults to the config value)
    #[arg(short = 'j', long)]
    jobs: Option<usize>,
}

/// Result of parsing a single document.
struct DocumentRows {
    rows: Vec<FieldMap>,
    warnings: Vec<String>,
    routed_to_packing: bool,
}

/// True for `_PI` / `_ZAPI` file names, which are packing lists.
fn is_packing_list(path: &Path) -> bool {
    let stem = file_stem(path).to_uppercase();
    stem.ends_with("_PI") || stem.ends_with("_ZAPI")
}

fn parse_document(path: &Path) -> anyhow::Result<DocumentRows> {
    let text = fetch_text(path)?;
    let routed = is_packing_list(path);
    let outcome = if routed {
        parse_packing_text(&text)
    } else {
        parse_export_text(&text)
    };
    debug!(
        file = %path.display(),
        rows = outcome.records.len(),
        ms = outcome.processing_time_ms,
        "parsed export document"
    );
    Ok(DocumentRows {
        rows: outcome.records,
        warnings: outcome.warnings,
        routed_to_packing: routed,
    })
}

pub async fn run(args: ExportArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;
    let jobs = args.jobs.unwrap_or(config.batch.jobs);

    let files = collect_inputs(&args.input, &config)?;
    println!("{} Found {} files to process", style("ℹ").blue(), files.len());
    fs::create_dir_all(&args.output_dir)?;

    let overrides = match &args.overrides {
        Some(path) => sink::read_csv(path)?,
        None => Vec::new(),
    };

    let pb = batch_progress(files.len());
    let results = run_parallel(files, jobs, pb, parse_document).await;

    let mut combined: Vec<FieldMap> = Vec::new();
    let mut qc_results: Vec<QcResult> = Vec::new();
    let mut ok = 0usize;
    let mut failed: Vec<(PathBuf, String)> = Vec::new();

    for (path, result) in results {
        let name = file_name(&path);
        match result {
            Ok(mut doc) => {
                for warning in &doc.warnings {
                    warn!("{name}: {warning}");
                }
                if !overrides.is_empty() {
                    apply_overrides(&mut doc.rows, &overrides);
                }
                if args.qc && !doc.routed_to_packing {
                    qc_results.push(validate(&doc.rows, &EXPORT_COLUMNS, &name));
                }

                if args.combine {
                    tag_source(&mut doc.rows, &name);
                    combined.extend(doc.rows);
                } else {
                    let out_name = if doc.routed_to_packing {
                        format!("{}_packing.csv", file_stem(&path))
                    } else {
                        format!("{}.csv", file_stem(&path))
                    };
                    let out = args.output_dir.join(out_name);
                    sink::write_csv(&out, &doc.rows, &EXPORT_COLUMNS)?;
                }
                ok += 1;
            }
            Err(e) => {
                warn!("failed to process {name}: {e}");
                failed.push((path, e.to_string()));
            }
        }
    }

    if args.combine {
        let mut columns: Vec<&str> = EXPORT_COLUMNS.to_vec();
        columns.push(SOURCE_FILE_COLUMN);
        let out = args.output_dir.join("export_combined.csv");
        sink::write_csv(&out, &combined, &columns)?;
        println!("{} Wrote {}", style("✓").green(), out.display());
    }

    if args.qc {
        let report_path = args.output_dir.join(&config.qc.report_name);
        fs::write(&report_path, render_report(&qc_results))?;
        println!("{} QC report written to {}", style("✓").green(), report_path.display());
    }

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        ok + failed.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(ok).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for (path, error) in &failed {
            println!("  - {}: {}", path.display(), error);
        }
        if !config.batch.continue_on_error {
            anyhow::bail!("{} document(s) failed", failed.len());
        }
    }

    Ok(())
}
