//! Domestic command: parse delivery notes into a batch table and an
//! SSCC detail table.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, warn};

use docket_core::extract::parse_domestic_text;
use docket_core::record::{tag_source, FieldMap};
use docket_core::schema::{DOMESTIC_BATCH_COLUMNS, SOURCE_FILE_COLUMN, SSCC_COLUMNS};
use docket_core::sink;

use super::{
    batch_progress, collect_inputs, fetch_text, file_name, file_stem, load_config, run_parallel,
};

/// Arguments for the domestic command.
#[derive(Args)]
pub struct DomesticArgs {
    /// Input file, directory or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long, default_value = "output")]
    output_dir: PathBuf,

    /// Write combined CSVs instead of per-file CSVs
    #[arg(long)]
    combine: bool,

    /// Number of parallel workers (defaults to the config value)
    #[arg(short = 'j', long)]
    jobs: Option<usize>,
}

struct DocumentTables {
    batch_rows: Vec<FieldMap>,
    sscc_rows: Vec<FieldMap>,
    warnings: Vec<String>,
}

fn parse_document(path: &Path) -> anyhow::Result<DocumentTables> {
    let text = fetch_text(path)?;
    let outcome = parse_domestic_text(&text);
    debug!(
        file = %path.display(),
        batches = outcome.batch_rows.len(),
        ssccs = outcome.sscc_rows.len(),
        ms = outcome.processing_time_ms,
        "parsed domestic document"
    );
    Ok(DocumentTables {
        batch_rows: outcome.batch_rows,
        sscc_rows: outcome.sscc_rows,
        warnings: outcome.warnings,
    })
}

pub async fn run(args: DomesticArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;
    let jobs = args.jobs.unwrap_or(config.batch.jobs);

    let files = collect_inputs(&args.input, &config)?;
    println!("{} Found {} files to process", style("ℹ").blue(), files.len());
    fs::create_dir_all(&args.output_dir)?;

    let pb = batch_progress(files.len());
    let results = run_parallel(files, jobs, pb, parse_document).await;

    let mut all_batches: Vec<FieldMap> = Vec::new();
    let mut all_ssccs: Vec<FieldMap> = Vec::new();
    let mut ok = 0usize;
    let mut failed: Vec<(PathBuf, String)> = Vec::new();

    for (path, result) in results {
        let name = file_name(&path);
        match result {
            Ok(mut doc) => {
                for warning in &doc.warnings {
                    warn!("{name}: {warning}");
                }
                if args.combine {
                    tag_source(&mut doc.batch_rows, &name);
                    tag_source(&mut doc.sscc_rows, &name);
                    all_batches.extend(doc.batch_rows);
                    all_ssccs.extend(doc.sscc_rows);
                } else {
                    let stem = file_stem(&path);
                    sink::write_csv(
                        &args.output_dir.join(format!("{stem}_batches.csv")),
                        &doc.batch_rows,
                        &DOMESTIC_BATCH_COLUMNS,
                    )?;
                    sink::write_csv(
                        &args.output_dir.join(format!("{stem}_sscc.csv")),
                        &doc.sscc_rows,
                        &SSCC_COLUMNS,
                    )?;
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
        let mut batch_columns: Vec<&str> = DOMESTIC_BATCH_COLUMNS.to_vec();
        batch_columns.push(SOURCE_FILE_COLUMN);
        let mut sscc_columns: Vec<&str> = SSCC_COLUMNS.to_vec();
        sscc_columns.push(SOURCE_FILE_COLUMN);

        let batches_out = args.output_dir.join("domestic_batches_combined.csv");
        let sscc_out = args.output_dir.join("domestic_sscc_combined.csv");
        sink::write_csv(&batches_out, &all_batches, &batch_columns)?;
        sink::write_csv(&sscc_out, &all_ssccs, &sscc_columns)?;
        println!("{} Wrote {}", style("✓").green(), batches_out.display());
        println!("{} Wrote {}", style("✓").green(), sscc_out.display());
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
