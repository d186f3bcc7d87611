//! Packing command: parse packing lists into single-row CSVs.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, warn};

use docket_core::extract::parse_packing_text;
use docket_core::record::{tag_source, FieldMap};
use docket_core::schema::{EXPORT_COLUMNS, SOURCE_FILE_COLUMN};
use docket_core::sink;

use super::{
    batch_progress, collect_inputs, fetch_text, file_name, file_stem, load_config, run_parallel,
};

/// Arguments for the packing command.
#[derive(Args)]
pub struct PackingArgs {
    /// Input file, directory or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long, default_value = "output")]
    output_dir: PathBuf,

    /// Write one combined CSV instead of per-file CSVs
    #[arg(long)]
    combine: bool,

    /// Number of parallel workers (defaults to the config value)
    #[arg(short = 'j', long)]
    jobs: Option<usize>,
}

fn parse_document(path: &Path) -> anyhow::Result<Vec<FieldMap>> {
    let text = fetch_text(path)?;
    let outcome = parse_packing_text(&text);
    debug!(
        file = %path.display(),
        ms = outcome.processing_time_ms,
        "parsed packing list"
    );
    Ok(outcome.records)
}

pub async fn run(args: PackingArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;
    let jobs = args.jobs.unwrap_or(config.batch.jobs);

    let files = collect_inputs(&args.input, &config)?;
    println!("{} Found {} files to process", style("ℹ").blue(), files.len());
    fs::create_dir_all(&args.output_dir)?;

    let pb = batch_progress(files.len());
    let results = run_parallel(files, jobs, pb, parse_document).await;

    let mut combined: Vec<FieldMap> = Vec::new();
    let mut ok = 0usize;
    let mut failed: Vec<(PathBuf, String)> = Vec::new();

    for (path, result) in results {
        let name = file_name(&path);
        match result {
            Ok(mut rows) => {
                if args.combine {
                    tag_source(&mut rows, &name);
                    combined.extend(rows);
                } else {
                    let out = args.output_dir.join(format!("{}_packing.csv", file_stem(&path)));
                    sink::write_csv(&out, &rows, &EXPORT_COLUMNS)?;
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
        let out = args.output_dir.join("pi_combined.csv");
        sink::write_csv(&out, &combined, &columns)?;
        println!("{} Wrote {}", style("✓").green(), out.display());
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
