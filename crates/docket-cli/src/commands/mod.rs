//! CLI subcommands.

pub mod audit;
pub mod domestic;
pub mod export;
pub mod packing;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;

use docket_core::config::DocketConfig;
use docket_core::source::{DocumentSource, PdfTextSource, TextFileSource};

/// Load the config file if one was given, defaults otherwise.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<DocketConfig> {
    match config_path {
        Some(path) => Ok(DocketConfig::from_file(Path::new(path))?),
        None => Ok(DocketConfig::default()),
    }
}

/// Expand an input argument into document paths: a directory becomes
/// every document inside it, anything else is treated as a glob pattern
/// (a plain file path matches itself).
pub fn collect_inputs(input: &str, config: &DocketConfig) -> anyhow::Result<Vec<PathBuf>> {
    let allowed = |path: &PathBuf| {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        ext == "pdf" || (config.source.text_files && ext == "txt")
    };

    let pattern = if Path::new(input).is_dir() {
        format!("{}/*", input.trim_end_matches('/'))
    } else {
        input.to_string()
    };

    let mut files: Vec<PathBuf> = glob(&pattern)?.filter_map(|r| r.ok()).filter(allowed).collect();
    files.sort();

    if files.is_empty() {
        anyhow::bail!("No matching documents found for: {input}");
    }
    Ok(files)
}

/// Fetch document text through the source matching the file extension.
pub fn fetch_text(path: &Path) -> docket_core::source::Result<String> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    if ext == "txt" {
        TextFileSource::new().fetch_text(path)
    } else {
        PdfTextSource::new().fetch_text(path)
    }
}

/// Short display name for a document.
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("document")
        .to_string()
}

/// File stem used to derive output CSV names.
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document")
        .to_string()
}

/// Progress bar over a document batch.
pub fn batch_progress(total: usize) -> ProgressBar {
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("=>-"),
    );
    pb
}

/// Run a per-document closure over the batch on blocking workers,
/// bounded by `jobs`, collecting results in input order. Failures stay
/// per-document; the batch always runs to the end.
pub async fn run_parallel<T, F>(
    files: Vec<PathBuf>,
    jobs: usize,
    pb: ProgressBar,
    work: F,
) -> Vec<(PathBuf, anyhow::Result<T>)>
where
    T: Send + 'static,
    F: Fn(&Path) -> anyhow::Result<T> + Clone + Send + Sync + 'static,
{
    let semaphore = Arc::new(Semaphore::new(jobs.max(1)));
    let mut handles = Vec::with_capacity(files.len());

    for path in files {
        let permit = semaphore
            .clone()
            .acquire_owned()
            .await
            .expect("semaphore never closed");
        let work = work.clone();
        let pb = pb.clone();
        handles.push((
            path.clone(),
            tokio::task::spawn_blocking(move || {
                let _permit = permit;
                let result = work(&path);
                pb.inc(1);
                result
            }),
        ));
    }

    let mut results = Vec::with_capacity(handles.len());
    for (path, handle) in handles {
        let result = match handle.await {
            Ok(result) => result,
            Err(e) => Err(anyhow::anyhow!("worker panicked: {e}")),
        };
        results.push((path, result));
    }
    pb.finish_with_message("Complete");
    results
}
