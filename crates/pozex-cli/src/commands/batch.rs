//! Batch command - merge many documents into one dataset.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, warn};

use pozex_core::Dataset;

use super::{build_pipeline, load_config};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Merged dataset output file
    #[arg(short, long, default_value = "poz_dataset.json")]
    output: PathBuf,

    /// Append to an existing dataset file instead of overwriting it
    #[arg(long)]
    append: bool,

    /// Also write a per-file summary CSV next to the dataset
    #[arg(long)]
    summary: bool,

    /// Continue with the remaining files when one fails
    #[arg(long)]
    continue_on_error: bool,

    /// OCR model directory
    #[arg(short, long)]
    model_dir: Option<PathBuf>,

    /// Skip OCR and use only PDF text layers
    #[arg(long)]
    text_only: bool,
}

/// Outcome of one processed file.
struct FileResult {
    path: PathBuf,
    items: usize,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|entry| entry.ok())
        .filter(|path| {
            let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            matches!(
                ext.to_lowercase().as_str(),
                "pdf" | "png" | "jpg" | "jpeg" | "tif" | "tiff" | "txt"
            )
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    let pipeline = build_pipeline(&config, args.model_dir.as_deref(), args.text_only);

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("=>-"),
    );

    let mut dataset = if args.append && args.output.exists() {
        Dataset::load(&args.output)?
    } else {
        Dataset::new()
    };
    let existing = dataset.len();
    let mut results = Vec::with_capacity(files.len());

    for path in files {
        pb.set_message(
            path.file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("")
                .to_string(),
        );

        let file_start = Instant::now();
        match pipeline.process_path(&path) {
            Ok(report) => {
                results.push(FileResult {
                    path,
                    items: report.items.len(),
                    error: None,
                    processing_time_ms: file_start.elapsed().as_millis() as u64,
                });
                dataset.extend(report.items);
            }
            Err(e) => {
                let message = e.to_string();
                if args.continue_on_error {
                    warn!("failed to process {}: {}", path.display(), message);
                    results.push(FileResult {
                        path,
                        items: 0,
                        error: Some(message),
                        processing_time_ms: file_start.elapsed().as_millis() as u64,
                    });
                } else {
                    error!("failed to process {}: {}", path.display(), message);
                    anyhow::bail!("Processing failed: {}", message);
                }
            }
        }

        pb.inc(1);
    }

    pb.finish_with_message("Complete");

    dataset.save(&args.output)?;

    if args.summary {
        let summary_path = args.output.with_extension("summary.csv");
        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let failed = results.iter().filter(|r| r.error.is_some()).count();
    println!();
    println!(
        "{} {} items added ({} total) from {} files in {:?}",
        style("✓").green(),
        dataset.len() - existing,
        dataset.len(),
        results.len() - failed,
        start.elapsed()
    );
    println!(
        "{} Dataset written to {}",
        style("✓").green(),
        args.output.display()
    );

    if failed > 0 {
        println!();
        println!("{}", style("Failed files:").red());
        for result in results.iter().filter(|r| r.error.is_some()) {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn write_summary(path: &std::path::Path, results: &[FileResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record(["filename", "status", "items", "processing_time_ms", "error"])?;
    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("");
        let status = if result.error.is_none() { "success" } else { "error" };

        wtr.write_record([
            filename,
            status,
            &result.items.to_string(),
            &result.processing_time_ms.to_string(),
            result.error.as_deref().unwrap_or(""),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
