//! Process command - extract POZ items from a single document.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use pozex_core::{DocumentReport, LineItem, ProcessReport};

use super::{build_pipeline, load_config};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (PDF, image, or plain text)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// OCR model directory
    #[arg(short, long)]
    model_dir: Option<PathBuf>,

    /// Skip OCR and use only the PDF text layer
    #[arg(long)]
    text_only: bool,

    /// Wrap JSON output in the {status, items, count} envelope
    #[arg(long)]
    envelope: bool,

    /// Print item count and timing to stderr
    #[arg(long)]
    stats: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON array of items
    Json,
    /// CSV with one row per item
    Csv,
    /// Aligned plain-text table
    Table,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let pipeline = build_pipeline(&config, args.model_dir.as_deref(), args.text_only);

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap(),
    );
    pb.set_message(format!("Processing {}", args.input.display()));

    let report = match pipeline.process_path(&args.input) {
        Ok(report) => report,
        Err(e) if args.envelope => {
            // The envelope format reports document-level failures in-band.
            pb.finish_and_clear();
            let envelope = ProcessReport::error(e.to_string());
            emit(&serde_json::to_string_pretty(&envelope)?, args.output.as_deref())?;
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    pb.finish_and_clear();
    debug!("processed {} pages", report.pages);

    let output = format_report(&report, args.format, args.envelope)?;
    emit(&output, args.output.as_deref())?;

    if args.stats {
        eprintln!(
            "{} {} items from {} page(s) in {}ms",
            style("ℹ").blue(),
            report.items.len(),
            report.pages,
            report.processing_time_ms
        );
    }

    Ok(())
}

fn emit(output: &str, path: Option<&std::path::Path>) -> anyhow::Result<()> {
    if let Some(path) = path {
        fs::write(path, output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            path.display()
        );
    } else {
        println!("{}", output);
    }
    Ok(())
}

fn format_report(
    report: &DocumentReport,
    format: OutputFormat,
    envelope: bool,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json if envelope => {
            let envelope = ProcessReport::success(report.items.clone());
            Ok(serde_json::to_string_pretty(&envelope)?)
        }
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&report.items)?),
        OutputFormat::Csv => format_csv(&report.items),
        OutputFormat::Table => Ok(format_table(&report.items)),
    }
}

fn format_csv(items: &[LineItem]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["code", "description", "unit", "unitPrice"])?;
    for item in items {
        wtr.write_record([
            &item.code,
            &item.description,
            &item.unit,
            &item.unit_price.to_string(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_table(items: &[LineItem]) -> String {
    let code_width = items
        .iter()
        .map(|i| i.code.chars().count())
        .chain([4])
        .max()
        .unwrap_or(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<code_width$}  {:>12}  {:>6}  Tanım\n",
        "Poz", "Fiyat", "Birim"
    ));

    for item in items {
        output.push_str(&format!(
            "{:<code_width$}  {:>12}  {:>6}  {}\n",
            item.code, item.unit_price, item.unit, item.description
        ));
    }

    output
}
