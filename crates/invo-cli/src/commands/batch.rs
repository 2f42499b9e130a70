//! Batch processing for a directory of documents.

use std::fs;
use std::path::{Path, PathBuf};

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use invo_core::models::InvoConfig;
use invo_core::InvoiceRecord;

use super::process;

/// Result of processing a single file.
struct BatchOutcome {
    path: PathBuf,
    record: Option<InvoiceRecord>,
    error: Option<String>,
}

/// Process every recognized document in a directory.
///
/// Failures are per-file: they are reported and the batch continues.
pub fn run(
    input_dir: &Path,
    output_dir: &Path,
    config: &InvoConfig,
    text_only: bool,
    summary: bool,
) -> anyhow::Result<()> {
    let mut files: Vec<PathBuf> = fs::read_dir(input_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            let ext = path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("")
                .to_lowercase();
            path.is_file() && process::INPUT_EXTENSIONS.contains(&ext.as_str())
        })
        .collect();
    files.sort();

    if files.is_empty() {
        anyhow::bail!("No valid input files found in {}", input_dir.display());
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    let engine = process::create_engine(config);

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("=>-"),
    );

    let mut outcomes = Vec::with_capacity(files.len());
    for path in &files {
        let result = process::process_file(path, engine.as_ref(), config, text_only)
            .and_then(|record| {
                let output_path = process::write_record(output_dir, path, &record)?;
                debug!("Wrote output to {}", output_path.display());
                Ok(record)
            });

        match result {
            Ok(record) => outcomes.push(BatchOutcome {
                path: path.clone(),
                record: Some(record),
                error: None,
            }),
            Err(e) => {
                pb.suspend(|| {
                    eprintln!(
                        "{} Failed to process {}: {}",
                        style("✗").red(),
                        path.display(),
                        e
                    );
                });
                outcomes.push(BatchOutcome {
                    path: path.clone(),
                    record: None,
                    error: Some(e.to_string()),
                });
            }
        }

        pb.inc(1);
    }

    pb.finish_with_message("Complete");

    if summary {
        let summary_path = output_dir.join("summary.csv");
        write_summary(&summary_path, &outcomes)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let succeeded = outcomes.iter().filter(|o| o.record.is_some()).count();
    let failed: Vec<&BatchOutcome> = outcomes.iter().filter(|o| o.error.is_some()).collect();

    println!();
    println!(
        "{} Processed {} files: {} successful, {} failed",
        style("✓").green(),
        outcomes.len(),
        style(succeeded).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for outcome in &failed {
            println!(
                "  - {}: {}",
                outcome.path.display(),
                outcome.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn write_summary(path: &Path, outcomes: &[BatchOutcome]) -> anyhow::Result<()> {
    fs::create_dir_all(path.parent().unwrap_or(Path::new(".")))?;
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "merchant_name",
        "invoice_number",
        "date",
        "total_amount",
        "currency",
        "line_items",
        "error",
    ])?;

    for outcome in outcomes {
        let filename = outcome
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        if let Some(record) = &outcome.record {
            wtr.write_record([
                filename,
                "success",
                record.merchant_name.as_deref().unwrap_or(""),
                record.invoice_number.as_deref().unwrap_or(""),
                record.date.as_deref().unwrap_or(""),
                &record
                    .total_amount
                    .map(|a| format!("{:.2}", a))
                    .unwrap_or_default(),
                record.currency.as_deref().unwrap_or(""),
                &record.line_items.len().to_string(),
                "",
            ])?;
        } else {
            wtr.write_record([
                filename,
                "error",
                "",
                "",
                "",
                "",
                "",
                "",
                outcome.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
