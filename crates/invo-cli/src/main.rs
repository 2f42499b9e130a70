//! CLI application for invoice/receipt OCR processing.

mod commands;

use std::path::PathBuf;

use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use invo_core::models::InvoConfig;

use commands::{batch, process};

/// Invoice/receipt OCR - extract structured data from scanned documents
#[derive(Parser)]
#[command(name = "invo")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input file or directory (images or PDFs)
    input: PathBuf,

    /// Directory for JSON output files
    #[arg(short, long, default_value = "output")]
    output_dir: PathBuf,

    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory containing OCR model files
    #[arg(short, long)]
    model_dir: Option<PathBuf>,

    /// Skip OCR for PDFs and use only embedded text
    #[arg(long)]
    text_only: bool,

    /// Also write a summary CSV after a directory run
    #[arg(long)]
    summary: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    if !cli.input.exists() {
        anyhow::bail!("Input path not found: {}", cli.input.display());
    }

    let mut config = match cli.config.as_deref() {
        Some(path) => InvoConfig::from_file(path)?,
        None => InvoConfig::default(),
    };
    if let Some(model_dir) = &cli.model_dir {
        config.ocr.model_dir = model_dir.clone();
    }

    if cli.input.is_dir() {
        batch::run(
            &cli.input,
            &cli.output_dir,
            &config,
            cli.text_only,
            cli.summary,
        )
    } else {
        process::run(&cli.input, &cli.output_dir, &config, cli.text_only)
    }
}
