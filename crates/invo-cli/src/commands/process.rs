//! Process command - extract data from a single document.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use invo_core::models::InvoConfig;
use invo_core::ocr::{ImagePreprocessor, OcrCapture, OcrEngine};
use invo_core::pdf::{PdfProcessor, PdfType};
use invo_core::{InvoiceExtractor, InvoiceRecord, PdfExtractor, PureOcrEngine, ReceiptParser};

/// File extensions accepted as input documents.
pub const INPUT_EXTENSIONS: [&str; 8] = ["jpg", "jpeg", "png", "pdf", "tif", "tiff", "bmp", "webp"];

/// Process a single file and write its JSON record.
pub fn run(
    input: &Path,
    output_dir: &Path,
    config: &InvoConfig,
    text_only: bool,
) -> anyhow::Result<()> {
    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {msg}")
            .unwrap()
            .progress_chars("##-"),
    );

    pb.set_message("Loading OCR engine...");
    pb.set_position(10);
    let engine = create_engine(config);

    pb.set_message("Processing document...");
    pb.set_position(30);
    let record = process_file(input, engine.as_ref(), config, text_only)?;

    pb.set_message("Writing output...");
    pb.set_position(90);
    let output_path = write_record(output_dir, input, &record)?;

    pb.finish_with_message("Done");

    println!(
        "{} Output written to {}",
        style("✓").green(),
        output_path.display()
    );

    Ok(())
}

/// Construct the OCR engine once for the run.
///
/// A missing or unloadable engine is not fatal: the pipeline degrades to
/// empty detections (and embedded text for PDFs).
pub fn create_engine(config: &InvoConfig) -> Option<PureOcrEngine> {
    match PureOcrEngine::from_dir(&config.ocr.model_dir) {
        Ok(engine) => Some(engine),
        Err(e) => {
            warn!("OCR engine unavailable ({}); continuing without detections", e);
            None
        }
    }
}

/// Extract a record from one input document.
pub fn process_file(
    path: &Path,
    engine: Option<&PureOcrEngine>,
    config: &InvoConfig,
    text_only: bool,
) -> anyhow::Result<InvoiceRecord> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "pdf" => process_pdf(path, engine, config, text_only),
        ext if INPUT_EXTENSIONS.contains(&ext) => process_image(path, engine, config),
        _ => anyhow::bail!("Unsupported file format: {}", extension),
    }
}

fn process_pdf(
    path: &Path,
    engine: Option<&PureOcrEngine>,
    config: &InvoConfig,
    text_only: bool,
) -> anyhow::Result<InvoiceRecord> {
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;

    let mut extractor = PdfExtractor::new();
    extractor.load(&data)?;

    let pdf_type = extractor.analyze();
    debug!(?pdf_type, pages = extractor.page_count(), "loaded PDF");

    let mut detections = Vec::new();
    let mut page_texts: Vec<String> = Vec::new();

    let run_ocr = !text_only && pdf_type != PdfType::Text;
    if run_ocr {
        if let Some(engine) = engine {
            let preprocessor = ImagePreprocessor::new()
                .with_max_size(config.ocr.max_image_size)
                .with_binarize(config.ocr.binarize);

            for page in 1..=extractor.page_count() {
                if config.pdf.max_pages > 0 && page as usize > config.pdf.max_pages {
                    debug!("stopping at page limit {}", config.pdf.max_pages);
                    break;
                }

                for image in extractor.extract_images(page).unwrap_or_default() {
                    let prepared = preprocessor.prepare(&image);
                    match engine.detect(&prepared) {
                        Ok(found) => {
                            let capture = OcrCapture::from_detections(
                                found,
                                config.ocr.confidence_threshold,
                            );
                            if !capture.text.is_empty() {
                                page_texts.push(capture.text.clone());
                            }
                            detections.extend(capture.detections);
                        }
                        Err(e) => warn!("OCR failed on page {}: {}", page, e),
                    }
                }
            }
        }
    }

    let mut text = page_texts.join("\n");

    // Fall back to embedded text when OCR produced nothing usable.
    if config.pdf.prefer_embedded_text && text.trim().len() < config.pdf.min_text_length {
        match extractor.extract_text() {
            Ok(embedded) if embedded.trim().len() > text.trim().len() => {
                debug!("using embedded PDF text ({} chars)", embedded.len());
                text = embedded;
                detections.clear();
            }
            Ok(_) => {}
            Err(e) => debug!("no embedded text available: {}", e),
        }
    }

    Ok(ReceiptParser::new().parse(&text, &detections))
}

fn process_image(
    path: &Path,
    engine: Option<&PureOcrEngine>,
    config: &InvoConfig,
) -> anyhow::Result<InvoiceRecord> {
    let image = image::open(path).with_context(|| format!("reading {}", path.display()))?;

    let capture = match engine {
        Some(engine) => {
            let prepared = ImagePreprocessor::new()
                .with_max_size(config.ocr.max_image_size)
                .with_binarize(config.ocr.binarize)
                .prepare(&image);

            match engine.detect(&prepared) {
                Ok(found) => OcrCapture::from_detections(found, config.ocr.confidence_threshold),
                Err(e) => {
                    warn!("OCR failed for {}: {}", path.display(), e);
                    OcrCapture::empty()
                }
            }
        }
        None => OcrCapture::empty(),
    };

    debug!(
        detections = capture.detections.len(),
        "OCR capture for {}",
        path.display()
    );

    Ok(ReceiptParser::new().extract(&capture))
}

/// Write a record as pretty JSON next to its input's stem.
///
/// The record is serialized fully before the filesystem is touched, so a
/// failed document never leaves a partial output file.
pub fn write_record(
    output_dir: &Path,
    input: &Path,
    record: &InvoiceRecord,
) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("creating {}", output_dir.display()))?;

    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document");
    let output_path = output_dir.join(format!("{}.json", stem));

    let json = serde_json::to_string_pretty(record)?;
    fs::write(&output_path, json)
        .with_context(|| format!("writing {}", output_path.display()))?;

    Ok(output_path)
}
