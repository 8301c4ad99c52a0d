//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod process;

use std::path::Path;

use tracing::warn;

use pozex_core::{DocumentPipeline, LineExtractor, OcrEngine, PozexConfig};

/// Load configuration from an explicit path or fall back to defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<PozexConfig> {
    match config_path {
        Some(path) => Ok(PozexConfig::from_file(Path::new(path))?),
        None => Ok(PozexConfig::default()),
    }
}

/// Build the document pipeline, attaching the OCR engine when its model
/// files are present. Without models the pipeline still handles text-layer
/// PDFs and plain text.
pub fn build_pipeline(
    config: &PozexConfig,
    model_dir: Option<&Path>,
    text_only: bool,
) -> DocumentPipeline {
    let extractor = LineExtractor::from_config(&config.extraction);
    let pipeline = DocumentPipeline::new(extractor).with_pdf_config(config.pdf.clone());

    if text_only {
        return pipeline;
    }

    let model_dir = model_dir.unwrap_or(&config.ocr.model_dir);
    let det_model = model_dir.join(&config.ocr.detection_model);
    if !det_model.exists() {
        warn!(
            "OCR models not found at {}, scanned documents will be rejected",
            model_dir.display()
        );
        return pipeline;
    }

    match OcrEngine::from_dir(model_dir, &config.ocr) {
        Ok(engine) => pipeline.with_recognizer(engine),
        Err(e) => {
            warn!("failed to load OCR engine: {}, continuing without OCR", e);
            pipeline
        }
    }
}
