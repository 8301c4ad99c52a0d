//! Native OCR engine backed by `pure-onnx-ocr`.

use std::path::Path;
use std::time::Instant;

use image::DynamicImage;
use tracing::{debug, info};

use super::TextRecognizer;
use crate::error::OcrError;
use crate::models::config::OcrConfig;

/// OCR engine wrapping `pure-onnx-ocr` (pure Rust, no external runtime).
///
/// Construction is the explicit initialization step: model files and the
/// character dictionary (which selects the recognized script) are loaded
/// once, and the engine is reused for every page afterwards.
pub struct OcrEngine {
    engine: pure_onnx_ocr::engine::OcrEngine,
    row_merge_threshold: f32,
    keep_unk: bool,
}

impl OcrEngine {
    /// Load detection/recognition models and the dictionary from `model_dir`.
    pub fn from_dir(model_dir: &Path, config: &OcrConfig) -> Result<Self, OcrError> {
        let det_path = model_dir.join(&config.detection_model);
        let rec_path = model_dir.join(&config.recognition_model);
        let dict_path = model_dir.join(&config.dictionary);

        let engine = pure_onnx_ocr::engine::OcrEngineBuilder::new()
            .det_model_path(&det_path)
            .rec_model_path(&rec_path)
            .dictionary_path(&dict_path)
            .build()
            .map_err(|e| OcrError::ModelLoad(format!("pure-onnx-ocr: {}", e)))?;

        info!("loaded OCR engine from {}", model_dir.display());

        Ok(Self {
            engine,
            row_merge_threshold: config.row_merge_threshold,
            keep_unk: config.keep_unk,
        })
    }
}

impl TextRecognizer for OcrEngine {
    fn recognize(&self, image: &DynamicImage) -> Result<Vec<String>, OcrError> {
        let start = Instant::now();

        let regions = self
            .engine
            .run_from_image(image)
            .map_err(|e| OcrError::Recognition(format!("pure-onnx-ocr: {}", e)))?;

        let spans: Vec<TextSpan> = regions
            .iter()
            .map(|r| {
                let (x, y) = top_left(&r.bounding_box);
                let text = if self.keep_unk {
                    r.text.clone()
                } else {
                    r.text.replace("[UNK]", " ")
                };
                TextSpan { x, y, text }
            })
            .collect();

        let lines = lines_from_spans(spans, self.row_merge_threshold);

        debug!(
            "OCR recognized {} lines in {}ms",
            lines.len(),
            start.elapsed().as_millis()
        );

        Ok(lines)
    }
}

/// A recognized text region reduced to its anchor point.
#[derive(Debug, Clone)]
struct TextSpan {
    x: f32,
    y: f32,
    text: String,
}

/// Top-left corner of a detected region polygon.
fn top_left(polygon: &pure_onnx_ocr::Polygon<f64>) -> (f32, f32) {
    let mut min_x = f32::INFINITY;
    let mut min_y = f32::INFINITY;
    for coord in polygon.exterior().coords() {
        min_x = min_x.min(coord.x as f32);
        min_y = min_y.min(coord.y as f32);
    }
    (min_x, min_y)
}

/// Assemble detected spans into text lines in reading order.
///
/// Spans whose vertical anchors fall within `threshold` pixels belong to
/// the same physical row; table rows detected as separate cells come back
/// out as one line, which is what the line classifier expects.
fn lines_from_spans(mut spans: Vec<TextSpan>, threshold: f32) -> Vec<String> {
    spans.sort_by(|a, b| {
        a.y.partial_cmp(&b.y)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
    });

    let mut lines: Vec<String> = Vec::new();
    let mut row: Vec<TextSpan> = Vec::new();
    let mut row_y = f32::NEG_INFINITY;

    for span in spans {
        if (span.y - row_y).abs() < threshold {
            row.push(span);
        } else {
            if !row.is_empty() {
                lines.push(flush_row(&mut row));
            }
            row_y = span.y;
            row.push(span);
        }
    }
    if !row.is_empty() {
        lines.push(flush_row(&mut row));
    }

    lines
}

fn flush_row(row: &mut Vec<TextSpan>) -> String {
    row.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));
    let line = row
        .iter()
        .map(|s| s.text.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    row.clear();
    line
}
