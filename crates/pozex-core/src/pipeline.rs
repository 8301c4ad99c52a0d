//! Document pipeline: file bytes in, ordered line items out.
//!
//! Pages are processed sequentially and their items concatenated, so the
//! dataset keeps page order, then in-page line order. Per-line failures are
//! silent non-matches; only document-level problems (unreadable file, OCR
//! failure) surface as errors.

use std::path::Path;
use std::time::Instant;

use image::DynamicImage;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{OcrError, PdfError, Result};
use crate::models::config::PdfConfig;
use crate::models::item::LineItem;
use crate::ocr::TextRecognizer;
use crate::pdf::{PdfDocument, PdfKind, PdfReader};
use crate::poz::{LineExtractor, LineParser};

/// Summary of one processed document.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentReport {
    /// Extracted items, in page then line order.
    pub items: Vec<LineItem>,
    /// Pages actually processed.
    pub pages: u32,
    /// Wall-clock processing time.
    pub processing_time_ms: u64,
}

/// Orchestrates PDF access, OCR, and line extraction for one document at a
/// time. The recognizer is injected; without one, only text-layer documents
/// can be processed.
pub struct DocumentPipeline {
    extractor: LineExtractor,
    recognizer: Option<Box<dyn TextRecognizer>>,
    pdf: PdfConfig,
}

impl DocumentPipeline {
    pub fn new(extractor: LineExtractor) -> Self {
        Self {
            extractor,
            recognizer: None,
            pdf: PdfConfig::default(),
        }
    }

    /// Inject the OCR capability used for scanned pages.
    pub fn with_recognizer(mut self, recognizer: impl TextRecognizer + 'static) -> Self {
        self.recognizer = Some(Box::new(recognizer));
        self
    }

    pub fn with_pdf_config(mut self, pdf: PdfConfig) -> Self {
        self.pdf = pdf;
        self
    }

    /// Dispatch on file extension, mirroring the reference ingestion
    /// service: PDFs, page images, or already-linearized plain text.
    pub fn process_path(&self, path: &Path) -> Result<DocumentReport> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        info!("processing {}", path.display());

        match extension.as_str() {
            "pdf" => {
                let data = std::fs::read(path)?;
                self.process_pdf(&data)
            }
            "png" | "jpg" | "jpeg" | "tif" | "tiff" | "bmp" | "webp" => {
                let image = image::open(path)?;
                self.process_image(&image)
            }
            "txt" => {
                let text = std::fs::read_to_string(path)?;
                Ok(self.process_text(&text))
            }
            other => Err(crate::error::PozexError::UnsupportedFormat(other.to_string())),
        }
    }

    /// Process a PDF already loaded into memory.
    pub fn process_pdf(&self, data: &[u8]) -> Result<DocumentReport> {
        let document = PdfDocument::open(data)?;
        self.process_reader(&document)
    }

    /// Process any [`PdfReader`] implementation.
    pub fn process_reader(&self, document: &dyn PdfReader) -> Result<DocumentReport> {
        let start = Instant::now();

        let total = document.page_count();
        let pages = if self.pdf.max_pages == 0 {
            total
        } else {
            total.min(self.pdf.max_pages as u32)
        };
        if pages < total {
            debug!("limiting processing to {} of {} pages", pages, total);
        }

        let kind = document.kind();
        debug!("classified PDF as {:?}, processing {} pages", kind, pages);

        let use_text_layer = match kind {
            PdfKind::Empty => return Err(PdfError::NoContent.into()),
            PdfKind::Text => true,
            PdfKind::Scanned => false,
            PdfKind::Hybrid => {
                let text_len = document.text().map(|t| t.trim().len()).unwrap_or(0);
                if self.pdf.prefer_embedded_text && text_len >= self.pdf.min_text_length {
                    true
                } else {
                    warn!("hybrid PDF has a thin text layer, using OCR");
                    false
                }
            }
        };

        let mut items = Vec::new();
        for page in 1..=pages {
            let page_items = if use_text_layer {
                let text = document.page_text(page)?;
                self.extractor.extract_text(&text)
            } else {
                self.ocr_page(document, page)?
            };
            debug!("page {}: {} items", page, page_items.len());
            items.extend(page_items);
        }

        let report = DocumentReport {
            items,
            pages,
            processing_time_ms: start.elapsed().as_millis() as u64,
        };
        info!(
            "extracted {} items from {} pages in {}ms",
            report.items.len(),
            report.pages,
            report.processing_time_ms
        );
        Ok(report)
    }

    /// Process a standalone page image through OCR.
    pub fn process_image(&self, image: &DynamicImage) -> Result<DocumentReport> {
        let start = Instant::now();
        let recognizer = self.require_recognizer()?;

        let lines = recognizer.recognize(image)?;
        let items = self.extractor.extract(lines.iter().map(String::as_str));

        Ok(DocumentReport {
            items,
            pages: 1,
            processing_time_ms: start.elapsed().as_millis() as u64,
        })
    }

    /// Process text that is already linearized into lines. Total: malformed
    /// lines are dropped, never reported.
    pub fn process_text(&self, text: &str) -> DocumentReport {
        let start = Instant::now();
        let items = self.extractor.extract_text(text);

        DocumentReport {
            items,
            pages: 1,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }

    fn ocr_page(&self, document: &dyn PdfReader, page: u32) -> Result<Vec<LineItem>> {
        let recognizer = self.require_recognizer()?;

        let mut items = Vec::new();
        for image in document.page_images(page)? {
            let lines = recognizer.recognize(&image)?;
            items.extend(self.extractor.extract(lines.iter().map(String::as_str)));
        }
        Ok(items)
    }

    fn require_recognizer(&self) -> Result<&dyn TextRecognizer> {
        self.recognizer.as_deref().ok_or_else(|| {
            OcrError::NotConfigured(
                "scanned input needs an OCR engine; point --model-dir at the model files"
                    .to_string(),
            )
            .into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// A text-layer PDF standing in for lopdf-backed documents.
    struct FakePdf {
        pages: Vec<String>,
        kind: PdfKind,
    }

    impl PdfReader for FakePdf {
        fn page_count(&self) -> u32 {
            self.pages.len() as u32
        }

        fn kind(&self) -> PdfKind {
            self.kind
        }

        fn text(&self) -> crate::pdf::Result<String> {
            Ok(self.pages.join("\n"))
        }

        fn page_text(&self, page: u32) -> crate::pdf::Result<String> {
            self.pages
                .get(page as usize - 1)
                .cloned()
                .ok_or(PdfError::InvalidPage(page))
        }

        fn page_images(&self, _page: u32) -> crate::pdf::Result<Vec<DynamicImage>> {
            Ok(vec![DynamicImage::new_rgb8(4, 4)])
        }
    }

    /// Recognizer returning one canned page of lines per call.
    struct FakeRecognizer {
        lines: Vec<String>,
    }

    impl TextRecognizer for FakeRecognizer {
        fn recognize(&self, _image: &DynamicImage) -> std::result::Result<Vec<String>, OcrError> {
            Ok(self.lines.clone())
        }
    }

    #[test]
    fn test_text_layer_pages_keep_order() {
        let document = FakePdf {
            pages: vec![
                "Poz No Tanım Birim Fiyat\n15.010.1001 Beton C25 dökümü m3 1.250,75".to_string(),
                "ÇŞM.003 Asfalt kaplama m2 85,00".to_string(),
            ],
            kind: PdfKind::Text,
        };

        let pipeline = DocumentPipeline::new(LineExtractor::new());
        let report = pipeline.process_reader(&document).unwrap();

        let codes: Vec<&str> = report.items.iter().map(|i| i.code.as_str()).collect();
        assert_eq!(codes, vec!["15.010.1001", "ÇŞM.003"]);
        assert_eq!(report.pages, 2);
    }

    #[test]
    fn test_scanned_pages_go_through_the_recognizer() {
        let document = FakePdf {
            pages: vec![String::new()],
            kind: PdfKind::Scanned,
        };
        let recognizer = FakeRecognizer {
            lines: vec![
                "Poz No Tanım Birim Fiyat".to_string(),
                "15.010.1001 Beton C25 dökümü m3 1.250,75".to_string(),
            ],
        };

        let pipeline = DocumentPipeline::new(LineExtractor::new()).with_recognizer(recognizer);
        let report = pipeline.process_reader(&document).unwrap();

        assert_eq!(report.items.len(), 1);
        assert_eq!(report.items[0].code, "15.010.1001");
    }

    #[test]
    fn test_scanned_document_without_recognizer_is_an_error() {
        let document = FakePdf {
            pages: vec![String::new()],
            kind: PdfKind::Scanned,
        };

        let pipeline = DocumentPipeline::new(LineExtractor::new());
        let result = pipeline.process_reader(&document);
        assert!(matches!(
            result,
            Err(crate::error::PozexError::Ocr(OcrError::NotConfigured(_)))
        ));
    }

    #[test]
    fn test_empty_document_is_an_error() {
        let document = FakePdf {
            pages: vec![String::new()],
            kind: PdfKind::Empty,
        };

        let pipeline = DocumentPipeline::new(LineExtractor::new());
        assert!(pipeline.process_reader(&document).is_err());
    }

    #[test]
    fn test_max_pages_limits_processing() {
        let document = FakePdf {
            pages: vec![
                "15.010.1001 Beton C25 dökümü m3 1.250,75".to_string(),
                "ÇŞM.003 Asfalt kaplama m2 85,00".to_string(),
            ],
            kind: PdfKind::Text,
        };

        let pipeline = DocumentPipeline::new(LineExtractor::new()).with_pdf_config(PdfConfig {
            max_pages: 1,
            ..PdfConfig::default()
        });
        let report = pipeline.process_reader(&document).unwrap();

        assert_eq!(report.pages, 1);
        assert_eq!(report.items.len(), 1);
        assert_eq!(report.items[0].code, "15.010.1001");
    }

    #[test]
    fn test_process_text_is_total() {
        let pipeline = DocumentPipeline::new(LineExtractor::new());
        let report = pipeline.process_text("garbage\n\nmore garbage");
        assert!(report.items.is_empty());
    }
}
