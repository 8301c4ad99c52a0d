//! Core library for Turkish price-list (POZ) extraction.
//!
//! This crate provides:
//! - PDF processing (text layer and embedded page images)
//! - An OCR capability boundary with a pure-Rust native engine
//! - The POZ line classifier & extractor (code, description, unit, price)
//! - Dataset accumulation and the ingestion report envelope

pub mod error;
pub mod models;
pub mod ocr;
pub mod pdf;
pub mod pipeline;
pub mod poz;

pub use error::{PozexError, Result};
pub use models::config::{ExtractionConfig, OcrConfig, PdfConfig, PozexConfig};
pub use models::item::{Dataset, LineItem, ProcessReport};
pub use ocr::TextRecognizer;
pub use pdf::{PdfDocument, PdfKind, PdfReader};
pub use pipeline::{DocumentPipeline, DocumentReport};
pub use poz::{CodeGrammar, LineExtractor, LineParser, UnitVocabulary};

#[cfg(feature = "native")]
pub use ocr::OcrEngine;
