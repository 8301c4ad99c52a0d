//! OCR capability boundary.
//!
//! The OCR engine is an injected capability: something that maps a page
//! image to ordered text lines. Model loading and inference stay behind
//! [`TextRecognizer`], constructed once at startup and reused; the pipeline
//! never reinitializes it.

#[cfg(feature = "native")]
mod engine;

#[cfg(feature = "native")]
pub use engine::OcrEngine;

use image::DynamicImage;

use crate::error::OcrError;

/// A capability that recognizes text on a page image.
pub trait TextRecognizer {
    /// Recognize text in `image`, returning lines in reading order
    /// (top-to-bottom, left-to-right).
    fn recognize(&self, image: &DynamicImage) -> Result<Vec<String>, OcrError>;
}
