//! PDF boundary: text layer access and embedded page images.

mod document;

pub use document::PdfDocument;

use image::DynamicImage;

use crate::error::PdfError;

/// What a price-list PDF is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PdfKind {
    /// Has an extractable text layer.
    Text,
    /// Page images only (scanned catalogue).
    Scanned,
    /// Both a text layer and page images.
    Hybrid,
    /// Nothing usable.
    Empty,
}

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Trait seam for PDF access, so the pipeline can be driven by fakes in
/// tests and by other backends.
pub trait PdfReader {
    /// Number of pages in the document.
    fn page_count(&self) -> u32;

    /// Classify the document's content.
    fn kind(&self) -> PdfKind;

    /// Extract the text layer of the whole document.
    fn text(&self) -> Result<String>;

    /// Extract the text layer of a single page (1-indexed).
    fn page_text(&self, page: u32) -> Result<String>;

    /// Extract embedded images from a single page (1-indexed).
    fn page_images(&self, page: u32) -> Result<Vec<DynamicImage>>;
}
