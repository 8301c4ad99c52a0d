//! PDF document access built on lopdf and pdf-extract.

use image::{DynamicImage, GrayImage, RgbImage};
use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::{debug, trace};

use super::{PdfKind, PdfReader, Result};
use crate::error::PdfError;

/// Text-layer length below which a document does not count as text-based.
const MIN_TEXT_LAYER_LEN: usize = 50;

/// A loaded price-list PDF.
pub struct PdfDocument {
    document: Document,
    raw: Vec<u8>,
}

impl PdfDocument {
    /// Open a PDF from memory. Encrypted files are tried against the empty
    /// password, which covers "protected" catalogue downloads.
    pub fn open(data: &[u8]) -> Result<Self> {
        let mut document =
            Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        let raw = if document.is_encrypted() {
            if document.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("decrypted PDF with empty password");
            // pdf-extract needs the decrypted bytes.
            let mut decrypted = Vec::new();
            document
                .save_to(&mut decrypted)
                .map_err(|e| PdfError::Parse(e.to_string()))?;
            decrypted
        } else {
            data.to_vec()
        };

        if document.get_pages().is_empty() {
            return Err(PdfError::NoPages);
        }

        debug!("loaded PDF with {} pages", document.get_pages().len());
        Ok(Self { document, raw })
    }

    fn has_images(&self) -> bool {
        self.document.objects.values().any(is_image_stream)
    }

    /// Every decodable image XObject in the document, in object order.
    fn all_images(&self) -> Vec<DynamicImage> {
        self.document
            .objects
            .values()
            .filter_map(|obj| decode_image(&self.document, obj))
            .collect()
    }

    /// Resolve a page's Resources dictionary, walking up the page tree for
    /// inherited entries.
    fn resources_for(&self, page_id: ObjectId) -> Option<Dictionary> {
        let mut node_id = page_id;
        loop {
            let dict = match self.document.get_object(node_id) {
                Ok(Object::Dictionary(dict)) => dict,
                _ => return None,
            };

            if let Ok(resources) = dict.get(b"Resources") {
                if let Ok((_, Object::Dictionary(resources))) =
                    self.document.dereference(resources)
                {
                    return Some(resources.clone());
                }
            }

            match dict.get(b"Parent") {
                Ok(Object::Reference(parent)) => node_id = *parent,
                _ => return None,
            }
        }
    }
}

impl PdfReader for PdfDocument {
    fn page_count(&self) -> u32 {
        self.document.get_pages().len() as u32
    }

    fn kind(&self) -> PdfKind {
        let has_text = self
            .text()
            .map(|t| t.trim().len() > MIN_TEXT_LAYER_LEN)
            .unwrap_or(false);
        let has_images = self.has_images();

        let kind = match (has_text, has_images) {
            (true, false) => PdfKind::Text,
            (false, true) => PdfKind::Scanned,
            (true, true) => PdfKind::Hybrid,
            (false, false) => PdfKind::Empty,
        };

        debug!(
            "PDF analysis: has_text={}, has_images={} -> {:?}",
            has_text, has_images, kind
        );
        kind
    }

    fn text(&self) -> Result<String> {
        pdf_extract::extract_text_from_mem(&self.raw)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))
    }

    fn page_text(&self, page: u32) -> Result<String> {
        if page == 0 || page > self.page_count() {
            return Err(PdfError::InvalidPage(page));
        }

        // The text layer comes out as one blob without page boundaries;
        // approximate per-page text by splitting the lines evenly.
        let full = self.text()?;
        let lines: Vec<&str> = full.lines().collect();
        let per_page = lines.len() / self.page_count() as usize;

        let start = (page as usize - 1) * per_page;
        let end = if page == self.page_count() {
            lines.len()
        } else {
            page as usize * per_page
        };

        Ok(lines[start.min(lines.len())..end.min(lines.len())].join("\n"))
    }

    fn page_images(&self, page: u32) -> Result<Vec<DynamicImage>> {
        let pages = self.document.get_pages();
        let page_id = *pages.get(&page).ok_or(PdfError::InvalidPage(page))?;

        let mut images = Vec::new();
        if let Some(resources) = self.resources_for(page_id) {
            if let Ok(xobjects) = resources.get(b"XObject") {
                if let Ok((_, Object::Dictionary(xobjects))) =
                    self.document.dereference(xobjects)
                {
                    for (_name, entry) in xobjects.iter() {
                        if let Ok((_, obj)) = self.document.dereference(entry) {
                            if let Some(image) = decode_image(&self.document, obj) {
                                images.push(image);
                            }
                        }
                    }
                }
            }
        }

        if images.is_empty() {
            // Scanned catalogues are typically one full-page image per page;
            // when the page tree does not reference its XObjects, fall back
            // to the document-wide image list in object order.
            if let Some(image) = self.all_images().into_iter().nth(page as usize - 1) {
                images.push(image);
            }
        }

        debug!("page {}: {} embedded image(s)", page, images.len());
        Ok(images)
    }
}

fn is_image_stream(obj: &Object) -> bool {
    match obj {
        Object::Stream(stream) => stream
            .dict
            .get(b"Subtype")
            .and_then(|s| s.as_name())
            .map(|name| name == b"Image")
            .unwrap_or(false),
        _ => false,
    }
}

fn filter_name<'a>(dict: &'a Dictionary) -> Option<&'a [u8]> {
    match dict.get(b"Filter").ok()? {
        Object::Name(name) => Some(name.as_slice()),
        Object::Array(arr) => arr.first().and_then(|o| o.as_name().ok()),
        _ => None,
    }
}

fn color_space<'a>(doc: &'a Document, dict: &'a Dictionary) -> &'a [u8] {
    dict.get(b"ColorSpace")
        .ok()
        .and_then(|obj| match obj {
            Object::Name(name) => Some(name.as_slice()),
            Object::Array(arr) => arr.first().and_then(|o| o.as_name().ok()),
            Object::Reference(id) => doc.get_object(*id).ok().and_then(|o| o.as_name().ok()),
            _ => None,
        })
        .unwrap_or(b"DeviceRGB")
}

/// Decode an image XObject into a [`DynamicImage`].
///
/// Supports DCTDecode (JPEG) streams and raw 8-bit RGB/grayscale samples;
/// anything else (JPEG2000, fax encodings) is skipped.
fn decode_image(doc: &Document, obj: &Object) -> Option<DynamicImage> {
    let Object::Stream(stream) = obj else {
        return None;
    };
    let dict = &stream.dict;
    if dict.get(b"Subtype").and_then(|s| s.as_name()).ok()? != b"Image" {
        return None;
    }

    let width = dict.get(b"Width").and_then(|w| w.as_i64()).ok()? as u32;
    let height = dict.get(b"Height").and_then(|h| h.as_i64()).ok()? as u32;
    trace!("image XObject: {}x{}", width, height);

    match filter_name(dict) {
        // DCTDecode streams are complete JPEG files.
        Some(name) if name == b"DCTDecode" => {
            return image::load_from_memory_with_format(
                &stream.content,
                image::ImageFormat::Jpeg,
            )
            .ok();
        }
        Some(name)
            if name == b"JPXDecode" || name == b"CCITTFaxDecode" || name == b"JBIG2Decode" =>
        {
            trace!("unsupported image filter {:?}", String::from_utf8_lossy(name));
            return None;
        }
        _ => {}
    }

    let bits = dict
        .get(b"BitsPerComponent")
        .and_then(|b| b.as_i64())
        .unwrap_or(8);
    if bits != 8 {
        trace!("unsupported bits per component: {}", bits);
        return None;
    }

    let data = stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone());
    let space = color_space(doc, dict);

    let rgb_len = (width * height * 3) as usize;
    let gray_len = (width * height) as usize;

    if (space == b"DeviceRGB" || space == b"RGB") && data.len() >= rgb_len {
        return RgbImage::from_raw(width, height, data[..rgb_len].to_vec())
            .map(DynamicImage::ImageRgb8);
    }
    if (space == b"DeviceGray" || space == b"G") && data.len() >= gray_len {
        return GrayImage::from_raw(width, height, data[..gray_len].to_vec())
            .map(DynamicImage::ImageLuma8);
    }

    trace!("undecodable raw image data ({} bytes)", data.len());
    None
}
