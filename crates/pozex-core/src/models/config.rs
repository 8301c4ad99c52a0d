//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::poz::rules::codes::CodeGrammar;

/// Main configuration for the pozex pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PozexConfig {
    /// Line classification and extraction configuration.
    pub extraction: ExtractionConfig,

    /// PDF processing configuration.
    pub pdf: PdfConfig,

    /// OCR engine configuration.
    pub ocr: OcrConfig,
}

/// Line classifier & extractor configuration.
///
/// The locale-specific vocabularies live here rather than in the matching
/// code, so another catalogue language can be supported by substituting
/// configuration instead of changing the rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Which POZ code grammar to match at line start.
    pub grammar: CodeGrammar,

    /// Lines with fewer characters than this are never data rows.
    pub min_line_len: usize,

    /// Minimum token count after the code: description word(s), unit, price.
    pub min_tokens: usize,

    /// Table-header vocabulary; a line containing any of these substrings
    /// (case-sensitive) is skipped as a header/footer artifact.
    pub header_words: Vec<String>,

    /// Closed unit-of-measure vocabulary, matched case-insensitively.
    pub units: Vec<String>,

    /// Unit recorded when no vocabulary token is present on the line.
    pub default_unit: String,

    /// Reject lines whose price resolves to zero instead of keeping the
    /// zero "unknown price" sentinel.
    pub require_positive_price: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            grammar: CodeGrammar::default(),
            min_line_len: 5,
            min_tokens: 3,
            header_words: ["Poz", "Tanım", "Birim", "Fiyat"]
                .map(String::from)
                .to_vec(),
            units: [
                "m", "m2", "m3", "kg", "ton", "adet", "lt", "ad", "mt", "set", "takım",
            ]
            .map(String::from)
            .to_vec(),
            default_unit: "Adet".to_string(),
            require_positive_price: false,
        }
    }
}

/// PDF processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Maximum pages to process (0 = unlimited).
    pub max_pages: usize,

    /// Use the embedded text layer when one is present.
    pub prefer_embedded_text: bool,

    /// Minimum text length for a PDF to count as text-based.
    pub min_text_length: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            max_pages: 0,
            prefer_embedded_text: true,
            min_text_length: 50,
        }
    }
}

/// OCR engine configuration.
///
/// The dictionary file selects the recognized script, which is how the
/// engine is pointed at a language; Turkish catalogues use the latin set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Directory containing model files.
    pub model_dir: PathBuf,

    /// Text detection model file name.
    pub detection_model: String,

    /// Text recognition model file name.
    pub recognition_model: String,

    /// Character dictionary file name.
    pub dictionary: String,

    /// Vertical distance (pixels) within which detected regions are merged
    /// into one text line.
    pub row_merge_threshold: f32,

    /// Keep `[UNK]` placeholder tokens in recognized text.
    pub keep_unk: bool,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            detection_model: "det.onnx".to_string(),
            recognition_model: "latin_rec.onnx".to_string(),
            dictionary: "latin_dict.txt".to_string(),
            row_merge_threshold: 15.0,
            keep_unk: false,
        }
    }
}

impl PozexConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_vocabulary_is_turkish() {
        let config = ExtractionConfig::default();
        assert_eq!(config.default_unit, "Adet");
        assert!(config.units.iter().any(|u| u == "takım"));
        assert!(config.header_words.iter().any(|w| w == "Tanım"));
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let config = PozexConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: PozexConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.extraction.min_line_len, config.extraction.min_line_len);
        assert_eq!(parsed.ocr.dictionary, config.ocr.dictionary);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let parsed: PozexConfig =
            serde_json::from_str(r#"{"extraction":{"min_tokens":2}}"#).unwrap();
        assert_eq!(parsed.extraction.min_tokens, 2);
        assert_eq!(parsed.extraction.min_line_len, 5);
        assert_eq!(parsed.pdf.min_text_length, 50);
    }
}
