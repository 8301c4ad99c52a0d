//! The POZ line classifier & extractor.
//!
//! Each physical line is an independent parse unit: code at the start,
//! price found by rightmost reverse scan, then unit by reverse scan over
//! what remains, and whatever is left becomes the description. Descriptions
//! wrapping onto a following line are NOT merged with it; the continuation
//! line has no leading code and is dropped. This mirrors the source
//! catalogues' row-per-line layout and is a documented limitation.

use rust_decimal::Decimal;
use tracing::trace;

use crate::models::config::ExtractionConfig;
use crate::models::item::LineItem;

use super::rules::codes::{CodeGrammar, match_code};
use super::rules::prices::take_price;
use super::rules::units::UnitVocabulary;

/// Line-by-line parser turning raw page text into [`LineItem`]s.
pub trait LineParser {
    /// Parse a single physical line; `None` when the line is not a data row.
    ///
    /// Never fails: OCR noise is expected and most lines on a price-list
    /// page are not data rows.
    fn parse_line(&self, line: &str) -> Option<LineItem>;

    /// Extract every data row from a text blob, splitting on line breaks.
    fn extract_text(&self, text: &str) -> Vec<LineItem> {
        text.lines().filter_map(|line| self.parse_line(line)).collect()
    }
}

/// The extraction engine. Pure and stateless between lines, so it is safe
/// to share across threads and invoke concurrently on independent batches.
///
/// Policy (fixed across all input sources rather than varying per
/// catalogue): the price is extracted first, by rightmost reverse scan,
/// then the unit by rightmost reverse scan over the remainder; a price
/// that resolves to exactly zero is kept as the "unknown" sentinel unless
/// [`require_positive_price`](ExtractionConfig::require_positive_price)
/// asks for the stricter rejection.
#[derive(Debug, Clone)]
pub struct LineExtractor {
    grammar: CodeGrammar,
    units: UnitVocabulary,
    header_words: Vec<String>,
    min_line_len: usize,
    min_tokens: usize,
    require_positive_price: bool,
}

impl LineExtractor {
    /// Create an extractor with the default Turkish configuration.
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    /// Create an extractor from explicit configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            grammar: config.grammar,
            units: UnitVocabulary::new(&config.units, config.default_unit.clone()),
            header_words: config.header_words.clone(),
            min_line_len: config.min_line_len,
            min_tokens: config.min_tokens,
            require_positive_price: config.require_positive_price,
        }
    }

    /// Set the code grammar.
    pub fn with_grammar(mut self, grammar: CodeGrammar) -> Self {
        self.grammar = grammar;
        self
    }

    /// Replace the unit vocabulary.
    pub fn with_vocabulary(mut self, units: UnitVocabulary) -> Self {
        self.units = units;
        self
    }

    /// Reject zero-price lines instead of keeping the zero sentinel.
    pub fn with_positive_price_required(mut self, required: bool) -> Self {
        self.require_positive_price = required;
        self
    }

    /// Extract items from an ordered sequence of lines, preserving order.
    pub fn extract<'a, I>(&self, lines: I) -> Vec<LineItem>
    where
        I: IntoIterator<Item = &'a str>,
    {
        lines
            .into_iter()
            .filter_map(|line| self.parse_line(line))
            .collect()
    }

    fn is_header(&self, line: &str) -> bool {
        self.header_words.iter().any(|word| line.contains(word.as_str()))
    }
}

impl Default for LineExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl LineParser for LineExtractor {
    fn parse_line(&self, line: &str) -> Option<LineItem> {
        let line = line.trim();

        // Too short to hold a code, unit and price, or a table-header
        // artifact that would otherwise parse into a garbage row.
        if line.chars().count() < self.min_line_len || self.is_header(line) {
            return None;
        }

        let code = match_code(line, self.grammar)?;
        let rest = line[code.len()..].trim();

        let mut tokens: Vec<String> = rest.split_whitespace().map(String::from).collect();
        if tokens.len() < self.min_tokens {
            trace!("dropping incomplete row: {}", line);
            return None;
        }

        let unit_price = match take_price(&mut tokens, self.require_positive_price) {
            Some(price) => price,
            None if self.require_positive_price => return None,
            // Price unreadable: keep the row with the unknown sentinel.
            None => Decimal::ZERO,
        };

        let unit = self
            .units
            .take_unit(&mut tokens)
            .unwrap_or_else(|| self.units.default_unit().to_string());

        let description = tokens.join(" ");
        if description.is_empty() {
            return None;
        }

        Some(LineItem {
            code: code.to_string(),
            description,
            unit,
            unit_price,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_full_row_with_turkish_price_format() {
        let extractor = LineExtractor::new();
        let item = extractor
            .parse_line("15.010.1001  Beton C25 dökümü, pompalı  m3  1.250,75")
            .unwrap();

        assert_eq!(item.code, "15.010.1001");
        assert_eq!(item.description, "Beton C25 dökümü, pompalı");
        assert_eq!(item.unit, "m3");
        assert_eq!(item.unit_price, dec("1250.75"));
    }

    #[test]
    fn test_agency_prefix_row() {
        let extractor = LineExtractor::new();
        let item = extractor.parse_line("ÇŞM.003 Asfalt kaplama m2 85,00").unwrap();

        assert_eq!(item.code, "ÇŞM.003");
        assert_eq!(item.description, "Asfalt kaplama");
        assert_eq!(item.unit, "m2");
        assert_eq!(item.unit_price, dec("85.00"));
    }

    #[test]
    fn test_header_line_yields_nothing() {
        let extractor = LineExtractor::new();
        assert_eq!(extractor.parse_line("Poz No Tanım Birim Fiyat"), None);
    }

    #[test]
    fn test_header_word_rejects_even_with_leading_code() {
        let extractor = LineExtractor::new();
        assert_eq!(extractor.parse_line("15.010.1001 Birim fiyat listesi 85,00"), None);
    }

    #[test]
    fn test_short_line_yields_nothing() {
        let extractor = LineExtractor::new();
        assert_eq!(extractor.parse_line("15.0"), None);
        assert_eq!(extractor.parse_line("   "), None);
    }

    #[test]
    fn test_rightmost_numeric_token_wins() {
        let extractor = LineExtractor::new();
        let item = extractor
            .parse_line("15.010.1001 Beton dökümü m3 150 2,50")
            .unwrap();

        // The spurious earlier 150 stays in the description; the rightmost
        // candidate is the price.
        assert_eq!(item.unit_price, dec("2.50"));
        assert_eq!(item.unit, "m3");
        assert_eq!(item.description, "Beton dökümü 150");
    }

    #[test]
    fn test_missing_unit_falls_back_to_default() {
        let extractor = LineExtractor::new();
        let item = extractor
            .parse_line("15.010.1001 Çelik konstrüksiyon işleri 1.500,00")
            .unwrap();

        assert_eq!(item.unit, "Adet");
        assert_eq!(item.description, "Çelik konstrüksiyon işleri");
        assert_eq!(item.unit_price, dec("1500.00"));
    }

    #[test]
    fn test_missing_price_keeps_zero_sentinel() {
        let extractor = LineExtractor::new();
        let item = extractor
            .parse_line("15.010.1001 Montaj işçiliği bedeli adet")
            .unwrap();

        assert_eq!(item.unit_price, Decimal::ZERO);
        assert!(item.price_unknown());
        assert_eq!(item.unit, "adet");
    }

    #[test]
    fn test_strict_price_policy_drops_priceless_rows() {
        let extractor = LineExtractor::new().with_positive_price_required(true);
        assert_eq!(
            extractor.parse_line("15.010.1001 Montaj işçiliği bedeli adet"),
            None
        );
        assert_eq!(
            extractor.parse_line("15.010.1001 Montaj işçiliği adet 0,00"),
            None
        );
    }

    #[test]
    fn test_too_few_tokens_after_code() {
        let extractor = LineExtractor::new();
        assert_eq!(extractor.parse_line("15.010.1001 Beton 150"), None);
    }

    #[test]
    fn test_strict_grammar_ignores_prefix_codes() {
        let extractor = LineExtractor::new().with_grammar(CodeGrammar::Strict);
        assert_eq!(extractor.parse_line("ÇŞM.003 Asfalt kaplama m2 85,00"), None);
    }

    #[test]
    fn test_custom_vocabulary_substitutes_locale() {
        let units: Vec<String> = ["pcs", "hr", "ea"].map(String::from).to_vec();
        let extractor =
            LineExtractor::new().with_vocabulary(UnitVocabulary::new(&units, "pcs"));

        let item = extractor
            .parse_line("15.010.1001 Steel beam erection hr 12,50")
            .unwrap();
        assert_eq!(item.unit, "hr");
        assert_eq!(item.description, "Steel beam erection");

        // The Turkish tokens are no longer units under the swapped table.
        let item = extractor
            .parse_line("15.010.1001 Kablo döşenmesi mt 8,25")
            .unwrap();
        assert_eq!(item.unit, "pcs");
        assert_eq!(item.description, "Kablo döşenmesi mt");
    }

    #[test]
    fn test_extract_preserves_line_order_and_skips_noise() {
        let extractor = LineExtractor::new();
        let page = [
            "Poz No Tanım Birim Fiyat",
            "15.010.1001 Beton C25 dökümü m3 1.250,75",
            "açıklama satırı devamı",
            "ÇŞM.003 Asfalt kaplama m2 85,00",
            "x",
        ];

        let items = extractor.extract(page);
        let codes: Vec<&str> = items.iter().map(|i| i.code.as_str()).collect();
        assert_eq!(codes, vec!["15.010.1001", "ÇŞM.003"]);
    }

    #[test]
    fn test_extract_text_splits_on_line_breaks() {
        let extractor = LineExtractor::new();
        let blob = "15.010.1001 Beton C25 dökümü m3 1.250,75\nÇŞM.003 Asfalt kaplama m2 85,00\n";

        let items = extractor.extract_text(blob);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].unit_price, dec("1250.75"));
        assert_eq!(items[1].unit_price, dec("85.00"));
    }

    #[test]
    fn test_wrapped_description_lines_are_not_merged() {
        let extractor = LineExtractor::new();
        // Continuation line without a leading code is an independent parse
        // unit and is dropped, not appended to the previous item.
        let items = extractor.extract([
            "15.010.1001 Beton C25 dökümü m3 1.250,75",
            "pompalı olarak yerine dökülmesi",
        ]);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].description, "Beton C25 dökümü");
    }
}
