//! POZ code grammar matching.

use serde::{Deserialize, Serialize};

use super::patterns::{GENERIC_CODE, PREFIX_CODE, STRICT_CODE};

/// Which code grammar a catalogue uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodeGrammar {
    /// Only the two-tier numeric form, e.g. `15.010.1001`. Used by the
    /// ministry construction/mechanical/electrical price lists.
    Strict,

    /// The numeric form plus agency letter prefixes (`ÇŞM.003`) and generic
    /// digit runs (`1234/5`), for mixed catalogues.
    #[default]
    Mixed,
}

/// Match a POZ code at the start of `line`, returning the code slice.
///
/// Codes only ever appear as the leading token; mid-line matches are not
/// attempted.
pub fn match_code(line: &str, grammar: CodeGrammar) -> Option<&str> {
    if let Some(m) = STRICT_CODE.find(line) {
        return Some(m.as_str());
    }

    if grammar == CodeGrammar::Mixed {
        if let Some(m) = PREFIX_CODE.find(line) {
            return Some(m.as_str());
        }
        if let Some(m) = GENERIC_CODE.find(line) {
            return Some(m.as_str());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_strict_code_at_line_start() {
        assert_eq!(
            match_code("15.010.1001 Beton dökümü", CodeGrammar::Strict),
            Some("15.010.1001")
        );
        assert_eq!(
            match_code("7.045.102 Kazı işleri", CodeGrammar::Strict),
            Some("7.045.102")
        );
    }

    #[test]
    fn test_prefix_code_requires_mixed_grammar() {
        assert_eq!(
            match_code("ÇŞM.003 Asfalt kaplama", CodeGrammar::Mixed),
            Some("ÇŞM.003")
        );
        assert_eq!(match_code("ÇŞM.003 Asfalt kaplama", CodeGrammar::Strict), None);
    }

    #[test]
    fn test_generic_digit_run() {
        assert_eq!(
            match_code("1234/5 Elektrik tesisatı", CodeGrammar::Mixed),
            Some("1234/5")
        );
        assert_eq!(match_code("1234/5 Elektrik tesisatı", CodeGrammar::Strict), None);
    }

    #[test]
    fn test_mid_line_code_is_not_a_match() {
        assert_eq!(match_code("bkz. 15.010.1001", CodeGrammar::Mixed), None);
    }

    #[test]
    fn test_plain_text_line_does_not_match() {
        assert_eq!(match_code("Genel açıklamalar", CodeGrammar::Mixed), None);
    }
}
