//! Unit-of-measure vocabulary with Turkish-aware token folding.

/// Lowercase a string using Turkish casing for the dotted/dotless i pair.
/// The std lowercasing maps `I` to `i`, which breaks lookups for tokens
/// like `TAKIM` (takım).
pub fn turkish_lowercase(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            'I' => out.push('ı'),
            'İ' => out.push('i'),
            _ => out.extend(c.to_lowercase()),
        }
    }
    out
}

/// Fold a token to its canonical lookup form: Turkish lowercase with
/// superscript area/volume marks mapped to plain digits (m² -> m2).
fn fold(token: &str) -> String {
    let lowered = turkish_lowercase(token);
    lowered
        .chars()
        .map(|c| match c {
            '²' => '2',
            '³' => '3',
            _ => c,
        })
        .collect()
}

/// Closed unit-of-measure vocabulary.
///
/// Units are matched by membership, never inferred from context; anything
/// outside the vocabulary falls through to the default unit.
#[derive(Debug, Clone)]
pub struct UnitVocabulary {
    tokens: Vec<String>,
    default_unit: String,
}

impl UnitVocabulary {
    /// Build a vocabulary from canonical unit spellings. Entries are folded,
    /// so the list may be given in any case.
    pub fn new(units: &[String], default_unit: impl Into<String>) -> Self {
        Self {
            tokens: units.iter().map(|u| fold(u)).collect(),
            default_unit: default_unit.into(),
        }
    }

    /// The vocabulary observed across Turkish ministry price lists.
    pub fn turkish() -> Self {
        let units: Vec<String> = [
            "m", "m2", "m3", "kg", "ton", "adet", "lt", "ad", "mt", "set", "takım",
        ]
        .map(String::from)
        .to_vec();
        Self::new(&units, "Adet")
    }

    /// Unit recorded when no vocabulary token is present.
    pub fn default_unit(&self) -> &str {
        &self.default_unit
    }

    /// Case-insensitive membership test.
    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == &fold(token))
    }

    /// Reverse-scan `tokens` for the rightmost vocabulary token, removing
    /// and returning it in its original spelling. Only one unit token is
    /// ever taken from a line.
    pub fn take_unit(&self, tokens: &mut Vec<String>) -> Option<String> {
        for idx in (0..tokens.len()).rev() {
            if self.contains(&tokens[idx]) {
                return Some(tokens.remove(idx));
            }
        }
        None
    }
}

impl Default for UnitVocabulary {
    fn default() -> Self {
        Self::turkish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn toks(s: &str) -> Vec<String> {
        s.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn test_turkish_lowercase_i_pair() {
        assert_eq!(turkish_lowercase("TAKIM"), "takım");
        assert_eq!(turkish_lowercase("BİRİM"), "birim");
        assert_eq!(turkish_lowercase("Adet"), "adet");
    }

    #[test]
    fn test_membership_is_case_insensitive() {
        let vocab = UnitVocabulary::turkish();
        assert!(vocab.contains("M2"));
        assert!(vocab.contains("Adet"));
        assert!(vocab.contains("TAKIM"));
        assert!(!vocab.contains("saat"));
    }

    #[test]
    fn test_superscript_forms_fold_to_digits() {
        let vocab = UnitVocabulary::turkish();
        assert!(vocab.contains("m²"));
        assert!(vocab.contains("M³"));
    }

    #[test]
    fn test_take_unit_keeps_original_spelling() {
        let vocab = UnitVocabulary::turkish();
        let mut tokens = toks("Beton dökümü M3");
        assert_eq!(vocab.take_unit(&mut tokens), Some("M3".to_string()));
        assert_eq!(tokens, toks("Beton dökümü"));
    }

    #[test]
    fn test_take_unit_prefers_rightmost() {
        let vocab = UnitVocabulary::turkish();
        let mut tokens = toks("Sac m profil kg");
        assert_eq!(vocab.take_unit(&mut tokens), Some("kg".to_string()));
        assert_eq!(tokens, toks("Sac m profil"));
    }

    #[test]
    fn test_no_vocabulary_token_returns_none() {
        let vocab = UnitVocabulary::turkish();
        let mut tokens = toks("Genel giderler");
        assert_eq!(vocab.take_unit(&mut tokens), None);
        assert_eq!(tokens.len(), 2);
    }
}
