//! Classification rules: code grammars, price normalization, unit vocabulary.

pub mod codes;
pub mod patterns;
pub mod prices;
pub mod units;

pub use codes::{CodeGrammar, match_code};
pub use prices::{normalize_decimal, strip_numeric, take_price};
pub use units::{UnitVocabulary, turkish_lowercase};
