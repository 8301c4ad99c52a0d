//! POZ line-item extraction: the line classifier & extractor and its rules.

mod parser;
pub mod rules;

pub use parser::{LineExtractor, LineParser};
pub use rules::codes::CodeGrammar;
pub use rules::units::UnitVocabulary;
