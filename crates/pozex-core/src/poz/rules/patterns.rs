//! Regex tables for POZ line classification.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Two tiers of digit groups separated by periods: "15.010.1001".
    pub static ref STRICT_CODE: Regex = Regex::new(r"^\d{1,2}\.\d{3}\.\d{3,4}").unwrap();

    /// Agency letter prefix followed by a digit group: "ÇŞM.003". Turkish
    /// uppercase letters are part of the prefix alphabet.
    pub static ref PREFIX_CODE: Regex = Regex::new(r"^[A-ZÇŞİĞÜÖ]{2,5}\.\d{3}").unwrap();

    /// Any leading run of digits and separators, for mixed catalogues.
    pub static ref GENERIC_CODE: Regex = Regex::new(r"^\d+[\.\d/]+").unwrap();

    /// A stripped token shaped like period-separated thousands groups with
    /// no decimal part: "1.250.000".
    pub static ref THOUSANDS_ONLY: Regex = Regex::new(r"^\d{1,3}(\.\d{3})+$").unwrap();
}
