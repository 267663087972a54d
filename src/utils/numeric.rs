//! Numeric text checks.

use regex::Regex;

lazy_static::lazy_static! {
    static ref ARABIC_NUMBER: Regex = Regex::new(r"^\d+(?:\.\d+)?$").unwrap();
    static ref INTEGER: Regex = Regex::new(r"^\d+$").unwrap();
}

/// Whether the whole text is an arabic number such as `12` or `3.75`.
pub fn is_arabic_number(text: &str) -> bool {
    ARABIC_NUMBER.is_match(text)
}

/// Whether the text is made of digits only. Missing text is not an integer.
pub fn is_integer(text: Option<&str>) -> bool {
    INTEGER.is_match(text.unwrap_or_default())
}
