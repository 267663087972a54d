//! Generic sentence boundary detection.

use unicode_segmentation::UnicodeSegmentation;

/// A language-agnostic sentence boundary detector.
///
/// Implementations return the sentences of `text` in order, each a trimmed
/// slice of the input. The tokenizer runs the detector on rewritten text and
/// relies only on the lengths of the returned slices.
pub trait BoundaryDetector: Send + Sync {
    /// Get the name of this detector.
    fn name(&self) -> &'static str;

    /// Split text into sentence slices.
    fn split<'a>(&self, text: &'a str) -> Vec<&'a str>;
}

/// Detector based on the Unicode (UAX #29) sentence boundary rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeBoundaryDetector;

impl UnicodeBoundaryDetector {
    pub fn new() -> Self {
        Self
    }
}

impl BoundaryDetector for UnicodeBoundaryDetector {
    fn name(&self) -> &'static str {
        "uax29"
    }

    fn split<'a>(&self, text: &'a str) -> Vec<&'a str> {
        text.split_sentence_bounds()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }
}
