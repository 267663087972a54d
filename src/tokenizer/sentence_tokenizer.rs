//! Sentence tokenizer tuned for legal and business prose.

use std::borrow::Cow;
use std::sync::Arc;

use regex::Regex;
use tracing::warn;

use super::abbreviations::{AbbreviationRules, AbbreviationSet};
use super::detector::{BoundaryDetector, UnicodeBoundaryDetector};
use crate::error::Result;
use crate::types::TokenizerConfig;

lazy_static::lazy_static! {
    /// Whitespace before a `.` or `'` that does not start a number.
    static ref SPACE_BEFORE_PUNCT: Regex = Regex::new(r"\s([.'](?:\s|$|\D))").unwrap();
    /// A run of stray punctuation at the start of a line.
    static ref LEADING_PUNCT: Regex = Regex::new(r"^(?:[.,?!]\s+)+").unwrap();
    /// A bracketed span without a nested closing bracket.
    static ref BRACKETED: Regex = Regex::new(r"\(([^)]+)\)").unwrap();
}

const QUOTES: [char; 6] = ['"', '\'', '“', '”', '‘', '’'];

/// Splits text into sentences that are exact slices of the input lines.
///
/// Each line is rewritten to hide abbreviation periods, bracketed spans and
/// quotation noise from the boundary detector, then the detected spans are
/// mapped back onto the original line by character count.
#[derive(Clone)]
pub struct SentenceTokenizer {
    rules: Arc<AbbreviationRules>,
    detector: Arc<dyn BoundaryDetector>,
    max_line_chars: usize,
}

impl SentenceTokenizer {
    /// Create a tokenizer from precompiled rules and the Unicode detector.
    pub fn new(rules: Arc<AbbreviationRules>, config: &TokenizerConfig) -> Self {
        Self {
            rules,
            detector: Arc::new(UnicodeBoundaryDetector::new()),
            max_line_chars: config.max_line_chars,
        }
    }

    /// Build the English abbreviation rules and a tokenizer around them.
    pub fn from_config(config: &TokenizerConfig) -> Result<Self> {
        let set = AbbreviationSet::english().with_extra(&config.extra_abbreviations);
        let rules = AbbreviationRules::compile(&set)?;
        Ok(Self::new(Arc::new(rules), config))
    }

    /// Swap in a different boundary detector.
    pub fn with_detector(mut self, detector: Arc<dyn BoundaryDetector>) -> Self {
        self.detector = detector;
        self
    }

    /// Name of the underlying boundary detector.
    pub fn detector_name(&self) -> &'static str {
        self.detector.name()
    }

    /// Split text into sentences. Lines are never joined into one sentence.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let mut sentences = Vec::new();
        if text.is_empty() {
            return sentences;
        }

        for line in text.split('\n') {
            self.tokenize_line(line, &mut sentences);
        }

        // A lone initial such as "A." is glued onto the sentence after it.
        if sentences.len() >= 2 && is_single_char_sentence(&sentences[0]) {
            let first = sentences.remove(0);
            sentences[0] = format!("{} {}", first, sentences[0]);
        }

        sentences
    }

    fn tokenize_line(&self, line: &str, sentences: &mut Vec<String>) {
        let line = SPACE_BEFORE_PUNCT.replace_all(line, "$1");
        let (orig_offset, stripped) = match LEADING_PUNCT.find(&line) {
            Some(m) => (line[..m.end()].chars().count(), &line[m.end()..]),
            None => (0, &line[..]),
        };

        let protected = if stripped.chars().count() > self.max_line_chars {
            warn!(
                max_line_chars = self.max_line_chars,
                "Line exceeds length cap, skipping abbreviation protection"
            );
            Cow::Borrowed(stripped)
        } else {
            let bracketed = protect_brackets(stripped);
            Cow::Owned(self.rules.protect(&bracketed))
        };
        let modified = normalize_quotes(&protected);

        let candidates = self.detector.split(&modified);
        if candidates.is_empty() {
            return;
        }

        let modified_chars: Vec<char> = modified.chars().collect();
        let offsets = char_offsets(&line);
        let char_len = offsets.len() - 1;

        let mut cursor = 0;
        for candidate in candidates {
            while cursor < modified_chars.len() && modified_chars[cursor].is_whitespace() {
                cursor += 1;
            }
            if cursor >= modified_chars.len() {
                break;
            }

            let len = candidate.chars().count();
            let start = (orig_offset + cursor).min(char_len);
            let end = (start + len).min(char_len);
            sentences.push(line[offsets[start]..offsets[end]].to_string());
            cursor += len;
        }
    }
}

impl std::fmt::Debug for SentenceTokenizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentenceTokenizer")
            .field("detector", &self.detector.name())
            .field("max_line_chars", &self.max_line_chars)
            .finish()
    }
}

/// Hide periods inside `(...)` and swap the brackets for `_` sentinels.
fn protect_brackets(text: &str) -> Cow<'_, str> {
    BRACKETED.replace_all(text, |caps: &regex::Captures| {
        format!("_{}_", caps[1].replace('.', "_"))
    })
}

/// Map every straight or curly quote to `"`.
fn normalize_quotes(text: &str) -> String {
    text.chars()
        .map(|c| if QUOTES.contains(&c) { '"' } else { c })
        .collect()
}

/// Byte offset of every char in `text`, plus the total length.
fn char_offsets(text: &str) -> Vec<usize> {
    text.char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect()
}

fn is_single_char_sentence(sentence: &str) -> bool {
    let mut chars = sentence.chars();
    matches!((chars.next(), chars.next(), chars.next()), (Some(_), Some('.'), None))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tokenizer() -> SentenceTokenizer {
        SentenceTokenizer::from_config(&TokenizerConfig::default()).unwrap()
    }

    #[test]
    fn test_plain_text_reconstructs() {
        let text = "The lease begins today. Rent is due monthly. Payments go to the landlord.";
        let sentences = tokenizer().tokenize(text);
        assert_eq!(sentences.len(), 3);
        assert_eq!(sentences.join(" "), text);
    }

    #[test]
    fn test_abbreviations_do_not_split() {
        assert_eq!(
            tokenizer().tokenize("I live at 123 Main St. Apt. 4B."),
            vec!["I live at 123 Main St. Apt. 4B."]
        );
    }

    #[test]
    fn test_brackets_do_not_split() {
        assert_eq!(
            tokenizer().tokenize("See the report (filed Jan. 5, 2020). It was late."),
            vec!["See the report (filed Jan. 5, 2020).", "It was late."]
        );
    }

    #[test]
    fn test_quotes_keep_sentence_count() {
        let sentences = tokenizer().tokenize(r#"He said "hello." Then left."#);
        assert_eq!(sentences, vec![r#"He said "hello.""#, "Then left."]);

        let curly = tokenizer().tokenize("He said “hello.” Then left.");
        assert_eq!(curly, vec!["He said “hello.”", "Then left."]);
    }

    #[test]
    fn test_never_splits_across_newlines() {
        assert_eq!(
            tokenizer().tokenize("First line without stop\nSecond line."),
            vec!["First line without stop", "Second line."]
        );
    }

    #[test]
    fn test_empty_and_blank_input() {
        assert!(tokenizer().tokenize("").is_empty());
        assert!(tokenizer().tokenize("   \n\t").is_empty());
    }

    #[test]
    fn test_leading_punctuation_offset() {
        assert_eq!(
            tokenizer().tokenize(". , Payment is due. Late fees apply."),
            vec!["Payment is due.", "Late fees apply."]
        );
    }

    #[test]
    fn test_space_before_period_is_collapsed() {
        assert_eq!(
            tokenizer().tokenize("The term ends . A new term begins."),
            vec!["The term ends.", "A new term begins."]
        );
    }

    #[test]
    fn test_single_char_first_sentence_is_merged() {
        assert_eq!(
            tokenizer().tokenize("A.\nThe parties agree."),
            vec!["A. The parties agree."]
        );
    }

    #[test]
    fn test_strong_abbreviation() {
        assert_eq!(
            tokenizer().tokenize("Signed by Acme Inc. on behalf of the buyer."),
            vec!["Signed by Acme Inc. on behalf of the buyer."]
        );
    }

    #[test]
    fn test_length_cap_skips_protection() {
        let config = TokenizerConfig {
            max_line_chars: 10,
            ..TokenizerConfig::default()
        };
        let tokenizer = SentenceTokenizer::from_config(&config).unwrap();
        assert_eq!(
            tokenizer.tokenize("Mr. Smith went home."),
            vec!["Mr.", "Smith went home."]
        );
    }

    #[test]
    fn test_custom_detector() {
        struct WholeLine;
        impl BoundaryDetector for WholeLine {
            fn name(&self) -> &'static str {
                "whole-line"
            }
            fn split<'a>(&self, text: &'a str) -> Vec<&'a str> {
                vec![text.trim()]
            }
        }

        let tokenizer = tokenizer().with_detector(Arc::new(WholeLine));
        assert_eq!(tokenizer.detector_name(), "whole-line");
        assert_eq!(tokenizer.tokenize("One. Two."), vec!["One. Two."]);
    }
}
