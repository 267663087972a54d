//! Sentence tokenization.

mod abbreviations;
mod detector;
mod sentence_tokenizer;

pub use abbreviations::{
    AbbreviationRules, AbbreviationSet, BASE_ABBREVIATIONS, DOMAIN_ABBREVIATIONS,
    STRONG_ABBREVIATIONS,
};
pub use detector::{BoundaryDetector, UnicodeBoundaryDetector};
pub use sentence_tokenizer::SentenceTokenizer;
