//! Ingestor Library
//!
//! Sentence segmentation and header re-linking for parsed document blocks.
//! Splits prose into sentences without breaking on abbreviations, brackets or
//! quotes, and flattens a block sequence into sentence-level units that each
//! remember their enclosing headers.

pub mod api;
pub mod error;
pub mod flatten;
pub mod tokenizer;
pub mod types;
pub mod utils;

pub use error::{Error, Result};
pub use flatten::{extract_block_texts, flatten, populate_sentences, Flattened};
pub use tokenizer::{BoundaryDetector, SentenceTokenizer};
pub use types::{Block, BlockContext, BlockType, IngestorConfig, TableBoundary};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::flatten::*;
    pub use crate::tokenizer::*;
    pub use crate::types::*;
}

/// Default port of the HTTP service
pub const DEFAULT_PORT: u16 = 5001;

/// Lines longer than this many chars skip abbreviation and bracket protection
pub const DEFAULT_MAX_LINE_CHARS: usize = 100_000;
