//! Hierarchical block flattening.
//!
//! Turns the parser's block sequence into the parallel `block_texts` /
//! `block_info` lists consumed by search and question answering, stamping
//! every block with its header context on the way.

mod flattener;
mod header_stack;

pub use flattener::{extract_block_texts, flatten, Flattened};
pub use header_stack::HeaderStack;

use tracing::debug;

use crate::tokenizer::SentenceTokenizer;
use crate::types::Block;

/// Fill in `block_sents` for paragraph-like blocks that arrive without them.
///
/// The paragraph half of a merged table cell is filled in the same way.
/// Returns the number of blocks that were tokenized.
pub fn populate_sentences(tokenizer: &SentenceTokenizer, blocks: &mut [Block]) -> usize {
    let mut filled = 0;

    for block in blocks.iter_mut() {
        if block.block_type.is_para_like() && block.block_sents.is_empty() {
            block.block_sents = tokenizer.tokenize(&block.block_text);
            filled += 1;
        }

        if let Some(cell) = block.merged_cell.as_mut() {
            if cell.para.block_sents.is_empty() {
                cell.para.block_sents = tokenizer.tokenize(&cell.para.block_text);
                filled += 1;
            }
        }
    }

    if filled > 0 {
        debug!(filled, "Tokenized blocks without sentences");
    }

    filled
}
