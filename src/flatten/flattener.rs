//! Single-pass conversion of a block sequence into sentence-level units.
//!
//! Every block is stamped with its header context (nearest header, level
//! chain, match index) and the text units it contributes are emitted in
//! order: headers and table rows as one unit, paragraph-like blocks as one
//! unit per sentence, merged table cells as a synthetic header followed by
//! its paragraph's sentences.

use std::sync::Arc;

use tracing::debug;

use super::header_stack::HeaderStack;
use crate::types::{Block, BlockContext, BlockType, LevelLink};

/// Output of [`flatten`]: index-aligned texts and owning blocks.
#[derive(Debug, Clone, Default)]
pub struct Flattened {
    /// Every input block after enrichment, in source order
    pub blocks: Vec<Arc<Block>>,
    /// Emitted text units
    pub block_texts: Vec<String>,
    /// Owning block of each text unit
    pub block_info: Vec<Arc<Block>>,
}

impl Flattened {
    pub fn len(&self) -> usize {
        self.block_texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.block_texts.is_empty()
    }
}

/// How a block contributes to the flattened stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Emission {
    Nothing,
    WholeText,
    Sentences,
    TableRow,
    MergedCell,
}

/// The most recently opened header.
#[derive(Debug, Clone)]
struct CurrentHeader {
    text: String,
    block_idx: i64,
    match_idx: i64,
}

impl Default for CurrentHeader {
    fn default() -> Self {
        Self {
            text: String::new(),
            block_idx: -1,
            match_idx: -1,
        }
    }
}

struct Flattener {
    flatten_merged_table: bool,
    levels: HeaderStack,
    header: CurrentHeader,
    /// Match index of the last emitted unit
    match_offset: i64,
    in_table: bool,
    merged_cells: bool,
    table_idx: usize,
    out: Flattened,
}

impl Flattener {
    fn new(flatten_merged_table: bool) -> Self {
        Self {
            flatten_merged_table,
            levels: HeaderStack::new(),
            header: CurrentHeader::default(),
            match_offset: -1,
            in_table: false,
            merged_cells: false,
            table_idx: 0,
            out: Flattened::default(),
        }
    }

    fn visit(&mut self, block_idx: usize, mut block: Block) {
        block.block_idx = block_idx;

        // Headers inside a table, or opening one, are table content.
        let opens_section = block.is_header() && !self.in_table && !block.opens_table();
        if opens_section {
            self.header = CurrentHeader {
                text: block.block_text.clone(),
                block_idx: block_idx as i64,
                match_idx: self.match_offset + 1,
            };
            self.levels
                .push(block_idx, &block.block_text, block.header_level());
        }

        let mut level_chain = self.levels.chain();
        if opens_section {
            level_chain.remove(0);
        }
        block.context = Some(BlockContext {
            header_text: self.header.text.clone(),
            header_block_idx: self.header.block_idx,
            header_match_idx: self.header.match_idx,
            level_chain,
            table_idx: None,
        });

        let emission = self.plan(&block);
        let was_in_table = self.in_table;

        let block = match emission {
            Emission::Nothing => Arc::new(block),
            Emission::WholeText => {
                let block = Arc::new(block);
                self.emit(block.block_text.clone(), &block);
                block
            }
            Emission::Sentences => {
                let block = Arc::new(block);
                for sentence in &block.block_sents {
                    self.emit(sentence.clone(), &block);
                }
                block
            }
            Emission::TableRow => {
                block.context_mut().table_idx = Some(self.table_idx);
                let block = Arc::new(block);
                self.emit(block.block_text.clone(), &block);
                block
            }
            Emission::MergedCell => self.emit_merged_cell(block),
        };

        if block.closes_table() && was_in_table {
            debug!(table_idx = self.table_idx, block_idx, "Table closed");
            self.in_table = false;
            self.merged_cells = false;
            self.table_idx += 1;
        }

        self.out.blocks.push(block);
    }

    /// Decide how a block is emitted, opening table mode on a start marker.
    fn plan(&mut self, block: &Block) -> Emission {
        let mut emission = Emission::Nothing;

        if let Some(boundary) = block.table_boundary.filter(|b| b.opens_table()) {
            if !self.in_table {
                debug!(table_idx = self.table_idx, block_idx = block.block_idx, "Table opened");
                self.in_table = true;
                self.merged_cells = boundary.has_merged_cells();
            }
        } else if !self.in_table {
            emission = match block.block_type {
                BlockType::Header | BlockType::TableRow => Emission::WholeText,
                BlockType::Para | BlockType::ListItem | BlockType::NumberedListItem => {
                    Emission::Sentences
                }
                BlockType::Other => Emission::Nothing,
            };
        }

        if self.in_table {
            emission = if self.merged_cells
                && self.flatten_merged_table
                && block.merged_cell.is_some()
            {
                Emission::MergedCell
            } else {
                Emission::TableRow
            };
        }

        emission
    }

    /// Stamp and emit a merged cell's synthetic header and paragraph.
    fn emit_merged_cell(&mut self, mut block: Block) -> Arc<Block> {
        let block_idx = block.block_idx;
        let parent = block.context();
        // Table rows carry no level of their own; they sit under the
        // innermost open header.
        let table_level = block
            .level
            .or_else(|| self.levels.innermost_level())
            .unwrap_or(0);
        let match_idx = self.match_offset + 1;

        let Some(cell) = block.merged_cell.as_mut() else {
            return Arc::new(block);
        };

        cell.header.level = Some(table_level + 1);
        cell.header.context = Some(BlockContext {
            header_text: parent.header_text.clone(),
            header_block_idx: block_idx as i64,
            header_match_idx: match_idx,
            level_chain: parent.level_chain.clone(),
            table_idx: None,
        });

        let mut para_chain = Vec::with_capacity(parent.level_chain.len() + 1);
        para_chain.push(LevelLink {
            block_idx: cell.header.block_idx,
            block_text: cell.header.block_text.clone(),
        });
        para_chain.extend(parent.level_chain.iter().cloned());

        cell.para.level = Some(table_level + 2);
        cell.para.context = Some(BlockContext {
            header_text: cell.header.block_text.clone(),
            header_block_idx: block_idx as i64,
            header_match_idx: match_idx,
            level_chain: para_chain,
            table_idx: None,
        });

        let header = Arc::new(cell.header.as_ref().clone());
        let para = Arc::new(cell.para.as_ref().clone());

        self.emit(header.block_text.clone(), &header);
        for sentence in &para.block_sents {
            self.emit(sentence.clone(), &para);
        }

        Arc::new(block)
    }

    fn emit(&mut self, text: String, block: &Arc<Block>) {
        self.out.block_texts.push(text);
        self.out.block_info.push(Arc::clone(block));
        self.match_offset += 1;
    }
}

/// Flatten a block sequence into sentence-level text units.
///
/// Takes ownership of the blocks for the duration of the pass and returns
/// them enriched. `block_idx` is reassigned to the position in `blocks`.
/// With `flatten_merged_table`, rows of a table marked as having merged
/// cells are emitted as their synthetic header and paragraph.
pub fn flatten(blocks: Vec<Block>, flatten_merged_table: bool) -> Flattened {
    let mut flattener = Flattener::new(flatten_merged_table);
    for (block_idx, block) in blocks.into_iter().enumerate() {
        flattener.visit(block_idx, block);
    }

    debug!(
        blocks = flattener.out.blocks.len(),
        units = flattener.out.block_texts.len(),
        tables = flattener.table_idx,
        "Flattened blocks"
    );

    flattener.out
}

/// One unit per header or paragraph-like block, using the whole block text.
pub fn extract_block_texts(blocks: &[Block]) -> (Vec<String>, Vec<&Block>) {
    blocks
        .iter()
        .filter(|b| b.is_header() || b.block_type.is_para_like())
        .map(|b| (b.block_text.clone(), b))
        .unzip()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TableBoundary;
    use pretty_assertions::assert_eq;

    fn link(block_idx: usize, text: &str) -> LevelLink {
        LevelLink {
            block_idx,
            block_text: text.to_string(),
        }
    }

    #[test]
    fn test_empty_input() {
        let out = flatten(Vec::new(), false);
        assert!(out.is_empty());
        assert!(out.blocks.is_empty());
    }

    #[test]
    fn test_headers_and_sentences() {
        let blocks = vec![
            Block::header("Terms", 1),
            Block::para("One. Two.", vec!["One.", "Two."]),
            Block::header("Payment", 2),
            Block::new(BlockType::ListItem, "Pay monthly.").with_sentences(vec!["Pay monthly."]),
        ];
        let out = flatten(blocks, false);

        assert_eq!(out.block_texts, vec!["Terms", "One.", "Two.", "Payment", "Pay monthly."]);
        assert_eq!(out.block_info[1].block_idx, 1);
        assert_eq!(out.block_info[2].block_idx, 1);

        let para = out.block_info[1].context();
        assert_eq!(para.header_text, "Terms");
        assert_eq!(para.header_block_idx, 0);
        assert_eq!(para.header_match_idx, 0);
        assert_eq!(para.level_chain, vec![link(0, "Terms")]);

        let sub = out.block_info[3].context();
        assert_eq!(sub.header_match_idx, 3);
        // A header's chain starts at its parent
        assert_eq!(sub.level_chain, vec![link(0, "Terms")]);

        let item = out.block_info[4].context();
        assert_eq!(item.header_text, "Payment");
        assert_eq!(item.level_chain, vec![link(2, "Payment"), link(0, "Terms")]);
    }

    #[test]
    fn test_blocks_before_first_header() {
        let out = flatten(vec![Block::para("Preamble.", vec!["Preamble."])], false);
        let ctx = out.block_info[0].context();
        assert_eq!(ctx, BlockContext::default());
        assert_eq!(ctx.header_block_idx, -1);
        assert_eq!(ctx.header_match_idx, -1);
    }

    #[test]
    fn test_header_stack_pops_back_to_root() {
        let mut blocks: Vec<Block> = [1, 2, 3, 2, 1]
            .into_iter()
            .enumerate()
            .map(|(i, level)| Block::header(format!("H{i}"), level))
            .collect();
        blocks.push(Block::para("Body.", vec!["Body."]));

        let out = flatten(blocks, false);
        let body = out.blocks[5].context();
        assert_eq!(body.level_chain, vec![link(4, "H4")]);

        let third = out.blocks[2].context();
        assert_eq!(third.level_chain, vec![link(1, "H1"), link(0, "H0")]);
    }

    #[test]
    fn test_block_idx_is_reassigned() {
        let mut para = Block::para("X.", vec!["X."]);
        para.block_idx = 42;
        let out = flatten(vec![Block::header("H", 1), para], false);
        assert_eq!(out.blocks[1].block_idx, 1);
    }

    #[test]
    fn test_match_index_advances_per_unit() {
        let blocks = vec![
            Block::header("A", 1),
            Block::para("a. b. c.", vec!["a.", "b.", "c."]),
            Block::header("B", 1),
            Block::table_row("standalone row"),
            Block::header("C", 2),
            Block::para("d.", vec!["d."]),
        ];
        let out = flatten(blocks, false);

        let match_idx: Vec<i64> = out
            .block_info
            .iter()
            .map(|b| b.context().header_match_idx)
            .collect();
        assert_eq!(match_idx, vec![0, 0, 0, 0, 4, 4, 6, 6]);
        assert!(match_idx.windows(2).all(|w| w[0] <= w[1]));

        // Headers sit at their own match index
        assert_eq!(out.block_texts[4], "B");
        assert_eq!(out.block_texts[6], "C");
    }

    #[test]
    fn test_table_rows_and_isolation() {
        let blocks = vec![
            Block::header("Schedule", 1),
            Block::table_row("Item | Cost").with_table_boundary(TableBoundary::Start {
                has_merged_cells: false,
            }),
            Block::header("Looks like a header", 1),
            Block::para("Inside.", vec!["Inside."]),
            Block::table_row("Rent | 100").with_table_boundary(TableBoundary::End),
            Block::para("After.", vec!["After."]),
            Block::table_row("Q | A").with_table_boundary(TableBoundary::Single {
                has_merged_cells: false,
            }),
        ];
        let out = flatten(blocks, false);

        assert_eq!(
            out.block_texts,
            vec![
                "Schedule",
                "Item | Cost",
                "Looks like a header",
                "Inside.",
                "Rent | 100",
                "After.",
                "Q | A",
            ]
        );

        // The header inside the table did not open a section
        let after = out.blocks[5].context();
        assert_eq!(after.header_text, "Schedule");
        assert_eq!(after.level_chain, vec![link(0, "Schedule")]);
        assert_eq!(after.table_idx, None);

        let table_ids: Vec<Option<usize>> =
            out.blocks.iter().map(|b| b.context().table_idx).collect();
        assert_eq!(
            table_ids,
            vec![None, Some(0), Some(0), Some(0), Some(0), None, Some(1)]
        );
    }

    #[test]
    fn test_stray_table_end_does_not_count() {
        let blocks = vec![
            Block::table_row("orphan").with_table_boundary(TableBoundary::End),
            Block::table_row("a").with_table_boundary(TableBoundary::Start {
                has_merged_cells: false,
            }),
            Block::table_row("b").with_table_boundary(TableBoundary::End),
        ];
        let out = flatten(blocks, false);
        assert_eq!(out.block_texts, vec!["orphan", "a", "b"]);
        assert_eq!(out.blocks[0].context().table_idx, None);
        assert_eq!(out.blocks[1].context().table_idx, Some(0));
    }

    fn merged_table() -> Vec<Block> {
        vec![
            Block::header("Fees", 2),
            Block::table_row("Fee | Amount").with_table_boundary(TableBoundary::Start {
                has_merged_cells: true,
            }),
            Block::table_row("Late | 5% of rent")
                .with_merged_cell(
                    Block {
                        block_idx: 7,
                        ..Block::header("Late", 0)
                    },
                    Block {
                        block_idx: 8,
                        ..Block::para("5% of rent. Due on day 5.", vec!["5% of rent.", "Due on day 5."])
                    },
                )
                .with_table_boundary(TableBoundary::End),
        ]
    }

    #[test]
    fn test_merged_cells_flattened() {
        let out = flatten(merged_table(), true);
        assert_eq!(
            out.block_texts,
            vec!["Fees", "Fee | Amount", "Late", "5% of rent.", "Due on day 5."]
        );

        // Synthetic blocks keep their own indices
        let header = &out.block_info[2];
        assert_eq!(header.block_idx, 7);
        assert_eq!(header.level, Some(3));
        let ctx = header.context();
        assert_eq!(ctx.header_text, "Fees");
        assert_eq!(ctx.header_block_idx, 2);
        assert_eq!(ctx.header_match_idx, 2);
        assert_eq!(ctx.level_chain, vec![link(0, "Fees")]);

        let para = &out.block_info[3];
        assert!(Arc::ptr_eq(para, &out.block_info[4]));
        assert_eq!(para.block_idx, 8);
        assert_eq!(para.level, Some(4));
        let ctx = para.context();
        assert_eq!(ctx.header_text, "Late");
        assert_eq!(ctx.header_block_idx, 2);
        assert_eq!(ctx.header_match_idx, 2);
        assert_eq!(ctx.level_chain, vec![link(7, "Late"), link(0, "Fees")]);

        // The parent row keeps the stamped cell
        let parent = out.blocks[2].merged_cell.as_ref().unwrap();
        assert_eq!(parent.header.level, Some(3));
    }

    #[test]
    fn test_header_with_stray_table_end_opens_section() {
        let blocks = vec![
            Block::header("Intro", 1),
            Block::header("Closing", 1).with_table_boundary(TableBoundary::End),
            Block::para("Body.", vec!["Body."]),
        ];
        let out = flatten(blocks, false);

        assert_eq!(out.block_texts, vec!["Intro", "Closing", "Body."]);
        let body = out.blocks[2].context();
        assert_eq!(body.header_text, "Closing");
        assert_eq!(body.header_block_idx, 1);
        assert_eq!(body.header_match_idx, 1);
        assert_eq!(body.level_chain, vec![link(1, "Closing")]);
        assert_eq!(body.table_idx, None);
    }

    #[test]
    fn test_header_opening_table_is_table_content() {
        let blocks = vec![
            Block::header("Intro", 1),
            Block::header("Col A | Col B", 1).with_table_boundary(TableBoundary::Single {
                has_merged_cells: false,
            }),
            Block::para("Body.", vec!["Body."]),
        ];
        let out = flatten(blocks, false);

        assert_eq!(out.block_info[1].context().table_idx, Some(0));
        assert_eq!(out.blocks[2].context().header_text, "Intro");
    }

    #[test]
    fn test_merged_cells_kept_as_rows() {
        let out = flatten(merged_table(), false);
        assert_eq!(
            out.block_texts,
            vec!["Fees", "Fee | Amount", "Late | 5% of rent"]
        );
        assert_eq!(out.block_info[2].context().table_idx, Some(0));
    }

    #[test]
    fn test_merged_mode_resets_after_table() {
        let mut blocks = merged_table();
        blocks.push(Block::table_row("x").with_table_boundary(TableBoundary::Start {
            has_merged_cells: false,
        }));
        blocks.push(
            Block::table_row("y | z")
                .with_merged_cell(Block::header("y", 0), Block::para("z.", vec!["z."]))
                .with_table_boundary(TableBoundary::End),
        );
        let out = flatten(blocks, true);
        assert_eq!(out.block_texts.last().map(String::as_str), Some("y | z"));
        assert_eq!(out.blocks[4].context().table_idx, Some(1));
    }

    #[test]
    fn test_other_blocks_are_enriched_but_not_emitted() {
        let out = flatten(
            vec![Block::header("H", 1), Block::new(BlockType::Other, "figure")],
            false,
        );
        assert_eq!(out.block_texts, vec!["H"]);
        assert_eq!(out.blocks[1].context().header_text, "H");
    }

    #[test]
    fn test_units_are_aligned() {
        let out = flatten(
            vec![Block::header("H", 1), Block::para("a. b.", vec!["a.", "b."])],
            false,
        );
        let units: Vec<(&str, usize)> = out
            .block_texts
            .iter()
            .zip(&out.block_info)
            .map(|(t, b)| (t.as_str(), b.block_idx))
            .collect();
        assert_eq!(units, vec![("H", 0), ("a.", 1), ("b.", 1)]);
    }

    #[test]
    fn test_extract_block_texts() {
        let blocks = vec![
            Block::header("Title", 1),
            Block::para("Body text. More.", vec!["Body text.", "More."]),
            Block::table_row("a | b"),
            Block::new(BlockType::NumberedListItem, "1. First"),
            Block::new(BlockType::Other, "img"),
        ];
        let (texts, info) = extract_block_texts(&blocks);
        assert_eq!(texts, vec!["Title", "Body text. More.", "1. First"]);
        assert_eq!(info.len(), 3);
        assert_eq!(info[2].block_type, BlockType::NumberedListItem);
    }
}
