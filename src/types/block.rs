//! Block type definitions.
//!
//! A [`Block`] is one structural unit produced by the document parser: a
//! header, a paragraph, a list item or a table row. The flattener takes
//! ownership of a block sequence and stamps each block with its header
//! context ([`BlockContext`]).

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Error;

/// The structural kind of a block, as reported by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockType {
    Header,
    Para,
    ListItem,
    NumberedListItem,
    TableRow,
    Other,
}

impl BlockType {
    /// Parse the parser's block type tag. Unknown tags map to [`BlockType::Other`].
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "header" => BlockType::Header,
            "para" => BlockType::Para,
            "list_item" => BlockType::ListItem,
            "numbered_list_item" => BlockType::NumberedListItem,
            "table_row" => BlockType::TableRow,
            _ => BlockType::Other,
        }
    }

    /// The wire tag for this block type.
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::Header => "header",
            BlockType::Para => "para",
            BlockType::ListItem => "list_item",
            BlockType::NumberedListItem => "numbered_list_item",
            BlockType::TableRow => "table_row",
            BlockType::Other => "other",
        }
    }

    /// Paragraph-like blocks carry pre-split sentences.
    pub fn is_para_like(&self) -> bool {
        matches!(
            self,
            BlockType::Para | BlockType::ListItem | BlockType::NumberedListItem
        )
    }
}

impl std::fmt::Display for BlockType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Position of a block at the edge of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableBoundary {
    /// First row of a table.
    Start { has_merged_cells: bool },
    /// Last row of a table.
    End,
    /// A one-row table: the same block opens and closes it.
    Single { has_merged_cells: bool },
}

impl TableBoundary {
    pub fn opens_table(&self) -> bool {
        matches!(self, TableBoundary::Start { .. } | TableBoundary::Single { .. })
    }

    pub fn closes_table(&self) -> bool {
        matches!(self, TableBoundary::End | TableBoundary::Single { .. })
    }

    pub fn has_merged_cells(&self) -> bool {
        match self {
            TableBoundary::Start { has_merged_cells } | TableBoundary::Single { has_merged_cells } => {
                *has_merged_cells
            }
            TableBoundary::End => false,
        }
    }
}

/// A merged table cell flattened into a synthetic header + paragraph pair.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedCell {
    pub header: Box<Block>,
    pub para: Box<Block>,
}

/// One ancestor header in a block's level chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelLink {
    pub block_idx: usize,
    pub block_text: String,
}

/// Header context stamped on a block by the flattener.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockContext {
    /// Text of the most recently opened header ("" before the first one)
    pub header_text: String,
    /// Block index of that header (-1 before the first one)
    pub header_block_idx: i64,
    /// Match index of that header (-1 before the first one)
    pub header_match_idx: i64,
    /// Enclosing headers, nearest first
    pub level_chain: Vec<LevelLink>,
    /// Table ordinal for rows emitted inside a table
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_idx: Option<usize>,
}

impl Default for BlockContext {
    fn default() -> Self {
        Self {
            header_text: String::new(),
            header_block_idx: -1,
            header_match_idx: -1,
            level_chain: Vec::new(),
            table_idx: None,
        }
    }
}

/// Bounding box of a block on its page: `[top, left, right, width, height]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 5]", into = "[f64; 5]")]
pub struct BoxStyle {
    pub top: f64,
    pub left: f64,
    pub right: f64,
    pub width: f64,
    pub height: f64,
}

impl From<[f64; 5]> for BoxStyle {
    fn from(v: [f64; 5]) -> Self {
        Self {
            top: v[0],
            left: v[1],
            right: v[2],
            width: v[3],
            height: v[4],
        }
    }
}

impl From<BoxStyle> for [f64; 5] {
    fn from(b: BoxStyle) -> Self {
        [b.top, b.left, b.right, b.width, b.height]
    }
}

/// A parsed document block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBlock", into = "RawBlock")]
pub struct Block {
    pub block_type: BlockType,
    pub block_text: String,
    /// Sentences of a paragraph-like block, in order
    pub block_sents: Vec<String>,
    /// Nesting depth, smaller is shallower. Required on headers.
    pub level: Option<u32>,
    /// Position in the source sequence; reassigned by the flattener
    pub block_idx: usize,
    pub page_idx: Option<usize>,
    pub box_style: Option<BoxStyle>,
    pub table_boundary: Option<TableBoundary>,
    pub merged_cell: Option<MergedCell>,
    /// Populated by the flattener
    pub context: Option<BlockContext>,
}

impl Block {
    /// Create a bare block of the given type.
    pub fn new(block_type: BlockType, text: impl Into<String>) -> Self {
        Self {
            block_type,
            block_text: text.into(),
            block_sents: Vec::new(),
            level: None,
            block_idx: 0,
            page_idx: None,
            box_style: None,
            table_boundary: None,
            merged_cell: None,
            context: None,
        }
    }

    /// Create a header block at the given level.
    pub fn header(text: impl Into<String>, level: u32) -> Self {
        Self {
            level: Some(level),
            ..Self::new(BlockType::Header, text)
        }
    }

    /// Create a paragraph block with its sentences.
    pub fn para<S: Into<String>>(text: impl Into<String>, sentences: Vec<S>) -> Self {
        Self::new(BlockType::Para, text).with_sentences(sentences)
    }

    /// Create a table row block.
    pub fn table_row(text: impl Into<String>) -> Self {
        Self::new(BlockType::TableRow, text)
    }

    /// Set the sentences.
    pub fn with_sentences<S: Into<String>>(mut self, sentences: Vec<S>) -> Self {
        self.block_sents = sentences.into_iter().map(Into::into).collect();
        self
    }

    /// Mark the block as a table boundary.
    pub fn with_table_boundary(mut self, boundary: TableBoundary) -> Self {
        self.table_boundary = Some(boundary);
        self
    }

    /// Attach a merged cell's synthetic header and paragraph.
    pub fn with_merged_cell(mut self, header: Block, para: Block) -> Self {
        self.merged_cell = Some(MergedCell {
            header: Box::new(header),
            para: Box::new(para),
        });
        self
    }

    /// Set the bounding box.
    pub fn with_box_style(mut self, box_style: BoxStyle) -> Self {
        self.box_style = Some(box_style);
        self
    }

    pub fn is_header(&self) -> bool {
        self.block_type == BlockType::Header
    }

    pub fn opens_table(&self) -> bool {
        self.table_boundary.map_or(false, |b| b.opens_table())
    }

    pub fn closes_table(&self) -> bool {
        self.table_boundary.map_or(false, |b| b.closes_table())
    }

    /// Header level, treating a missing level as top-level.
    pub fn header_level(&self) -> u32 {
        self.level.unwrap_or(0)
    }

    /// Header context, or the initial context if the block was never flattened.
    pub fn context(&self) -> BlockContext {
        self.context.clone().unwrap_or_default()
    }

    /// Mutable header context, created on first use.
    pub fn context_mut(&mut self) -> &mut BlockContext {
        self.context.get_or_insert_with(BlockContext::default)
    }
}

/// Wire representation matching the parser's JSON keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawBlock {
    block_type: String,
    #[serde(default)]
    block_text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    block_sents: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    level: Option<u32>,
    #[serde(default)]
    block_idx: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    page_idx: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    box_style: Option<BoxStyle>,
    // The parser marks boundaries by key presence, whatever the value.
    #[serde(
        default,
        deserialize_with = "key_present",
        skip_serializing_if = "std::ops::Not::not"
    )]
    is_table_start: bool,
    #[serde(
        default,
        deserialize_with = "key_present",
        skip_serializing_if = "std::ops::Not::not"
    )]
    has_merged_cells: bool,
    #[serde(
        default,
        deserialize_with = "key_present",
        skip_serializing_if = "std::ops::Not::not"
    )]
    is_table_end: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    effective_header: Option<Box<RawBlock>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    effective_para: Option<Box<RawBlock>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    header_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    header_block_idx: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    header_match_idx: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    level_chain: Option<Vec<LevelLink>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    table_idx: Option<usize>,
}

fn key_present<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    IgnoredAny::deserialize(deserializer).map(|_| true)
}

impl TryFrom<RawBlock> for Block {
    type Error = Error;

    fn try_from(raw: RawBlock) -> Result<Self, Self::Error> {
        Block::from_raw(raw, true)
    }
}

impl Block {
    /// Convert a wire record. Merged-cell halves are converted with
    /// `require_level` off: the flattener assigns their levels.
    fn from_raw(raw: RawBlock, require_level: bool) -> Result<Self, Error> {
        let block_type = BlockType::from_tag(&raw.block_type);
        if require_level && block_type == BlockType::Header && raw.level.is_none() {
            return Err(Error::invalid_block(raw.block_idx, "header without level"));
        }

        let has_merged_cells = raw.has_merged_cells;
        let table_boundary = match (raw.is_table_start, raw.is_table_end) {
            (true, true) => Some(TableBoundary::Single { has_merged_cells }),
            (true, false) => Some(TableBoundary::Start { has_merged_cells }),
            (false, true) => Some(TableBoundary::End),
            (false, false) => None,
        };

        let merged_cell = match (raw.effective_header, raw.effective_para) {
            (Some(header), Some(para)) => Some(MergedCell {
                header: Box::new(Block::from_raw(*header, false)?),
                para: Box::new(Block::from_raw(*para, false)?),
            }),
            (None, None) => None,
            _ => {
                return Err(Error::invalid_block(
                    raw.block_idx,
                    "merged cell needs both effective_header and effective_para",
                ))
            }
        };

        let context = if raw.header_text.is_some()
            || raw.header_block_idx.is_some()
            || raw.header_match_idx.is_some()
            || raw.level_chain.is_some()
        {
            Some(BlockContext {
                header_text: raw.header_text.unwrap_or_default(),
                header_block_idx: raw.header_block_idx.unwrap_or(-1),
                header_match_idx: raw.header_match_idx.unwrap_or(-1),
                level_chain: raw.level_chain.unwrap_or_default(),
                table_idx: raw.table_idx,
            })
        } else {
            None
        };

        Ok(Block {
            block_type,
            block_text: raw.block_text,
            block_sents: raw.block_sents,
            level: raw.level,
            block_idx: raw.block_idx,
            page_idx: raw.page_idx,
            box_style: raw.box_style,
            table_boundary,
            merged_cell,
            context,
        })
    }
}

impl From<Block> for RawBlock {
    fn from(block: Block) -> Self {
        let is_table_start = block.opens_table();
        let is_table_end = block.closes_table();
        let has_merged_cells = block.table_boundary.map_or(false, |b| b.has_merged_cells());
        let (effective_header, effective_para) = match block.merged_cell {
            Some(cell) => (
                Some(Box::new(RawBlock::from(*cell.header))),
                Some(Box::new(RawBlock::from(*cell.para))),
            ),
            None => (None, None),
        };
        let context = block.context;

        RawBlock {
            block_type: block.block_type.as_str().to_string(),
            block_text: block.block_text,
            block_sents: block.block_sents,
            level: block.level,
            block_idx: block.block_idx,
            page_idx: block.page_idx,
            box_style: block.box_style,
            is_table_start,
            has_merged_cells,
            is_table_end,
            effective_header,
            effective_para,
            header_text: context.as_ref().map(|c| c.header_text.clone()),
            header_block_idx: context.as_ref().map(|c| c.header_block_idx),
            header_match_idx: context.as_ref().map(|c| c.header_match_idx),
            level_chain: context.as_ref().map(|c| c.level_chain.clone()),
            table_idx: context.and_then(|c| c.table_idx),
        }
    }
}
