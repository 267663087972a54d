//! Core types for the ingestor.

mod block;
mod config;
mod request;

pub use block::{
    Block, BlockContext, BlockType, BoxStyle, LevelLink, MergedCell, TableBoundary,
};
pub use config::{parse_flag, IngestorConfig, TokenizerConfig};
pub use request::{
    ApiResponse, BlocksRequest, FlattenParams, FlattenResult, ReturnDict, TokenizeRequest,
    TokenizeResponse,
};
