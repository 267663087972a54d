//! Request and response definitions for the HTTP surface.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::Block;

/// Request to split a piece of text into sentences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenizeRequest {
    pub text: String,
}

/// Sentences of a tokenized text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenizeResponse {
    pub sentences: Vec<String>,
}

/// Request carrying a parsed block sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlocksRequest {
    pub blocks: Vec<Block>,
}

/// Query parameters for flattening.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlattenParams {
    /// "yes" / "no"; falls back to the service default when absent
    pub flatten_merged_table: Option<String>,
}

/// Flattened text units and their owning blocks.
#[derive(Debug, Clone, Serialize)]
pub struct FlattenResult {
    pub block_texts: Vec<String>,
    pub block_info: Vec<Arc<Block>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub blocks: Vec<Arc<Block>>,
}

/// Envelope around a successful result.
#[derive(Debug, Clone, Serialize)]
pub struct ReturnDict<T> {
    pub result: T,
}

/// Successful response body.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    pub status: u16,
    pub return_dict: ReturnDict<T>,
}

impl<T> ApiResponse<T> {
    /// Wrap a result in a 200 envelope.
    pub fn ok(result: T) -> Self {
        Self {
            status: 200,
            return_dict: ReturnDict { result },
        }
    }
}
