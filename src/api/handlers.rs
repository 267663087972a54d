//! HTTP request handlers for the ingestor service.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    Json,
};
use serde::Serialize;
use tracing::{info, info_span};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::flatten::{extract_block_texts, flatten, populate_sentences};
use crate::tokenizer::SentenceTokenizer;
use crate::types::{
    parse_flag, ApiResponse, Block, BlocksRequest, FlattenParams, FlattenResult, IngestorConfig,
    TokenizeRequest, TokenizeResponse,
};
use crate::utils::normalize_kangxi_radicals;

/// Application state shared across handlers.
pub struct AppState {
    pub tokenizer: SentenceTokenizer,
    pub config: IngestorConfig,
}

impl AppState {
    /// Compile the tokenizer described by the configuration.
    pub fn new(config: IngestorConfig) -> Result<Self> {
        if config.tokenizer.max_line_chars == 0 {
            return Err(Error::config("MAX_LINE_CHARS must be greater than zero"));
        }
        let tokenizer = SentenceTokenizer::from_config(&config.tokenizer)?;
        Ok(Self { tokenizer, config })
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: String,
    version: String,
}

/// Liveness probe.
pub async fn root() -> &'static str {
    "Service is running"
}

/// Health check endpoint.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Split a text into sentences.
pub async fn tokenize(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<TokenizeRequest>, JsonRejection>,
) -> Result<Json<TokenizeResponse>> {
    let Json(request) = payload.map_err(|e| Error::bad_request(e.body_text()))?;
    let request_id = Uuid::new_v4();

    let sentences = info_span!("tokenize", %request_id).in_scope(|| {
        let sentences = state.tokenizer.tokenize(&request.text);
        info!(
            chars = request.text.len(),
            sentences = sentences.len(),
            "Tokenized text"
        );
        sentences
    });

    Ok(Json(TokenizeResponse { sentences }))
}

/// Flatten a parsed block sequence into sentence-level units.
pub async fn flatten_blocks(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FlattenParams>,
    payload: std::result::Result<Json<BlocksRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<FlattenResult>>> {
    let Json(request) = payload.map_err(|e| Error::bad_request(e.body_text()))?;
    let flatten_merged_table = params
        .flatten_merged_table
        .as_deref()
        .map(parse_flag)
        .unwrap_or(state.config.flatten_merged_table);

    let request_id = Uuid::new_v4();
    let span = info_span!("flatten_blocks", %request_id, blocks = request.blocks.len());

    let result = tokio::task::spawn_blocking(move || {
        let _guard = span.enter();

        let mut blocks = request.blocks;
        populate_sentences(&state.tokenizer, &mut blocks);
        if state.config.normalize_kangxi {
            normalize_blocks(&mut blocks);
        }

        let flattened = flatten(blocks, flatten_merged_table);
        info!(
            units = flattened.len(),
            flatten_merged_table, "Flattened blocks"
        );

        FlattenResult {
            block_texts: flattened.block_texts,
            block_info: flattened.block_info,
            blocks: flattened.blocks,
        }
    })
    .await
    .map_err(|e| Error::internal(format!("flatten task failed: {e}")))?;

    Ok(Json(ApiResponse::ok(result)))
}

/// One unit per header or paragraph-like block, without sentence splitting.
pub async fn block_texts(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<BlocksRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<FlattenResult>>> {
    let Json(request) = payload.map_err(|e| Error::bad_request(e.body_text()))?;
    let request_id = Uuid::new_v4();

    let result = info_span!("block_texts", %request_id).in_scope(|| {
        let mut blocks = request.blocks;
        if state.config.normalize_kangxi {
            normalize_blocks(&mut blocks);
        }

        let (block_texts, block_info) = extract_block_texts(&blocks);
        info!(units = block_texts.len(), "Extracted block texts");

        FlattenResult {
            block_texts,
            block_info: block_info.into_iter().cloned().map(Arc::new).collect(),
            blocks: Vec::new(),
        }
    });

    Ok(Json(ApiResponse::ok(result)))
}

fn normalize_blocks(blocks: &mut [Block]) {
    for block in blocks {
        normalize_block(block);
        if let Some(cell) = block.merged_cell.as_mut() {
            normalize_block(&mut cell.header);
            normalize_block(&mut cell.para);
        }
    }
}

fn normalize_block(block: &mut Block) {
    block.block_text = normalize_kangxi_radicals(&block.block_text);
    for sentence in block.block_sents.iter_mut() {
        *sentence = normalize_kangxi_radicals(sentence);
    }
}
