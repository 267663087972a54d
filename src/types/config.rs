//! Configuration types for the ingestor.

use serde::{Deserialize, Serialize};

use crate::{DEFAULT_MAX_LINE_CHARS, DEFAULT_PORT};

/// Global ingestor service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestorConfig {
    /// Port the HTTP service listens on
    pub port: u16,

    /// Tokenizer settings
    pub tokenizer: TokenizerConfig,

    /// Flatten merged table cells into header + paragraph pairs by default
    pub flatten_merged_table: bool,

    /// Replace Kangxi radicals in emitted texts
    pub normalize_kangxi: bool,
}

impl Default for IngestorConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            tokenizer: TokenizerConfig::default(),
            flatten_merged_table: false,
            normalize_kangxi: true,
        }
    }
}

impl IngestorConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            port: std::env::var("PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            tokenizer: TokenizerConfig::from_env(),
            flatten_merged_table: std::env::var("FLATTEN_MERGED_TABLE")
                .ok()
                .map(|s| parse_flag(&s))
                .unwrap_or(false),
            normalize_kangxi: std::env::var("NORMALIZE_KANGXI")
                .ok()
                .map(|s| parse_flag(&s))
                .unwrap_or(true),
        }
    }
}

/// Settings for the sentence tokenizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenizerConfig {
    /// Lines longer than this (in chars) skip the protection rewrites
    pub max_line_chars: usize,

    /// Abbreviations added on top of the built-in sets
    pub extra_abbreviations: Vec<String>,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            max_line_chars: DEFAULT_MAX_LINE_CHARS,
            extra_abbreviations: Vec::new(),
        }
    }
}

impl TokenizerConfig {
    /// Load tokenizer settings from environment variables.
    pub fn from_env() -> Self {
        Self {
            max_line_chars: std::env::var("MAX_LINE_CHARS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MAX_LINE_CHARS),
            extra_abbreviations: std::env::var("EXTRA_ABBREVIATIONS")
                .map(|s| parse_list(&s))
                .unwrap_or_default(),
        }
    }
}

/// Parse a yes/no style flag.
pub fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "yes" | "y" | "true" | "1" | "on"
    )
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}
