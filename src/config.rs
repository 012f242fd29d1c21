//! Configuration for huffpack

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// How the decoder turns bits back into symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecodeStrategy {
    /// Walk the rebuilt tree from the root until a leaf is reached.
    #[default]
    TreeWalk,
    /// Grow a candidate bit string and look it up in the inverse code table.
    PrefixTable,
}

/// What to do with bits that do not complete the expected symbol count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrailingBits {
    /// Stop quietly at end of stream, keeping whatever was decoded.
    #[default]
    Discard,
    /// Report truncation and any non-padding bits after the last symbol.
    Strict,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    pub strategy: DecodeStrategy,
    pub trailing_bits: TrailingBits,
    pub max_input_size: u64,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            strategy: DecodeStrategy::TreeWalk,
            trailing_bits: TrailingBits::Discard,
            max_input_size: 100 * 1024 * 1024, // 100 MB
        }
    }
}

impl CodecConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
