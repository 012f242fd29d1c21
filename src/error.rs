//! Error types for huffpack

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, HuffError>;

#[derive(Error, Debug)]
pub enum HuffError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed frequency table at line {line}: {reason}")]
    MalformedTable { line: usize, reason: String },

    #[error("cannot build a tree from an empty frequency table")]
    EmptyFrequencyTable,

    #[error("input of {size} bytes exceeds the {limit} byte limit")]
    InputTooLarge { size: u64, limit: u64 },

    #[error("bit sequence {bits} matches no codeword")]
    InvalidCodeword { bits: String },

    #[error("encoded stream truncated: expected {expected} symbols, decoded {decoded}")]
    TruncatedStream { expected: u64, decoded: u64 },

    #[error("{bits} unexpected bits after the last symbol")]
    TrailingData { bits: u64 },

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl HuffError {
    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        HuffError::MalformedTable {
            line,
            reason: reason.into(),
        }
    }
}
