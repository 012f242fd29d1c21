//! huffpack: byte-level Huffman compression with a persisted frequency table.
//!
//! Encoding produces two artifacts:
//! - a bit-packed stream of codewords with no header or length field
//! - a text frequency table, one `binary:count` record per symbol
//!
//! Decoding rebuilds the same tree from the table alone, so the table must
//! travel with the encoded stream.
//!
//! ```
//! use huffpack::HuffmanCodec;
//!
//! let codec = HuffmanCodec::default();
//! let encoded = codec.encode_to_vec(b"aaaa bbb cc d")?;
//! let decoded = codec.decode_from_slice(&encoded.data, &encoded.freq_table)?;
//! assert_eq!(decoded, b"aaaa bbb cc d");
//! # Ok::<(), huffpack::HuffError>(())
//! ```

pub mod code;
pub mod config;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod frequency;
pub mod table;
pub mod tree;

use std::io::{Cursor, Read, Seek, Write};

use crate::config::CodecConfig;
use crate::frequency::FrequencyMap;

pub use crate::code::{CodeTable, Codeword, InverseCodeTable};
pub use crate::error::{HuffError, Result};
pub use crate::tree::{HuffNode, HuffmanTree};

/// Summary of one encode call
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EncodeReport {
    pub original_size: u64,
    pub distinct_symbols: usize,
    pub encoded_bits: u64,
    pub encoded_size: u64,
    pub ratio: f64,
    /// Shannon entropy of the input in bits per symbol
    pub entropy_bits: f64,
}

impl EncodeReport {
    pub(crate) fn new(freq: &FrequencyMap, encoded_bits: u64) -> Self {
        let original_size = freq.total();
        let encoded_size = encoded_bits.div_ceil(8);
        let ratio = if original_size == 0 {
            1.0
        } else {
            encoded_size as f64 / original_size as f64
        };
        Self {
            original_size,
            distinct_symbols: freq.len(),
            encoded_bits,
            encoded_size,
            ratio,
            entropy_bits: compute_entropy(freq),
        }
    }
}

/// Summary of one decode call
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DecodeReport {
    /// Symbol total recorded in the frequency table
    pub expected_symbols: u64,
    pub decoded_symbols: u64,
    /// Bits of an incomplete codeword dropped at end of stream
    pub discarded_bits: u64,
}

/// In-memory encode output
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct EncodedData {
    pub data: Vec<u8>,
    pub freq_table: String,
    pub report: EncodeReport,
}

/// The main codec
#[derive(Debug, Clone, Default)]
pub struct HuffmanCodec {
    config: CodecConfig,
}

impl HuffmanCodec {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Encode a seekable stream, writing codewords to `output` and the
    /// frequency table to `freq_table`.
    pub fn encode<R, W, T>(&self, input: R, output: W, freq_table: T) -> Result<EncodeReport>
    where
        R: Read + Seek,
        W: Write,
        T: Write,
    {
        encoder::encode(input, output, freq_table, &self.config)
    }

    /// Decode `input` using the table read from `freq_table`.
    pub fn decode<R, W, T>(&self, input: R, output: W, freq_table: T) -> Result<DecodeReport>
    where
        R: Read,
        W: Write,
        T: Read,
    {
        decoder::decode(input, output, freq_table, &self.config)
    }

    pub fn encode_to_vec(&self, data: &[u8]) -> Result<EncodedData> {
        let mut encoded = Vec::new();
        let mut freq_table = Vec::new();
        let report = self.encode(Cursor::new(data), &mut encoded, &mut freq_table)?;
        let freq_table = String::from_utf8(freq_table)
            .map_err(|e| HuffError::Internal(format!("frequency table is not UTF-8: {}", e)))?;
        Ok(EncodedData {
            data: encoded,
            freq_table,
            report,
        })
    }

    pub fn decode_from_slice(&self, data: &[u8], freq_table: &str) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        self.decode(data, &mut output, freq_table.as_bytes())?;
        Ok(output)
    }
}

/// Shannon entropy of a frequency distribution in bits per symbol
pub fn compute_entropy(freq: &FrequencyMap) -> f64 {
    let total = freq.total();
    if total == 0 {
        return 0.0;
    }
    let len = total as f64;
    let mut entropy = 0.0;
    for (_, f) in freq {
        let p = f as f64 / len;
        entropy -= p * p.log2();
    }
    entropy
}
