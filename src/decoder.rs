//! Huffman decoding
//!
//! The tree is rebuilt from the persisted frequency table. Bits are fed one
//! at a time to a [`SymbolMatcher`] until the table's symbol total has been
//! emitted or the stream runs out. A partial codeword at end of stream is the
//! final byte's padding and ends decoding normally.

use std::io::{self, BufWriter, Read, Write};

use bitstream_io::{BigEndian, BitRead, BitReader};
use tracing::{debug, warn};

use crate::code::{CodeTable, Codeword, InverseCodeTable};
use crate::config::{CodecConfig, DecodeStrategy, TrailingBits};
use crate::error::{HuffError, Result};
use crate::tree::{HuffNode, HuffmanTree};
use crate::{table, DecodeReport};

/// Turns a bit sequence into symbols, one bit at a time.
pub trait SymbolMatcher {
    /// Feed the next bit. Returns the symbol once a codeword is complete.
    fn push_bit(&mut self, bit: bool) -> Result<Option<u8>>;

    /// Bits consumed since the last emitted symbol.
    fn pending_bits(&self) -> usize;
}

/// Walks the tree from the root, resetting after every leaf.
pub struct TreeWalker<'a> {
    root: &'a HuffNode,
    current: &'a HuffNode,
    pending: Codeword,
}

impl<'a> TreeWalker<'a> {
    pub fn new(tree: &'a HuffmanTree) -> Self {
        Self {
            root: tree.root(),
            current: tree.root(),
            pending: Codeword::new(),
        }
    }
}

impl<'a> SymbolMatcher for TreeWalker<'a> {
    fn push_bit(&mut self, bit: bool) -> Result<Option<u8>> {
        self.pending.push(bit);
        let current: &'a HuffNode = self.current;
        let next: &'a HuffNode = match current {
            HuffNode::Internal { left, right, .. } => {
                if bit {
                    right.as_ref()
                } else {
                    left.as_ref()
                }
            }
            // bare leaf root, whose only codeword is `0`
            HuffNode::Leaf { symbol, .. } => {
                if bit {
                    return Err(invalid(&self.pending));
                }
                self.pending.clear();
                return Ok(Some(*symbol));
            }
        };

        match next {
            HuffNode::Leaf { symbol, .. } => {
                self.current = self.root;
                self.pending.clear();
                Ok(Some(*symbol))
            }
            internal => {
                self.current = internal;
                Ok(None)
            }
        }
    }

    fn pending_bits(&self) -> usize {
        self.pending.len()
    }
}

/// Grows a candidate codeword and looks it up after every bit.
pub struct PrefixMatcher {
    table: InverseCodeTable,
    pending: Codeword,
}

impl PrefixMatcher {
    pub fn new(table: InverseCodeTable) -> Self {
        Self {
            table,
            pending: Codeword::new(),
        }
    }
}

impl SymbolMatcher for PrefixMatcher {
    fn push_bit(&mut self, bit: bool) -> Result<Option<u8>> {
        self.pending.push(bit);
        if let Some(symbol) = self.table.get(&self.pending) {
            self.pending.clear();
            return Ok(Some(symbol));
        }
        if self.pending.len() >= self.table.max_len() {
            return Err(invalid(&self.pending));
        }
        Ok(None)
    }

    fn pending_bits(&self) -> usize {
        self.pending.len()
    }
}

fn invalid(bits: &Codeword) -> HuffError {
    HuffError::InvalidCodeword {
        bits: bits.to_string(),
    }
}

/// Decode `input` into `output` using the table read from `freq_table`.
pub fn decode<R, W, T>(
    input: R,
    output: W,
    freq_table: T,
    config: &CodecConfig,
) -> Result<DecodeReport>
where
    R: Read,
    W: Write,
    T: Read,
{
    let freq = table::deserialize(freq_table)?;
    let expected = freq.total();

    if freq.is_empty() {
        if config.trailing_bits == TrailingBits::Strict {
            let mut input = input;
            let extra = io::copy(&mut input, &mut io::sink())?;
            if extra > 0 {
                return Err(HuffError::TrailingData { bits: extra * 8 });
            }
        }
        let mut output = output;
        output.flush()?;
        debug!("decoded empty table");
        return Ok(DecodeReport::default());
    }

    let tree = HuffmanTree::build(&freq)?;
    let report = match config.strategy {
        DecodeStrategy::TreeWalk => {
            run(TreeWalker::new(&tree), input, output, expected, config)?
        }
        DecodeStrategy::PrefixTable => {
            let inverse = CodeTable::from_tree(&tree).inverse();
            run(PrefixMatcher::new(inverse), input, output, expected, config)?
        }
    };

    debug!(
        expected = report.expected_symbols,
        decoded = report.decoded_symbols,
        discarded_bits = report.discarded_bits,
        "decoded stream"
    );
    Ok(report)
}

fn run<M, R, W>(
    mut matcher: M,
    input: R,
    output: W,
    expected: u64,
    config: &CodecConfig,
) -> Result<DecodeReport>
where
    M: SymbolMatcher,
    R: Read,
    W: Write,
{
    let mut reader = BitReader::endian(input, BigEndian);
    let mut out = BufWriter::new(output);
    let mut decoded = 0u64;

    while decoded < expected {
        let bit = match reader.read_bit() {
            Ok(bit) => bit,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(e.into()),
        };
        if let Some(symbol) = matcher.push_bit(bit)? {
            out.write_all(&[symbol])?;
            decoded += 1;
        }
    }
    out.flush()?;

    let discarded_bits = matcher.pending_bits() as u64;
    if decoded < expected {
        if config.trailing_bits == TrailingBits::Strict {
            return Err(HuffError::TruncatedStream { expected, decoded });
        }
        warn!(expected, decoded, discarded_bits, "encoded stream ended early");
    } else if config.trailing_bits == TrailingBits::Strict {
        let trailing = trailing_bits(reader)?;
        if trailing > 0 {
            return Err(HuffError::TrailingData { bits: trailing });
        }
    }

    Ok(DecodeReport {
        expected_symbols: expected,
        decoded_symbols: decoded,
        discarded_bits,
    })
}

/// Bits left after the last symbol that are not zero padding.
fn trailing_bits<R: Read>(mut reader: BitReader<R, BigEndian>) -> Result<u64> {
    let mut padding = 0u64;
    let mut dirty = false;
    while !reader.byte_aligned() {
        dirty |= reader.read_bit()?;
        padding += 1;
    }
    let extra = io::copy(&mut reader.into_reader(), &mut io::sink())?;
    let padding = if dirty { padding } else { 0 };
    Ok(padding + extra * 8)
}
