//! Huffman encoding
//!
//! The input is scanned twice: once to count symbols and once to emit
//! codewords. The frequency table is written before any encoded bits.

use std::io::{BufReader, Read, Seek, SeekFrom, Write};

use bitstream_io::{BigEndian, BitWrite, BitWriter};
use tracing::debug;

use crate::code::CodeTable;
use crate::config::CodecConfig;
use crate::error::{HuffError, Result};
use crate::frequency::FrequencyMap;
use crate::tree::HuffmanTree;
use crate::{compute_entropy, table, EncodeReport};

/// Encode `input` into `output`, persisting the frequency table to `freq_table`.
///
/// Reading starts at the current position of `input`; the second pass seeks
/// back to it. The last output byte is padded with zero bits.
pub fn encode<R, W, T>(
    mut input: R,
    output: W,
    freq_table: T,
    config: &CodecConfig,
) -> Result<EncodeReport>
where
    R: Read + Seek,
    W: Write,
    T: Write,
{
    let start = input.stream_position()?;
    let freq = FrequencyMap::from_reader(&mut input)?;

    let size = freq.total();
    if size > config.max_input_size {
        return Err(HuffError::InputTooLarge {
            size,
            limit: config.max_input_size,
        });
    }

    table::serialize(&freq, freq_table)?;

    if freq.is_empty() {
        let mut output = output;
        output.flush()?;
        debug!("encoded empty input");
        return Ok(EncodeReport::new(&freq, 0));
    }

    let tree = HuffmanTree::build(&freq)?;
    let codes = CodeTable::from_tree(&tree);

    input.seek(SeekFrom::Start(start))?;
    let bits = write_codewords(BufReader::new(input), output, &codes)?;

    debug_assert_eq!(bits, codes.encoded_bit_len(&freq));
    debug!(
        symbols = size,
        distinct = freq.len(),
        bits,
        entropy = compute_entropy(&freq),
        "encoded stream"
    );
    Ok(EncodeReport::new(&freq, bits))
}

fn write_codewords<R: Read, W: Write>(input: R, output: W, codes: &CodeTable) -> Result<u64> {
    let mut writer = BitWriter::endian(output, BigEndian);
    let mut bits = 0u64;

    for byte in input.bytes() {
        let byte = byte?;
        let code = codes.get(byte).ok_or_else(|| {
            HuffError::Internal(format!("symbol {:08b} missing from code table", byte))
        })?;
        for &bit in code.bits() {
            writer.write_bit(bit)?;
        }
        bits += code.len() as u64;
    }

    writer.byte_align()?;
    let mut output = writer.into_writer();
    output.flush()?;
    Ok(bits)
}
