//! Persisted frequency table
//!
//! One record per symbol: the symbol as 8 zero-padded binary digits, a colon,
//! the decimal count, then a blank separator line.
//!
//! ```text
//! 01100001:4
//!
//! 01100010:3
//! ```

use std::io::{Read, Write};

use crate::error::{HuffError, Result};
use crate::frequency::FrequencyMap;

const SYMBOL_DIGITS: usize = 8;

/// Write `freq` to `writer`, ascending by symbol.
pub fn serialize<W: Write>(freq: &FrequencyMap, mut writer: W) -> Result<()> {
    for (symbol, count) in freq {
        write!(writer, "{:08b}:{}\n\n", symbol, count)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn to_string(freq: &FrequencyMap) -> String {
    freq.iter()
        .map(|(symbol, count)| format!("{:08b}:{}\n\n", symbol, count))
        .collect()
}

/// Read a whole table from `reader`.
pub fn deserialize<R: Read>(mut reader: R) -> Result<FrequencyMap> {
    let mut text = String::new();
    reader.read_to_string(&mut text).map_err(|e| {
        if e.kind() == std::io::ErrorKind::InvalidData {
            HuffError::malformed(1, "table is not valid UTF-8")
        } else {
            HuffError::Io(e)
        }
    })?;
    parse(&text)
}

/// Parse table text. Record order does not matter.
pub fn parse(text: &str) -> Result<FrequencyMap> {
    let mut freq = FrequencyMap::new();
    let mut total = 0u64;
    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let line_no = idx + 1;
        let (symbol, count) = parse_record(line, line_no)?;
        total = total
            .checked_add(count)
            .ok_or_else(|| HuffError::malformed(line_no, "counts overflow u64"))?;
        if freq.insert(symbol, count).is_some() {
            return Err(HuffError::malformed(
                line_no,
                format!("duplicate symbol {:08b}", symbol),
            ));
        }
    }
    Ok(freq)
}

fn parse_record(line: &str, line_no: usize) -> Result<(u8, u64)> {
    let (symbol, count) = line
        .split_once(':')
        .ok_or_else(|| HuffError::malformed(line_no, "expected `binary:count`"))?;

    let symbol = symbol.trim();
    if symbol.len() != SYMBOL_DIGITS || !symbol.bytes().all(|b| b == b'0' || b == b'1') {
        return Err(HuffError::malformed(
            line_no,
            format!("symbol `{}` is not {} binary digits", symbol, SYMBOL_DIGITS),
        ));
    }
    let symbol = u8::from_str_radix(symbol, 2)
        .map_err(|e| HuffError::malformed(line_no, e.to_string()))?;

    let count: u64 = count
        .trim()
        .parse()
        .map_err(|e| HuffError::malformed(line_no, format!("bad count: {}", e)))?;
    if count == 0 {
        return Err(HuffError::malformed(line_no, "count must be positive"));
    }

    Ok((symbol, count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_format() {
        let freq = FrequencyMap::from_bytes(b"aab");
        assert_eq!(to_string(&freq), "01100001:2\n\n01100010:1\n\n");
    }

    #[test]
    fn test_serialize_matches_to_string() {
        let freq = FrequencyMap::from_bytes(b"hello world");
        let mut out = Vec::new();
        serialize(&freq, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), to_string(&freq));
    }

    #[test]
    fn test_roundtrip_all_bytes() {
        let data: Vec<u8> = (0..=255u8).flat_map(|b| vec![b; b as usize % 7 + 1]).collect();
        let freq = FrequencyMap::from_bytes(&data);
        let parsed = deserialize(to_string(&freq).as_bytes()).unwrap();
        assert_eq!(parsed, freq);
    }

    #[test]
    fn test_order_independent() {
        let text = "01100011:2\n\n01100001:4\n\n00100000:3\n\n";
        let shuffled = "00100000:3\n\n01100011:2\n\n01100001:4\n\n";
        assert_eq!(parse(text).unwrap(), parse(shuffled).unwrap());
    }

    #[test]
    fn test_crlf_and_whitespace() {
        let freq = parse("01100001:4\r\n\r\n  01100010 : 3 \r\n").unwrap();
        assert_eq!(freq.get(b'a'), Some(4));
        assert_eq!(freq.get(b'b'), Some(3));
    }

    #[test]
    fn test_empty_table() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse("\n\n").unwrap().is_empty());
    }

    #[test]
    fn test_count_total_overflow() {
        let text = "01100001:18446744073709551615\n\n01100010:2\n\n";
        match parse(text) {
            Err(HuffError::MalformedTable { line, reason }) => {
                assert_eq!(line, 3);
                assert!(reason.contains("overflow"));
            }
            other => panic!("expected overflow error, got {:?}", other),
        }

        let max = parse("01100001:18446744073709551615\n\n").unwrap();
        assert_eq!(max.total(), u64::MAX);
    }

    #[test]
    fn test_invalid_utf8() {
        let bytes: &[u8] = &[0x30, 0xFF, 0x3A, 0x31];
        assert!(matches!(
            deserialize(bytes),
            Err(HuffError::MalformedTable { line: 1, .. })
        ));
    }

    #[test]
    fn test_malformed_records() {
        for (text, line) in [
            ("01100001", 1),
            ("01100001:4\n\n0110000x:1", 3),
            ("0110:4", 1),
            ("101100001:4", 1),
            ("01100001:-1", 1),
            ("01100001:many", 1),
            ("01100001:0", 1),
            ("01100001:1\n01100001:2", 2),
        ] {
            match parse(text) {
                Err(HuffError::MalformedTable { line: l, .. }) => assert_eq!(l, line, "{:?}", text),
                other => panic!("expected malformed table for {:?}, got {:?}", text, other),
            }
        }
    }
}
