//! Codeword assignment
//!
//! Each leaf gets the path from the root as its codeword, `0` for a left
//! branch and `1` for a right one. Only leaves carry codewords, so the table
//! is prefix-free.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use tracing::trace;

use crate::frequency::FrequencyMap;
use crate::tree::{HuffNode, HuffmanTree};

/// Bits of a single codeword, first bit first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Codeword(Vec<bool>);

impl Codeword {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, bit: bool) {
        self.0.push(bit);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn bits(&self) -> &[bool] {
        &self.0
    }

    pub fn starts_with(&self, prefix: &Codeword) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl From<Vec<bool>> for Codeword {
    fn from(bits: Vec<bool>) -> Self {
        Self(bits)
    }
}

impl fmt::Display for Codeword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.0 {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Symbol to codeword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: BTreeMap<u8, Codeword>,
}

impl CodeTable {
    pub fn from_tree(tree: &HuffmanTree) -> Self {
        let mut codes = BTreeMap::new();
        match tree.root() {
            // a lone leaf would get an empty path; reserve `0` for it
            HuffNode::Leaf { symbol, .. } => {
                codes.insert(*symbol, Codeword::from(vec![false]));
            }
            root => build_codes(root, &mut Codeword::new(), &mut codes),
        }
        Self { codes }
    }

    pub fn get(&self, symbol: u8) -> Option<&Codeword> {
        self.codes.get(&symbol)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, &Codeword)> {
        self.codes.iter().map(|(&s, c)| (s, c))
    }

    pub fn max_len(&self) -> usize {
        self.codes.values().map(Codeword::len).max().unwrap_or(0)
    }

    /// Number of bits needed to encode a stream with these frequencies.
    pub fn encoded_bit_len(&self, freq: &FrequencyMap) -> u64 {
        freq.iter()
            .filter_map(|(symbol, count)| self.get(symbol).map(|c| count * c.len() as u64))
            .sum()
    }

    pub fn is_prefix_free(&self) -> bool {
        let codes: Vec<&Codeword> = self.codes.values().collect();
        codes.iter().enumerate().all(|(i, a)| {
            codes
                .iter()
                .enumerate()
                .all(|(j, b)| i == j || !b.starts_with(a))
        })
    }

    pub fn inverse(&self) -> InverseCodeTable {
        InverseCodeTable {
            symbols: self.codes.iter().map(|(&s, c)| (c.clone(), s)).collect(),
            max_len: self.max_len(),
        }
    }
}

fn build_codes(node: &HuffNode, prefix: &mut Codeword, codes: &mut BTreeMap<u8, Codeword>) {
    match node {
        HuffNode::Leaf { symbol, .. } => {
            trace!(symbol, code = %prefix, "assigned codeword");
            codes.insert(*symbol, prefix.clone());
        }
        HuffNode::Internal { left, right, .. } => {
            prefix.push(false);
            build_codes(left, prefix, codes);
            prefix.0.pop();

            prefix.push(true);
            build_codes(right, prefix, codes);
            prefix.0.pop();
        }
    }
}

/// Codeword to symbol.
#[derive(Debug, Clone)]
pub struct InverseCodeTable {
    symbols: HashMap<Codeword, u8>,
    max_len: usize,
}

impl InverseCodeTable {
    pub fn get(&self, code: &Codeword) -> Option<u8> {
        self.symbols.get(code).copied()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Length of the longest codeword.
    pub fn max_len(&self) -> usize {
        self.max_len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_for(data: &[u8]) -> (FrequencyMap, CodeTable) {
        let freq = FrequencyMap::from_bytes(data);
        let tree = HuffmanTree::build(&freq).unwrap();
        (freq, CodeTable::from_tree(&tree))
    }

    #[test]
    fn test_mixed_text_code_lengths() {
        let (freq, codes) = table_for(b"aaaa bbb cc d");
        let len = |s: u8| codes.get(s).unwrap().len();
        assert_eq!(len(b'a'), 2);
        assert_eq!(len(b' '), 2);
        assert_eq!(len(b'b'), 2);
        assert_eq!(len(b'c'), 3);
        assert_eq!(len(b'd'), 3);
        assert_eq!(codes.encoded_bit_len(&freq), 29);
        assert_eq!(codes.get(b' ').unwrap().to_string(), "00");
        assert_eq!(codes.get(b'd').unwrap().to_string(), "100");
    }

    #[test]
    fn test_prefix_free() {
        let data: Vec<u8> = (0..=255u8).flat_map(|b| vec![b; (b as usize * 31) % 17 + 1]).collect();
        let (_, codes) = table_for(&data);
        assert_eq!(codes.len(), 256);
        assert!(codes.is_prefix_free());
    }

    #[test]
    fn test_shorter_codes_for_frequent_symbols() {
        let (freq, codes) = table_for(b"abracadabra alakazam");
        for (a, fa) in freq.iter() {
            for (b, fb) in freq.iter() {
                if fa > fb {
                    assert!(codes.get(a).unwrap().len() <= codes.get(b).unwrap().len());
                }
            }
        }
    }

    #[test]
    fn test_single_symbol_reserved_code() {
        let (freq, codes) = table_for(b"aaaa");
        assert_eq!(codes.get(b'a').unwrap().to_string(), "0");
        assert_eq!(codes.encoded_bit_len(&freq), 4);
    }

    #[test]
    fn test_inverse_swaps_entries() {
        let (_, codes) = table_for(b"hello world");
        let inverse = codes.inverse();
        assert_eq!(inverse.len(), codes.len());
        assert_eq!(inverse.max_len(), codes.max_len());
        for (symbol, code) in codes.iter() {
            assert_eq!(inverse.get(code), Some(symbol));
        }
    }

    #[test]
    fn test_equal_weights_give_equal_lengths() {
        let (_, codes) = table_for(b"abcdefgh");
        assert!(codes.iter().all(|(_, c)| c.len() == 3));
    }
}
