//! Symbol frequency analysis

use std::collections::btree_map::{self, BTreeMap};
use std::io::{BufReader, Read};

use crate::error::Result;

/// Occurrence count for each distinct byte in a stream.
///
/// Counts are always non-zero and iteration is ascending by symbol.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyMap {
    counts: BTreeMap<u8, u64>,
}

impl FrequencyMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bytes(data: &[u8]) -> Self {
        let mut freq = [0u64; 256];
        for &b in data {
            freq[b as usize] += 1;
        }
        Self::from_array(&freq)
    }

    /// Count symbols by consuming `reader` to the end.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut freq = [0u64; 256];
        let mut reader = BufReader::new(reader);
        let mut buf = [0u8; 8192];
        loop {
            let n = match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            for &b in &buf[..n] {
                freq[b as usize] += 1;
            }
        }
        Ok(Self::from_array(&freq))
    }

    fn from_array(freq: &[u64; 256]) -> Self {
        let counts = freq
            .iter()
            .enumerate()
            .filter(|(_, &f)| f > 0)
            .map(|(i, &f)| (i as u8, f))
            .collect();
        Self { counts }
    }

    pub(crate) fn insert(&mut self, symbol: u8, count: u64) -> Option<u64> {
        self.counts.insert(symbol, count)
    }

    pub fn get(&self, symbol: u8) -> Option<u64> {
        self.counts.get(&symbol).copied()
    }

    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Total number of symbols counted, saturating at `u64::MAX`.
    pub fn total(&self) -> u64 {
        self.counts
            .values()
            .fold(0u64, |acc, &c| acc.saturating_add(c))
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.counts.iter(),
        }
    }
}

pub struct Iter<'a> {
    inner: btree_map::Iter<'a, u8, u64>,
}

impl Iterator for Iter<'_> {
    type Item = (u8, u64);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(&s, &c)| (s, c))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a> IntoIterator for &'a FrequencyMap {
    type Item = (u8, u64);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<(u8, u64)> for FrequencyMap {
    /// Duplicate symbols accumulate, saturating; zero counts are dropped.
    fn from_iter<I: IntoIterator<Item = (u8, u64)>>(iter: I) -> Self {
        let mut counts = BTreeMap::new();
        for (symbol, count) in iter {
            if count > 0 {
                let entry = counts.entry(symbol).or_insert(0u64);
                *entry = entry.saturating_add(count);
            }
        }
        Self { counts }
    }
}
