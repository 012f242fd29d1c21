//! Huffman tree construction
//!
//! Leaves are pushed into a min-heap and the two lightest nodes are merged
//! until one root remains. Equal weights are ordered by the smallest symbol
//! in each subtree, so a given set of frequencies always yields the same tree.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt;

use tracing::trace;

use crate::error::{HuffError, Result};
use crate::frequency::FrequencyMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffNode {
    Leaf {
        symbol: u8,
        weight: u64,
    },
    Internal {
        weight: u64,
        left: Box<HuffNode>,
        right: Box<HuffNode>,
    },
}

impl HuffNode {
    pub fn weight(&self) -> u64 {
        match self {
            HuffNode::Leaf { weight, .. } | HuffNode::Internal { weight, .. } => *weight,
        }
    }

    fn merge(weight: u64, left: HuffNode, right: HuffNode) -> HuffNode {
        HuffNode::Internal {
            weight,
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

/// Heap entry carrying the tie-break key alongside the subtree.
#[derive(Debug)]
struct HeapEntry {
    weight: u64,
    min_symbol: u8,
    node: HuffNode,
}

impl Eq for HeapEntry {}
impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.weight == other.weight && self.min_symbol == other.min_symbol
    }
}
impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // min-heap on (weight, min_symbol)
        (other.weight, other.min_symbol).cmp(&(self.weight, self.min_symbol))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    root: HuffNode,
}

impl HuffmanTree {
    /// Build the tree for a non-empty frequency map.
    ///
    /// Fails if the combined weights do not fit in a `u64`.
    pub fn build(freq: &FrequencyMap) -> Result<Self> {
        let mut heap: BinaryHeap<HeapEntry> = freq
            .iter()
            .map(|(symbol, weight)| HeapEntry {
                weight,
                min_symbol: symbol,
                node: HuffNode::Leaf { symbol, weight },
            })
            .collect();

        while heap.len() > 1 {
            let (Some(left), Some(right)) = (heap.pop(), heap.pop()) else {
                unreachable!("heap holds at least two entries");
            };
            trace!(left = left.weight, right = right.weight, "merging subtrees");
            let weight = left.weight.checked_add(right.weight).ok_or_else(|| {
                HuffError::Internal("subtree weights overflow u64".to_string())
            })?;
            heap.push(HeapEntry {
                weight,
                min_symbol: left.min_symbol.min(right.min_symbol),
                node: HuffNode::merge(weight, left.node, right.node),
            });
        }

        let root = heap.pop().ok_or(HuffError::EmptyFrequencyTable)?.node;
        Ok(Self { root })
    }

    pub fn root(&self) -> &HuffNode {
        &self.root
    }

    /// Sum of all leaf weights.
    pub fn weight(&self) -> u64 {
        self.root.weight()
    }

    pub fn leaf_count(&self) -> usize {
        fn count(node: &HuffNode) -> usize {
            match node {
                HuffNode::Leaf { .. } => 1,
                HuffNode::Internal { left, right, .. } => count(left) + count(right),
            }
        }
        count(&self.root)
    }

    /// Length of the longest root-to-leaf path. A bare leaf has depth 0.
    pub fn depth(&self) -> usize {
        fn depth(node: &HuffNode) -> usize {
            match node {
                HuffNode::Leaf { .. } => 0,
                HuffNode::Internal { left, right, .. } => 1 + depth(left).max(depth(right)),
            }
        }
        depth(&self.root)
    }

    /// Recover the frequencies stored in the leaves.
    pub fn frequencies(&self) -> FrequencyMap {
        let mut leaves = Vec::new();
        collect_leaves(&self.root, &mut leaves);
        leaves.into_iter().collect()
    }
}

fn collect_leaves(node: &HuffNode, out: &mut Vec<(u8, u64)>) {
    match node {
        HuffNode::Leaf { symbol, weight } => out.push((*symbol, *weight)),
        HuffNode::Internal { left, right, .. } => {
            collect_leaves(left, out);
            collect_leaves(right, out);
        }
    }
}

impl fmt::Display for HuffmanTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn write_node(
            f: &mut fmt::Formatter<'_>,
            node: &HuffNode,
            depth: usize,
            label: &str,
        ) -> fmt::Result {
            let indent = "  ".repeat(depth);
            match node {
                HuffNode::Leaf { symbol, weight } => writeln!(
                    f,
                    "{}{} -> leaf {:?} ({}) [weight: {}]",
                    indent, label, *symbol as char, symbol, weight
                ),
                HuffNode::Internal {
                    weight,
                    left,
                    right,
                } => {
                    writeln!(f, "{}{} -> internal [weight: {}]", indent, label, weight)?;
                    write_node(f, left, depth + 1, "0")?;
                    write_node(f, right, depth + 1, "1")
                }
            }
        }
        write_node(f, &self.root, 0, "root")
    }
}
