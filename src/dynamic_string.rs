//! Huffman-shaped wavelet sequence: a growing sequence over `{0,...,sigma}`
//! supporting `access`, `rank`, `insert`, each `O(code length * log m)`.
//!
//! One `DynamicBitVector` is owned per internal Huffman node, recording for
//! each symbol routed through that node (in textual order) which child it
//! descended to. There is no parent pointer anywhere — traversal is always
//! top-down from the tree root, per the design note in `spec.md` section 9.

use crate::bitvector::DynamicBitVector;
use crate::huffman::{ChildRef, HuffmanTree};

pub struct DynamicString {
    tree: HuffmanTree,
    node_vectors: Vec<DynamicBitVector>,
    len: usize,
}

impl DynamicString {
    pub fn new(tree: HuffmanTree) -> Self {
        let node_vectors = (0..tree.internal_node_count())
            .map(|_| DynamicBitVector::new())
            .collect();
        Self {
            tree,
            node_vectors,
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn tree(&self) -> &HuffmanTree {
        &self.tree
    }

    /// Symbol stored at position `i`.
    pub fn access(&self, i: usize) -> usize {
        let mut node = self.tree.root();
        let mut i = i;
        loop {
            match node {
                ChildRef::Leaf(symbol) => return symbol,
                ChildRef::Internal(id) => {
                    let v = &self.node_vectors[id];
                    let b = v.access(i);
                    i = if b { v.rank1(i) } else { v.rank0(i) };
                    node = if b { self.tree.right(id) } else { self.tree.left(id) };
                }
            }
        }
    }

    /// Number of occurrences of `c` in `s[0..i)`.
    pub fn rank(&self, c: usize, i: usize) -> usize {
        let mut node = self.tree.root();
        let mut i = i;
        for b in self.tree.code(c).iter() {
            match node {
                ChildRef::Leaf(_) => break,
                ChildRef::Internal(id) => {
                    let v = &self.node_vectors[id];
                    i = if b { v.rank1(i) } else { v.rank0(i) };
                    node = if b { self.tree.right(id) } else { self.tree.left(id) };
                }
            }
        }
        i
    }

    /// Insert symbol `c` at position `i`.
    pub fn insert(&mut self, i: usize, c: usize) {
        let code = self.tree.code(c).clone();
        Self::insert_rec(&self.tree, &mut self.node_vectors, self.tree.root(), &code, 0, i);
        self.len += 1;
    }

    /// Replace whatever symbol occupies position `i` with `new_symbol`,
    /// length unchanged. Used by `DynamicBwt::extend` to relocate the
    /// terminator: the symbol previously at `i` is walked off bit by bit
    /// (mirroring `access`, so the caller doesn't need to know what it was),
    /// then `new_symbol`'s code is inserted at the same position.
    pub fn replace(&mut self, i: usize, new_symbol: usize) {
        Self::remove_at(&self.tree, &mut self.node_vectors, self.tree.root(), i);
        let code = self.tree.code(new_symbol).clone();
        Self::insert_rec(&self.tree, &mut self.node_vectors, self.tree.root(), &code, 0, i);
    }

    /// `new_i` is computed at the same index `i` the bit was just inserted
    /// at, not `i + 1`: `rank_b(i)` on the now-mutated vector only counts
    /// positions strictly before `i`, so it already excludes the bit we just
    /// placed there and lines up with what `access`/`remove_at` compute for
    /// that same global position.
    fn insert_rec(
        tree: &HuffmanTree,
        vectors: &mut [DynamicBitVector],
        node: ChildRef,
        code: &bit_vec::BitVec,
        depth: usize,
        i: usize,
    ) {
        if let ChildRef::Internal(id) = node {
            let b = code.get(depth).expect("code length matches tree depth");
            vectors[id].insert(i, b);
            let new_i = if b {
                vectors[id].rank1(i)
            } else {
                vectors[id].rank0(i)
            };
            let child = if b { tree.right(id) } else { tree.left(id) };
            Self::insert_rec(tree, vectors, child, code, depth + 1, new_i);
        }
    }

    fn remove_at(tree: &HuffmanTree, vectors: &mut [DynamicBitVector], node: ChildRef, i: usize) {
        if let ChildRef::Internal(id) = node {
            let b = vectors[id].access(i);
            let child_i = if b { vectors[id].rank1(i) } else { vectors[id].rank0(i) };
            vectors[id].remove(i);
            let child = if b { tree.right(id) } else { tree.left(id) };
            Self::remove_at(tree, vectors, child, child_i);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::huffman::HuffmanTree;

    fn build(freqs: &[u64]) -> DynamicString {
        DynamicString::new(HuffmanTree::build(freqs).unwrap())
    }

    #[test]
    fn access_round_trips_insertions() {
        let mut ds = build(&[3, 5, 2]); // symbols 0,1,2 + terminator symbol 3
        let seq = [1usize, 0, 2, 1, 3, 0, 1, 2, 2, 1];
        for (pos, &c) in seq.iter().enumerate() {
            ds.insert(pos, c);
        }
        assert_eq!(ds.len(), seq.len());
        for (pos, &c) in seq.iter().enumerate() {
            assert_eq!(ds.access(pos), c);
        }
    }

    #[test]
    fn rank_matches_linear_scan_at_every_prefix() {
        let mut ds = build(&[4, 1, 6, 2]);
        let seq = [0usize, 2, 2, 1, 3, 0, 2, 4, 0, 2, 1];
        for (pos, &c) in seq.iter().enumerate() {
            ds.insert(pos, c);
            for symbol in 0..=4 {
                let expected = seq[..=pos].iter().filter(|&&x| x == symbol).count();
                assert_eq!(ds.rank(symbol, pos + 1), expected, "symbol {symbol} at pos {pos}");
            }
        }
    }

    #[test]
    fn child_vector_lengths_sum_to_parent() {
        let mut ds = build(&[7, 3, 9, 1, 4]);
        let seq = [0usize, 4, 2, 1, 5, 3, 0, 2, 2, 4, 5, 1];
        for (pos, &c) in seq.iter().enumerate() {
            ds.insert(pos, c);
        }
        for id in 0..ds.tree.internal_node_count() {
            let v = &ds.node_vectors[id];
            assert_eq!(v.rank0(v.len()) + v.rank1(v.len()), v.len());
        }
    }

    #[test]
    fn single_symbol_alphabet_degenerates_cleanly() {
        let mut ds = build(&[9]); // only symbol 0 plus terminator 1
        ds.insert(0, 0);
        ds.insert(1, 1);
        ds.insert(2, 0);
        assert_eq!(ds.access(0), 0);
        assert_eq!(ds.access(1), 1);
        assert_eq!(ds.access(2), 0);
        assert_eq!(ds.rank(0, 3), 2);
        assert_eq!(ds.rank(1, 3), 1);
    }

    #[test]
    fn replace_swaps_one_symbol_leaving_length_unchanged() {
        let mut ds = build(&[4, 1, 6, 2]);
        let seq = [0usize, 2, 2, 1, 3, 0, 2];
        for (pos, &c) in seq.iter().enumerate() {
            ds.insert(pos, c);
        }
        let before_len = ds.len();
        ds.replace(3, 4); // was symbol 1, becomes the terminator (symbol 4)
        assert_eq!(ds.len(), before_len);
        let expected = [0usize, 2, 2, 4, 3, 0, 2];
        for (pos, &c) in expected.iter().enumerate() {
            assert_eq!(ds.access(pos), c, "access mismatch at {pos} after replace");
        }
        for symbol in 0..=4 {
            let count = expected.iter().filter(|&&x| x == symbol).count();
            assert_eq!(ds.rank(symbol, expected.len()), count, "rank mismatch for symbol {symbol}");
        }
    }
}
