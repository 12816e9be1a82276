//! Mutable bit-vector with O(log m) `access`, `rank1`, `insert`, `remove`.
//!
//! Represented as an arena-indexed AVL tree, in the same no-parent-pointer,
//! index-instead-of-`Rc`-cycle style the teacher uses for the LZSS match
//! index (`lzss_huff::LZSS` walks a node pool addressed by `usize` cursor
//! positions rather than owning pointers). Each leaf owns a small packed
//! bit-segment with its own popcount; internal nodes cache subtree bit
//! count and one-count so `access`/`rank1`/`insert`/`remove` can all descend
//! without revisiting a child once its summary is known. `remove` is the
//! mirror image of `insert` (`DynamicString::replace` uses the pair to
//! relocate the BWT's terminator) and never splits or merges a leaf.

use super::static_bv::popcount_range;

/// Bound on a leaf's bit count before it splits. The spec calls for
/// `Theta(log^2 m)`; for the text sizes this tool targets a fixed constant
/// approximating that bound keeps the leaf-local shifting work cheap while
/// still bounding tree height via the number of leaves.
const LEAF_CAPACITY: usize = 512;

enum NodeData {
    Leaf {
        words: Vec<u64>,
        len: usize,
        ones: usize,
    },
    Internal {
        left: usize,
        right: usize,
    },
}

struct Node {
    data: NodeData,
    len: usize,
    ones: usize,
    height: i32,
}

/// Mutable sequence of bits supporting `access`, `rank1`, `insert` in
/// `O(log m)` worst case.
pub struct DynamicBitVector {
    nodes: Vec<Node>,
    root: usize,
}

fn get_bit(words: &[u64], i: usize) -> bool {
    let w = i / 64;
    if w >= words.len() {
        return false;
    }
    (words[w] >> (i % 64)) & 1 == 1
}

fn set_bit(words: &mut [u64], i: usize, v: bool) {
    let w = i / 64;
    if v {
        words[w] |= 1u64 << (i % 64);
    } else {
        words[w] &= !(1u64 << (i % 64));
    }
}

fn insert_bit(words: &mut Vec<u64>, len: usize, i: usize, v: bool) {
    let new_len = len + 1;
    let need_words = (new_len + 63) / 64;
    while words.len() < need_words {
        words.push(0);
    }
    for pos in (i..len).rev() {
        let b = get_bit(words, pos);
        set_bit(words, pos + 1, b);
    }
    set_bit(words, i, v);
}

fn remove_bit(words: &mut [u64], len: usize, i: usize) {
    for pos in i..len - 1 {
        let b = get_bit(words, pos + 1);
        set_bit(words, pos, b);
    }
}

fn extract_range(words: &[u64], lo: usize, hi: usize) -> (Vec<u64>, usize, usize) {
    let len = hi - lo;
    let mut out = vec![0u64; (len + 63) / 64];
    for (j, pos) in (lo..hi).enumerate() {
        if get_bit(words, pos) {
            set_bit(&mut out, j, true);
        }
    }
    let ones = popcount_range(&out, 0, len);
    (out, len, ones)
}

impl DynamicBitVector {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                data: NodeData::Leaf {
                    words: Vec::new(),
                    len: 0,
                    ones: 0,
                },
                len: 0,
                ones: 0,
                height: 0,
            }],
            root: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes[self.root].len
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total number of 1-bits.
    pub fn ones(&self) -> usize {
        self.nodes[self.root].ones
    }

    pub fn access(&self, i: usize) -> bool {
        debug_assert!(i < self.len());
        Self::access_rec(&self.nodes, self.root, i)
    }

    /// Number of 1-bits in `[0, i)`.
    pub fn rank1(&self, i: usize) -> usize {
        debug_assert!(i <= self.len());
        Self::rank1_rec(&self.nodes, self.root, i)
    }

    pub fn rank0(&self, i: usize) -> usize {
        i - self.rank1(i)
    }

    /// Insert bit `v` at position `i`, `i` in `0..=len()`.
    pub fn insert(&mut self, i: usize, v: bool) {
        debug_assert!(i <= self.len());
        self.root = Self::insert_rec(&mut self.nodes, self.root, i, v);
    }

    /// Remove the bit at position `i`, `i` in `0..len()`, returning its value.
    pub fn remove(&mut self, i: usize) -> bool {
        debug_assert!(i < self.len());
        let (new_root, bit) = Self::remove_rec(&mut self.nodes, self.root, i);
        self.root = new_root;
        bit
    }

    fn access_rec(nodes: &[Node], id: usize, i: usize) -> bool {
        match &nodes[id].data {
            NodeData::Leaf { words, .. } => get_bit(words, i),
            NodeData::Internal { left, right } => {
                let ll = nodes[*left].len;
                if i < ll {
                    Self::access_rec(nodes, *left, i)
                } else {
                    Self::access_rec(nodes, *right, i - ll)
                }
            }
        }
    }

    fn rank1_rec(nodes: &[Node], id: usize, i: usize) -> usize {
        match &nodes[id].data {
            NodeData::Leaf { words, len, .. } => popcount_range(words, 0, i.min(*len)),
            NodeData::Internal { left, right } => {
                let ll = nodes[*left].len;
                if i < ll {
                    Self::rank1_rec(nodes, *left, i)
                } else {
                    nodes[*left].ones + Self::rank1_rec(nodes, *right, i - ll)
                }
            }
        }
    }

    fn insert_rec(nodes: &mut Vec<Node>, id: usize, i: usize, v: bool) -> usize {
        let is_leaf = matches!(nodes[id].data, NodeData::Leaf { .. });
        if is_leaf {
            let overflow = if let NodeData::Leaf { words, len, ones } = &mut nodes[id].data {
                insert_bit(words, *len, i, v);
                *len += 1;
                *ones += v as usize;
                *len > LEAF_CAPACITY
            } else {
                unreachable!()
            };
            if overflow {
                let (words, len) = if let NodeData::Leaf { words, len, .. } = &nodes[id].data {
                    (words.clone(), *len)
                } else {
                    unreachable!()
                };
                let mid = len / 2;
                let (lw, ll, lo) = extract_range(&words, 0, mid);
                let (rw, rl, ro) = extract_range(&words, mid, len);
                let left_id = nodes.len();
                nodes.push(Node {
                    data: NodeData::Leaf {
                        words: lw,
                        len: ll,
                        ones: lo,
                    },
                    len: ll,
                    ones: lo,
                    height: 0,
                });
                let right_id = nodes.len();
                nodes.push(Node {
                    data: NodeData::Leaf {
                        words: rw,
                        len: rl,
                        ones: ro,
                    },
                    len: rl,
                    ones: ro,
                    height: 0,
                });
                nodes[id].data = NodeData::Internal {
                    left: left_id,
                    right: right_id,
                };
                nodes[id].len = ll + rl;
                nodes[id].ones = lo + ro;
                nodes[id].height = 1;
            } else if let NodeData::Leaf { len, ones, .. } = &nodes[id].data {
                nodes[id].len = *len;
                nodes[id].ones = *ones;
            }
            id
        } else {
            let (left, right) = match nodes[id].data {
                NodeData::Internal { left, right } => (left, right),
                _ => unreachable!(),
            };
            let left_len = nodes[left].len;
            if i < left_len {
                let new_left = Self::insert_rec(nodes, left, i, v);
                if let NodeData::Internal { left: l, .. } = &mut nodes[id].data {
                    *l = new_left;
                }
            } else {
                let new_right = Self::insert_rec(nodes, right, i - left_len, v);
                if let NodeData::Internal { right: r, .. } = &mut nodes[id].data {
                    *r = new_right;
                }
            }
            Self::update_summary(nodes, id);
            Self::balance(nodes, id)
        }
    }

    /// Remove the bit at `i`, returning the (possibly unchanged) subtree root
    /// and the removed bit's value. Mirrors `insert_rec`'s descent but never
    /// splits a node, since removal only shrinks leaves.
    fn remove_rec(nodes: &mut Vec<Node>, id: usize, i: usize) -> (usize, bool) {
        let is_leaf = matches!(nodes[id].data, NodeData::Leaf { .. });
        if is_leaf {
            let bit = if let NodeData::Leaf { words, len, ones } = &mut nodes[id].data {
                let b = get_bit(words, i);
                remove_bit(words, *len, i);
                *len -= 1;
                *ones -= b as usize;
                b
            } else {
                unreachable!()
            };
            if let NodeData::Leaf { len, ones, .. } = &nodes[id].data {
                nodes[id].len = *len;
                nodes[id].ones = *ones;
            }
            (id, bit)
        } else {
            let (left, right) = Self::children(nodes, id);
            let left_len = nodes[left].len;
            let bit;
            if i < left_len {
                let (new_left, b) = Self::remove_rec(nodes, left, i);
                bit = b;
                if let NodeData::Internal { left: l, .. } = &mut nodes[id].data {
                    *l = new_left;
                }
            } else {
                let (new_right, b) = Self::remove_rec(nodes, right, i - left_len);
                bit = b;
                if let NodeData::Internal { right: r, .. } = &mut nodes[id].data {
                    *r = new_right;
                }
            }
            Self::update_summary(nodes, id);
            (Self::balance(nodes, id), bit)
        }
    }

    fn children(nodes: &[Node], id: usize) -> (usize, usize) {
        match nodes[id].data {
            NodeData::Internal { left, right } => (left, right),
            _ => unreachable!("children() called on a leaf"),
        }
    }

    fn update_summary(nodes: &mut [Node], id: usize) {
        let (l, r) = Self::children(nodes, id);
        let (ll, lo, lh) = (nodes[l].len, nodes[l].ones, nodes[l].height);
        let (rl, ro, rh) = (nodes[r].len, nodes[r].ones, nodes[r].height);
        nodes[id].len = ll + rl;
        nodes[id].ones = lo + ro;
        nodes[id].height = 1 + lh.max(rh);
    }

    fn set_left(nodes: &mut [Node], id: usize, new_left: usize) {
        if let NodeData::Internal { left, .. } = &mut nodes[id].data {
            *left = new_left;
        }
        Self::update_summary(nodes, id);
    }

    fn set_right(nodes: &mut [Node], id: usize, new_right: usize) {
        if let NodeData::Internal { right, .. } = &mut nodes[id].data {
            *right = new_right;
        }
        Self::update_summary(nodes, id);
    }

    /// Rotate left about `id`; returns the new subtree root.
    fn rotate_left(nodes: &mut Vec<Node>, id: usize) -> usize {
        let (_, r) = Self::children(nodes, id);
        let (rl, _rr) = Self::children(nodes, r);
        Self::set_right(nodes, id, rl);
        Self::set_left(nodes, r, id);
        r
    }

    /// Rotate right about `id`; returns the new subtree root.
    fn rotate_right(nodes: &mut Vec<Node>, id: usize) -> usize {
        let (l, _) = Self::children(nodes, id);
        let (_ll, lr) = Self::children(nodes, l);
        Self::set_left(nodes, id, lr);
        Self::set_right(nodes, l, id);
        l
    }

    fn balance(nodes: &mut Vec<Node>, id: usize) -> usize {
        let (l, r) = Self::children(nodes, id);
        let bf = nodes[l].height - nodes[r].height;
        if bf > 1 {
            let (ll, lr) = Self::children(nodes, l);
            if nodes[ll].height < nodes[lr].height {
                let new_l = Self::rotate_left(nodes, l);
                Self::set_left(nodes, id, new_l);
            }
            Self::rotate_right(nodes, id)
        } else if bf < -1 {
            let (rl, rr) = Self::children(nodes, r);
            if nodes[rr].height < nodes[rl].height {
                let new_r = Self::rotate_right(nodes, r);
                Self::set_right(nodes, id, new_r);
            }
            Self::rotate_left(nodes, id)
        } else {
            id
        }
    }
}

impl Default for DynamicBitVector {
    fn default() -> Self {
        Self::new()
    }
}
