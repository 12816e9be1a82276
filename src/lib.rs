//! # bwtlz77
//!
//! LZ77 phrase counting driven by a dynamic, zero-order compressed
//! Burrows-Wheeler Transform.
//!
//! * `bitvector` is the succinct/dynamic bit-vector pair (`StaticBitVector`
//!   rank in O(1), `DynamicBitVector` insert/rank/access in O(log n)) that
//!   everything else is built on.
//! * `huffman` shapes the alphabet into a prefix-free code; `dynamic_string`
//!   uses that shape to assemble a growable wavelet-tree-like sequence from
//!   one `DynamicBitVector` per internal Huffman node.
//! * `bwt` is the online BWT itself: `extend` grows the indexed text,
//!   `bs` performs one backward-search step.
//! * `lz77` is the factorization driver that walks an input through `bwt`
//!   and counts (and optionally records) phrases, in the `v1`/`v2` variants.
//!
//! ## Example
//!
//! ```rs
//! use bwtlz77::*;
//! let mut in_file = std::fs::File::open("some_input_path").expect("open failed");
//! let reader = io::FileByteReader::new(in_file).expect("read failed");
//! ```

pub mod alphabet;
pub mod bitvector;
pub mod bwt;
pub mod dynamic_string;
pub mod huffman;
pub mod io;
pub mod lz77;
mod word_vector;

/// Crate errors.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("input is empty")]
    InputEmpty,
    #[error("alphabet too large (more than 255 distinct bytes)")]
    AlphabetTooLarge,
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed option: {0}")]
    MalformedOption(String),
}
