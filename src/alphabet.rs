//! Bijection from the bytes present in an input to `{0,...,sigma-1}`, built
//! once from a frequency pass and immutable afterwards. A synthetic
//! terminator (numbered `sigma`, strictly greater than every mapped byte)
//! is reserved by `DynamicBwt`, not stored here.

use crate::Error;

pub struct Alphabet {
    byte_to_symbol: [Option<u16>; 256],
    symbol_to_byte: Vec<u8>,
}

impl Alphabet {
    /// Number of distinct bytes observed (not counting the terminator).
    pub fn sigma(&self) -> usize {
        self.symbol_to_byte.len()
    }

    pub fn symbol_of(&self, byte: u8) -> usize {
        self.byte_to_symbol[byte as usize]
            .expect("byte absent from the alphabet built in the frequency pass") as usize
    }

    pub fn byte_of(&self, symbol: usize) -> u8 {
        self.symbol_to_byte[symbol]
    }

    /// Build the remap from a 256-entry byte histogram. Errors if the input
    /// was empty (all frequencies zero) or if all 256 byte values occur (no
    /// numeric slot would be left for a terminator strictly greater than
    /// every mapped symbol).
    pub fn from_frequencies(freq: &[u64; 256]) -> Result<(Self, Vec<u64>), Error> {
        if freq.iter().all(|&f| f == 0) {
            return Err(Error::InputEmpty);
        }
        let mut byte_to_symbol = [None; 256];
        let mut symbol_to_byte = Vec::new();
        let mut out_freq = Vec::new();
        for (b, &f) in freq.iter().enumerate() {
            if f > 0 {
                let symbol = symbol_to_byte.len();
                byte_to_symbol[b] = Some(symbol as u16);
                symbol_to_byte.push(b as u8);
                out_freq.push(f);
            }
        }
        if symbol_to_byte.len() > 255 {
            return Err(Error::AlphabetTooLarge);
        }
        Ok((
            Self {
                byte_to_symbol,
                symbol_to_byte,
            },
            out_freq,
        ))
    }
}
