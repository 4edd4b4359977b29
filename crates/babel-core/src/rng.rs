//! Counter-mode pseudo-random generator keyed by a SHA-256 digest.
//!
//! Output word `n` is the first eight bytes (little-endian) of
//! `SHA-256(key || n.to_le_bytes())`. The whole state is the key plus the
//! next counter value, so any draw can be replayed by position and no
//! process-level entropy is ever consulted.

use sha2::{Digest, Sha256};

/// Explicit-state deterministic generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterRng {
    key: [u8; 32],
    counter: u64,
}

impl CounterRng {
    /// Generator keyed directly by a 32-byte key, starting at counter 0.
    pub fn from_key(key: [u8; 32]) -> Self {
        Self { key, counter: 0 }
    }

    /// Generator keyed by the SHA-256 digest of `seed`.
    pub fn from_seed(seed: &[u8]) -> Self {
        Self::from_key(Sha256::digest(seed).into())
    }

    /// Counter value the next draw will consume.
    pub fn counter(&self) -> u64 {
        self.counter
    }

    /// Output word at an arbitrary position, without advancing.
    pub fn word_at(&self, counter: u64) -> u64 {
        let mut hasher = Sha256::new();
        hasher.update(self.key);
        hasher.update(counter.to_le_bytes());
        let block = hasher.finalize();
        let mut word = [0u8; 8];
        word.copy_from_slice(&block[..8]);
        u64::from_le_bytes(word)
    }

    /// Next output word.
    pub fn next_u64(&mut self) -> u64 {
        let word = self.word_at(self.counter);
        self.counter = self.counter.wrapping_add(1);
        word
    }

    /// Uniform-ish index in `0..bound` by reduction modulo `bound`.
    ///
    /// A zero bound is treated as one. Bias is below 2^-60 for the
    /// small domains drawn here.
    pub fn below(&mut self, bound: u64) -> u64 {
        self.next_u64() % bound.max(1)
    }
}
