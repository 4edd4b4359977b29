//! Content-addressed hashing for parameter sets.
//!
//! A parameter set is serialized to canonical JSON and hashed with SHA-256.
//! The first four bytes of that digest, as hex, form the [`Fingerprint`]
//! used to name emitted artifacts.

use std::fmt;

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::Result;

/// A 32-byte SHA-256 content hash.
pub type ContentHash = [u8; 32];

/// Number of digest bytes kept in a fingerprint.
const FINGERPRINT_BYTES: usize = 4;

/// Compute the SHA-256 content hash of any serializable value.
pub fn content_hash<T: Serialize>(value: &T) -> Result<ContentHash> {
    let json = serde_json::to_vec(value)?;
    let mut hasher = Sha256::new();
    hasher.update(&json);
    Ok(hasher.finalize().into())
}

/// Format a content hash (or any byte slice) as a lowercase hex string.
pub fn hash_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Short content-addressable identifier for a parameter set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Fingerprint of any serializable value.
    pub fn of<T: Serialize>(value: &T) -> Result<Self> {
        let hash = content_hash(value)?;
        Ok(Self(hash_hex(&hash[..FINGERPRINT_BYTES])))
    }

    /// The fingerprint as hex text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{
        AddressingModes, DecoderType, ExecUnits, MemoryInterface, NumRegs, ParameterSet,
        PipelineDepth,
    };

    fn params(decoder: DecoderType) -> ParameterSet {
        ParameterSet::new(
            NumRegs::Eight,
            decoder,
            PipelineDepth::Three,
            AddressingModes::all(),
            ExecUnits::SeparateAguAlu,
            MemoryInterface::Simple,
        )
    }

    #[test]
    fn fingerprint_is_eight_hex_chars() {
        let fp = Fingerprint::of(&params(DecoderType::Microcoded)).unwrap();
        assert_eq!(fp.as_str().len(), 8);
        assert!(fp.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn fingerprint_tracks_content() {
        let a = Fingerprint::of(&params(DecoderType::Microcoded)).unwrap();
        let b = Fingerprint::of(&params(DecoderType::Microcoded)).unwrap();
        let c = Fingerprint::of(&params(DecoderType::Hardwired)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn fingerprint_is_hash_prefix() {
        let p = params(DecoderType::Hardwired);
        let full = hash_hex(&content_hash(&p).unwrap());
        assert_eq!(full.len(), 64);
        assert!(full.starts_with(Fingerprint::of(&p).unwrap().as_str()));
        assert_eq!(hash_hex(&[0x00, 0xab, 0x7f]), "00ab7f");
    }
}
