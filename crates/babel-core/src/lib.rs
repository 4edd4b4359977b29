//! Parameter model and deterministic seed derivation for Babel CPU cores.
//!
//! Every seed string names exactly one core. The seed bytes are hashed with
//! SHA-256, the digest keys a counter-mode generator, and six parameters are
//! drawn from it in a fixed order:
//!
//! 1. register count
//! 2. decoder type
//! 3. pipeline depth
//! 4. addressing-mode subset (tiered on the register count)
//! 5. execution-unit style
//! 6. memory interface
//!
//! The result is an immutable [`ParameterSet`].

pub mod derive;
pub mod error;
pub mod hash;
pub mod params;
pub mod rng;

pub use derive::{derive, derive_traced, validate_seed, DrawRecord, DrawStep, MAX_SEED_BYTES};
pub use error::{CoreError, Result};
pub use hash::{content_hash, hash_hex, ContentHash, Fingerprint};
pub use params::{
    AddressingMode, AddressingModes, DecoderType, ExecUnits, MemoryInterface, NumRegs,
    ParamField, ParameterSet, PipelineDepth, REGISTER_NAMES,
};
pub use rng::CounterRng;
