//! Error types for parameter modelling and derivation.

/// Errors raised by the core model.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Seed is larger than the derivation bound accepted at process boundaries.
    #[error("seed is {len} bytes, exceeding the {max}-byte limit")]
    SeedTooLong {
        /// Length of the rejected seed in bytes.
        len: usize,
        /// Configured maximum.
        max: usize,
    },

    /// A value read from configuration is outside a parameter's domain.
    #[error("value '{value}' is outside the domain of {field}")]
    OutOfDomain {
        /// Parameter field name.
        field: &'static str,
        /// Offending value, rendered as text.
        value: String,
    },

    /// An addressing-mode set was constructed with no members.
    #[error("addressing mode set must contain at least one mode")]
    EmptyAddressingModes,

    /// Canonical serialization of a value failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
