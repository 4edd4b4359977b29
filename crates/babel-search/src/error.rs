//! Error types for lexicon loading.

use std::path::PathBuf;

/// Errors that can occur while loading a lexicon.
///
/// Query-time lookups never fail: unknown words are ignored.
#[derive(Debug, thiserror::Error)]
pub enum LexiconError {
    /// TOML deserialization error, including out-of-domain values and
    /// unknown field names.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// I/O error reading a lexicon file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Lexicon file not found.
    #[error("lexicon file not found: {}", path.display())]
    NotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// A word maps to no preferences at all.
    #[error("lexicon word '{word}' has no preferences")]
    EmptyEntry {
        /// The offending word.
        word: String,
    },
}

/// Result type for lexicon operations.
pub type Result<T> = std::result::Result<T, LexiconError>;
