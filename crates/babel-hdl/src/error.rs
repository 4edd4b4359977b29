//! Emission errors.

use babel_core::CoreError;
use thiserror::Error;

/// Errors that can occur while emitting a design.
///
/// All of these indicate a template defect: a parameter set drawn from the
/// declared domains always maps to a well-formed design.
#[derive(Debug, Error)]
pub enum EmissionError {
    #[error("module '{name}' is declared more than once")]
    DuplicateModule { name: String },

    #[error("top-level module '{name}' is not declared")]
    MissingTop { name: String },

    #[error("expected exactly one top-level block, found {found}: {names:?}")]
    TopLevelCount { found: usize, names: Vec<String> },

    #[error("sub-block '{module}' instantiated {count} time(s), expected exactly once")]
    InstanceCount { module: String, count: usize },

    #[error("instance '{instance}' references undeclared module '{module}'")]
    UnknownModule { instance: String, module: String },

    #[error("instance '{instance}' binds port '{port}' which '{module}' does not declare")]
    UnknownPort {
        instance: String,
        module: String,
        port: String,
    },

    #[error("unbalanced structure at line {line}: {detail}")]
    Unbalanced { line: usize, detail: String },

    #[error("fingerprint failed: {0}")]
    Fingerprint(#[from] CoreError),
}

/// Result type for emission.
pub type Result<T> = std::result::Result<T, EmissionError>;
