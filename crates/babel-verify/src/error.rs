//! Error types for running external verification tools.
//!
//! These stay inside the crate's adapters: callers of
//! [`crate::VerificationAdapter::submit`] always receive a report.

/// Errors that can occur while invoking a tool.
#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    /// The tool could not be started.
    #[error("failed to start '{program}': {source}")]
    Spawn {
        /// Program that was invoked.
        program: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// I/O error staging the artifact or waiting on the tool.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl VerifyError {
    /// Whether the tool is simply not installed.
    pub fn is_not_found(&self) -> bool {
        matches!(self, VerifyError::Spawn { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}

/// Result type for tool invocation.
pub type Result<T> = std::result::Result<T, VerifyError>;
