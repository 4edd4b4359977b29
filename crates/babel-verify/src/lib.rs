//! External verification of emitted CPU cores.
//!
//! Verification is an opaque, possibly unavailable service. Every call is
//! bounded by a timeout, independently cancellable through a
//! [`CancelToken`], and degrades to a [`VerificationReport`] status instead
//! of an error, so a failed check never aborts generation or sibling
//! requests in a batch.

pub mod adapter;
pub mod cancel;
pub mod error;
pub mod report;
pub mod tool;

pub use adapter::{SkipVerification, ToolAdapter, VerificationAdapter};
pub use cancel::CancelToken;
pub use error::{Result, VerifyError};
pub use report::{VerificationReport, VerificationStatus};
pub use tool::{find_on_path, parse_cell_count, run_bounded, ToolCommand, ToolOutcome};
