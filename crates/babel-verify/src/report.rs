//! Verification report.

use std::fmt;

/// Outcome of one verification request.
///
/// None of these abort generation; they are reported alongside the artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationStatus {
    /// The tool accepted the artifact.
    Passed,
    /// The tool ran and rejected the artifact.
    Failed,
    /// The tool could not be located or started.
    Unavailable,
    /// The tool exceeded its time bound and was killed.
    TimedOut,
    /// The request was cancelled before the tool finished.
    Cancelled,
    /// Verification was disabled.
    Skipped,
}

impl VerificationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            VerificationStatus::Passed => "passed",
            VerificationStatus::Failed => "failed",
            VerificationStatus::Unavailable => "unavailable",
            VerificationStatus::TimedOut => "timed out",
            VerificationStatus::Cancelled => "cancelled",
            VerificationStatus::Skipped => "skipped",
        }
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of submitting an artifact to a verification adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationReport {
    pub status: VerificationStatus,
    /// True only when the tool ran and accepted the text.
    pub syntax_ok: bool,
    /// Cell count from synthesis, when the tool supports it.
    pub gate_estimate: Option<u64>,
    pub diagnostics: String,
    pub duration_ms: u64,
}

impl VerificationReport {
    /// Report for a request that did not pass, with no gate estimate.
    pub fn not_passed(status: VerificationStatus, diagnostics: impl Into<String>) -> Self {
        Self {
            status,
            syntax_ok: false,
            gate_estimate: None,
            diagnostics: diagnostics.into(),
            duration_ms: 0,
        }
    }

    pub fn skipped(reason: impl Into<String>) -> Self {
        Self::not_passed(VerificationStatus::Skipped, reason)
    }

    pub fn passed(&self) -> bool {
        self.status == VerificationStatus::Passed
    }

    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }
}

impl fmt::Display for VerificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "verification {}", self.status)?;
        if self.duration_ms > 0 {
            write!(f, " in {} ms", self.duration_ms)?;
        }
        if let Some(gates) = self.gate_estimate {
            write!(f, ", ~{gates} cells")?;
        }
        let diagnostics = self.diagnostics.trim();
        if !diagnostics.is_empty() {
            writeln!(f)?;
            for line in diagnostics.lines() {
                writeln!(f, "  {line}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skipped_report_is_not_a_pass() {
        let report = VerificationReport::skipped("disabled in babel.toml");
        assert_eq!(report.status, VerificationStatus::Skipped);
        assert!(!report.passed());
        assert!(!report.syntax_ok);
        assert_eq!(
            report.to_string(),
            "verification skipped\n  disabled in babel.toml\n"
        );
    }

    #[test]
    fn display_includes_gate_estimate() {
        let report = VerificationReport {
            status: VerificationStatus::Passed,
            syntax_ok: true,
            gate_estimate: Some(1234),
            diagnostics: String::new(),
            duration_ms: 87,
        };
        assert_eq!(report.to_string(), "verification passed in 87 ms, ~1234 cells");
    }
}
