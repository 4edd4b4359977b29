//! Verification adapters.
//!
//! An adapter takes emitted text and always returns a report. A missing
//! tool, a rejection, a timeout or a cancellation are statuses, never
//! errors, so generation output survives whatever the checker does.

use std::io::Write;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::cancel::CancelToken;
use crate::error::Result;
use crate::report::{VerificationReport, VerificationStatus};
use crate::tool::{find_on_path, parse_cell_count, run_bounded, ToolCommand, ToolOutcome};

/// Checks emitted hardware-description text.
pub trait VerificationAdapter: Send + Sync {
    /// Short name used in reports and logs.
    fn name(&self) -> &str;

    /// Check `text`. Must return promptly once `cancel` fires.
    fn submit(&self, text: &str, cancel: &CancelToken) -> VerificationReport;
}

/// Adapter used when verification is disabled.
#[derive(Debug, Clone, Default)]
pub struct SkipVerification {
    reason: String,
}

impl SkipVerification {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl VerificationAdapter for SkipVerification {
    fn name(&self) -> &str {
        "skip"
    }

    fn submit(&self, _text: &str, _cancel: &CancelToken) -> VerificationReport {
        VerificationReport::skipped(self.reason.clone())
    }
}

/// Adapter that stages the text in a temporary `.v` file and runs an
/// external checker on it, optionally followed by a synthesis pass whose
/// `stat` output yields a gate estimate.
#[derive(Debug, Clone)]
pub struct ToolAdapter {
    check: ToolCommand,
    synthesis: Option<ToolCommand>,
    top: String,
    timeout: Duration,
}

impl ToolAdapter {
    pub fn new(check: ToolCommand, top: impl Into<String>, timeout: Duration) -> Self {
        Self {
            check,
            synthesis: None,
            top: top.into(),
            timeout,
        }
    }

    /// Yosys parse and hierarchy check, plus `synth; stat` when
    /// `estimate_gates` is set. The hierarchy pass rejects references to
    /// undeclared modules.
    pub fn yosys(top: impl Into<String>, timeout: Duration, estimate_gates: bool) -> Self {
        let adapter = Self::new(
            ToolCommand::new("yosys", ["-q", "-p", "read_verilog {file}; hierarchy -check -top {top}"]),
            top,
            timeout,
        );
        if estimate_gates {
            adapter.with_synthesis(ToolCommand::new(
                "yosys",
                ["-p", "read_verilog {file}; synth -top {top}; stat"],
            ))
        } else {
            adapter
        }
    }

    pub fn with_synthesis(mut self, synthesis: ToolCommand) -> Self {
        self.synthesis = Some(synthesis);
        self
    }

    pub fn program(&self) -> &str {
        &self.check.program
    }

    /// Whether the checker can be found on `PATH`.
    pub fn is_available(&self) -> bool {
        find_on_path(&self.check.program).is_some()
    }

    fn run(&self, text: &str, cancel: &CancelToken, start: Instant) -> Result<VerificationReport> {
        let mut staged = tempfile::Builder::new()
            .prefix("babel_")
            .suffix(".v")
            .tempfile()?;
        staged.write_all(text.as_bytes())?;
        staged.flush()?;
        let path = staged.path();

        let args = self.check.render_args(path, &self.top);
        let outcome = run_bounded(&self.check.program, &args, self.timeout, cancel)?;
        let mut report = match outcome {
            ToolOutcome::Exited { success: true, .. } => VerificationReport {
                status: VerificationStatus::Passed,
                syntax_ok: true,
                gate_estimate: None,
                diagnostics: String::new(),
                duration_ms: 0,
            },
            ToolOutcome::Exited {
                success: false,
                code,
                stdout,
                stderr,
            } => {
                let mut diagnostics = combine(&stdout, &stderr);
                if diagnostics.is_empty() {
                    diagnostics = format!("{} exited with status {code:?}", self.check.program);
                }
                return Ok(VerificationReport::not_passed(
                    VerificationStatus::Failed,
                    diagnostics,
                ));
            }
            ToolOutcome::TimedOut { stdout, stderr } => {
                let mut diagnostics = format!(
                    "{} did not finish within {} s",
                    self.check.program,
                    self.timeout.as_secs_f64()
                );
                let output = combine(&stdout, &stderr);
                if !output.is_empty() {
                    diagnostics.push('\n');
                    diagnostics.push_str(&output);
                }
                return Ok(VerificationReport::not_passed(
                    VerificationStatus::TimedOut,
                    diagnostics,
                ));
            }
            ToolOutcome::Cancelled => {
                return Ok(VerificationReport::not_passed(
                    VerificationStatus::Cancelled,
                    "verification cancelled",
                ));
            }
        };

        if let Some(synthesis) = &self.synthesis {
            let remaining = self.timeout.saturating_sub(start.elapsed());
            let args = synthesis.render_args(path, &self.top);
            match run_bounded(&synthesis.program, &args, remaining, cancel) {
                Ok(ToolOutcome::Exited {
                    success: true,
                    stdout,
                    ..
                }) => {
                    report.gate_estimate = parse_cell_count(&stdout);
                    if report.gate_estimate.is_none() {
                        report.diagnostics = "synthesis log had no cell count".into();
                    }
                }
                Ok(ToolOutcome::Exited { stdout, stderr, .. }) => {
                    report.diagnostics =
                        format!("synthesis failed; no gate estimate\n{}", combine(&stdout, &stderr));
                }
                Ok(ToolOutcome::TimedOut { .. }) => {
                    report.diagnostics = "synthesis timed out; no gate estimate".into();
                }
                Ok(ToolOutcome::Cancelled) => {
                    report.diagnostics = "synthesis cancelled; no gate estimate".into();
                }
                Err(e) => report.diagnostics = format!("synthesis not run: {e}"),
            }
        }
        Ok(report)
    }
}

impl VerificationAdapter for ToolAdapter {
    fn name(&self) -> &str {
        &self.check.program
    }

    fn submit(&self, text: &str, cancel: &CancelToken) -> VerificationReport {
        let start = Instant::now();
        let report = match self.run(text, cancel, start) {
            Ok(report) => report,
            Err(e) if e.is_not_found() => VerificationReport::not_passed(
                VerificationStatus::Unavailable,
                format!("{} not found on PATH", self.check.program),
            ),
            Err(e) => VerificationReport::not_passed(VerificationStatus::Unavailable, e.to_string()),
        };
        let report = report.with_duration_ms(start.elapsed().as_millis() as u64);
        if report.passed() {
            info!(tool = self.name(), gates = ?report.gate_estimate, "verification passed");
        } else {
            debug!(tool = self.name(), status = %report.status, "verification did not pass");
        }
        report
    }
}

fn combine(stdout: &str, stderr: &str) -> String {
    [stderr.trim(), stdout.trim()]
        .iter()
        .filter(|s| !s.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn shell(script: &str) -> ToolCommand {
        ToolCommand::new("sh", ["-c", script])
    }

    #[test]
    fn skip_reports_skipped() {
        let adapter = SkipVerification::new("disabled");
        let report = adapter.submit("module m; endmodule", &CancelToken::new());
        assert_eq!(report.status, VerificationStatus::Skipped);
        assert_eq!(report.diagnostics, "disabled");
    }

    #[test]
    fn yosys_checks_hierarchy_of_top() {
        let adapter = ToolAdapter::yosys("micro_x86_core", Duration::from_secs(1), false);
        assert!(adapter.synthesis.is_none());
        let args = adapter.check.render_args(Path::new("/tmp/core.v"), &adapter.top);
        assert_eq!(
            args,
            vec![
                "-q",
                "-p",
                "read_verilog /tmp/core.v; hierarchy -check -top micro_x86_core"
            ]
        );
    }

    #[test]
    fn missing_tool_is_unavailable() {
        let adapter = ToolAdapter::new(
            ToolCommand::new("babel-definitely-not-a-real-tool", ["{file}"]),
            "top",
            Duration::from_secs(1),
        );
        assert!(!adapter.is_available());
        let report = adapter.submit("module m; endmodule", &CancelToken::new());
        assert_eq!(report.status, VerificationStatus::Unavailable);
        assert!(report.diagnostics.contains("not found on PATH"));
        assert!(!report.syntax_ok);
    }

    #[cfg(unix)]
    #[test]
    fn passes_when_tool_accepts() {
        let adapter = ToolAdapter::new(shell("grep -q endmodule {file}"), "top", Duration::from_secs(5));
        let report = adapter.submit("module m;\nendmodule\n", &CancelToken::new());
        assert_eq!(report.status, VerificationStatus::Passed);
        assert!(report.syntax_ok);
        assert_eq!(report.gate_estimate, None);
    }

    #[cfg(unix)]
    #[test]
    fn failure_carries_diagnostics() {
        let adapter = ToolAdapter::new(
            shell("echo 'ERROR: syntax error in {top}' >&2; exit 1"),
            "micro_x86_core",
            Duration::from_secs(5),
        );
        let report = adapter.submit("garbage", &CancelToken::new());
        assert_eq!(report.status, VerificationStatus::Failed);
        assert!(!report.syntax_ok);
        assert_eq!(report.diagnostics, "ERROR: syntax error in micro_x86_core");
    }

    #[cfg(unix)]
    #[test]
    fn synthesis_pass_estimates_gates() {
        let adapter = ToolAdapter::new(shell("test -s {file}"), "top", Duration::from_secs(5))
            .with_synthesis(shell("echo '   Number of cells:   321'"));
        let report = adapter.submit("module m; endmodule", &CancelToken::new());
        assert!(report.passed());
        assert_eq!(report.gate_estimate, Some(321));
    }

    #[cfg(unix)]
    #[test]
    fn failed_synthesis_keeps_syntax_pass() {
        let adapter = ToolAdapter::new(shell("true"), "top", Duration::from_secs(5))
            .with_synthesis(shell("exit 1"));
        let report = adapter.submit("module m; endmodule", &CancelToken::new());
        assert!(report.passed());
        assert_eq!(report.gate_estimate, None);
        assert!(report.diagnostics.starts_with("synthesis failed"));
    }

    #[cfg(unix)]
    #[test]
    fn timeout_is_reported() {
        let adapter = ToolAdapter::new(shell("exec sleep 5"), "top", Duration::from_millis(100));
        let report = adapter.submit("module m; endmodule", &CancelToken::new());
        assert_eq!(report.status, VerificationStatus::TimedOut);
        assert!(report.duration_ms < 4000);
    }

    #[test]
    fn cancelled_request_reports_cancelled() {
        let adapter = ToolAdapter::new(shell("true"), "top", Duration::from_secs(5));
        let token = CancelToken::new();
        token.cancel();
        let report = adapter.submit("module m; endmodule", &token);
        assert_eq!(report.status, VerificationStatus::Cancelled);
    }
}
