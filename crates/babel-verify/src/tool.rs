//! Bounded invocation of external tools.
//!
//! A tool runs as a child process with its output drained on reader
//! threads. The caller's thread polls for exit, killing the child when the
//! deadline passes or the request is cancelled.

use std::env;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::cancel::CancelToken;
use crate::error::{Result, VerifyError};

const POLL_INTERVAL: Duration = Duration::from_millis(10);
/// How long to wait for output after the child is gone. Grandchildren that
/// inherited the pipes can keep them open past a kill.
const DRAIN_GRACE: Duration = Duration::from_millis(500);

/// Placeholder replaced by the staged artifact path.
pub const FILE_PLACEHOLDER: &str = "{file}";
/// Placeholder replaced by the top-level module name.
pub const TOP_PLACEHOLDER: &str = "{top}";

/// A program and its argument template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ToolCommand {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Arguments with placeholders substituted.
    pub fn render_args(&self, file: &Path, top: &str) -> Vec<String> {
        let file = file.display().to_string();
        self.args
            .iter()
            .map(|arg| {
                arg.replace(FILE_PLACEHOLDER, &file)
                    .replace(TOP_PLACEHOLDER, top)
            })
            .collect()
    }
}

/// How a bounded run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolOutcome {
    Exited {
        success: bool,
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },
    TimedOut {
        stdout: String,
        stderr: String,
    },
    Cancelled,
}

/// Run `program` with `args`, bounded by `timeout` and `cancel`.
pub fn run_bounded(
    program: &str,
    args: &[String],
    timeout: Duration,
    cancel: &CancelToken,
) -> Result<ToolOutcome> {
    if cancel.is_cancelled() {
        return Ok(ToolOutcome::Cancelled);
    }

    debug!(program, ?args, ?timeout, "starting tool");
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| VerifyError::Spawn {
            program: program.to_string(),
            source,
        })?;

    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());
    let deadline = Instant::now() + timeout;

    loop {
        if let Some(status) = child.try_wait()? {
            debug!(program, code = status.code(), "tool exited");
            return Ok(ToolOutcome::Exited {
                success: status.success(),
                code: status.code(),
                stdout: collect(stdout),
                stderr: collect(stderr),
            });
        }
        if cancel.is_cancelled() {
            kill(&mut child, program);
            return Ok(ToolOutcome::Cancelled);
        }
        if Instant::now() >= deadline {
            warn!(program, ?timeout, "tool timed out");
            kill(&mut child, program);
            return Ok(ToolOutcome::TimedOut {
                stdout: collect(stdout),
                stderr: collect(stderr),
            });
        }
        thread::sleep(POLL_INTERVAL);
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel();
    if let Some(mut pipe) = pipe {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            let _ = tx.send(String::from_utf8_lossy(&buf).into_owned());
        });
    }
    rx
}

fn collect(rx: mpsc::Receiver<String>) -> String {
    rx.recv_timeout(DRAIN_GRACE).unwrap_or_default()
}

fn kill(child: &mut Child, program: &str) {
    if let Err(e) = child.kill() {
        debug!(program, error = %e, "kill failed; child already exited");
    }
    let _ = child.wait();
}

/// Locate `program` on `PATH`.
pub fn find_on_path(program: &str) -> Option<PathBuf> {
    let candidate = Path::new(program);
    if candidate.components().count() > 1 {
        return candidate.is_file().then(|| candidate.to_path_buf());
    }
    let paths = env::var_os("PATH")?;
    env::split_paths(&paths)
        .map(|dir| dir.join(program))
        .find(|path| path.is_file())
}

/// Cell count from the last `Number of cells:` line of a yosys `stat` log.
pub fn parse_cell_count(log: &str) -> Option<u64> {
    log.lines().rev().find_map(|line| {
        let rest = line.trim().strip_prefix("Number of cells:")?;
        rest.split_whitespace().next()?.parse().ok()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_placeholders() {
        let cmd = ToolCommand::new("yosys", ["-p", "read_verilog {file}; synth -top {top}"]);
        let args = cmd.render_args(Path::new("/tmp/core.v"), "micro_x86_core");
        assert_eq!(args[1], "read_verilog /tmp/core.v; synth -top micro_x86_core");
    }

    #[test]
    fn parses_last_cell_count() {
        let log = "\
=== alu ===
   Number of cells:                 12
=== micro_x86_core ===
   Number of cells:               4821
";
        assert_eq!(parse_cell_count(log), Some(4821));
        assert_eq!(parse_cell_count("no stats here"), None);
    }

    #[test]
    fn missing_program_is_spawn_error() {
        let err = run_bounded(
            "babel-definitely-not-a-real-tool",
            &[],
            Duration::from_secs(1),
            &CancelToken::new(),
        )
        .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn cancelled_before_start() {
        let token = CancelToken::new();
        token.cancel();
        let outcome = run_bounded("sh", &[], Duration::from_secs(1), &token).unwrap();
        assert_eq!(outcome, ToolOutcome::Cancelled);
    }

    #[cfg(unix)]
    #[test]
    fn captures_exit_and_output() {
        let args = vec!["-c".to_string(), "echo out; echo err >&2; exit 3".to_string()];
        let outcome = run_bounded("sh", &args, Duration::from_secs(5), &CancelToken::new()).unwrap();
        match outcome {
            ToolOutcome::Exited {
                success,
                code,
                stdout,
                stderr,
            } => {
                assert!(!success);
                assert_eq!(code, Some(3));
                assert_eq!(stdout.trim(), "out");
                assert_eq!(stderr.trim(), "err");
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn kills_on_timeout() {
        let args = vec!["-c".to_string(), "exec sleep 5".to_string()];
        let start = Instant::now();
        let outcome =
            run_bounded("sh", &args, Duration::from_millis(100), &CancelToken::new()).unwrap();
        assert!(matches!(outcome, ToolOutcome::TimedOut { .. }));
        assert!(start.elapsed() < Duration::from_secs(4));
    }

    #[cfg(unix)]
    #[test]
    fn kills_on_cancel() {
        let token = CancelToken::new();
        let remote = token.clone();
        let canceller = thread::spawn(move || {
            thread::sleep(Duration::from_millis(100));
            remote.cancel();
        });
        let args = vec!["-c".to_string(), "exec sleep 5".to_string()];
        let start = Instant::now();
        let outcome = run_bounded("sh", &args, Duration::from_secs(30), &token).unwrap();
        canceller.join().unwrap();
        assert_eq!(outcome, ToolOutcome::Cancelled);
        assert!(start.elapsed() < Duration::from_secs(4));
    }

    #[cfg(unix)]
    #[test]
    fn finds_shell_on_path() {
        assert!(find_on_path("sh").is_some());
        assert!(find_on_path("babel-definitely-not-a-real-tool").is_none());
    }
}
