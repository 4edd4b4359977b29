//! One generation request: derive -> emit -> persist -> verify.
//!
//! Requests share nothing but read-only settings and the adapter, so a
//! batch runs them on independent threads.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use babel_core::{derive, validate_seed, ParameterSet};
use babel_hdl::{assembler_stub, emit, stub_name, Artifact};
use babel_verify::{CancelToken, VerificationAdapter, VerificationReport};
use tracing::{debug, info};

/// Settings shared by every request in a run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub out_dir: PathBuf,
    pub assembler_stub: bool,
}

/// Whether persisting an artifact touched the disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Written {
    Created,
    Unchanged,
}

/// Everything a finished request produced.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub seed: String,
    pub params: ParameterSet,
    pub artifact: Artifact,
    pub path: PathBuf,
    pub written: Written,
    pub stub: Option<PathBuf>,
    pub verification: VerificationReport,
}

/// Run one request end to end. Errors only when derivation, emission or
/// persistence fail; verification problems land in the report.
pub fn run_request(
    seed: &str,
    settings: &Settings,
    adapter: &dyn VerificationAdapter,
    cancel: &CancelToken,
) -> Result<Outcome> {
    validate_seed(seed)?;
    let params = derive(seed);
    debug!(seed, %params, "derived parameters");

    let artifact = emit(&params).with_context(|| format!("emitting core for seed {seed:?}"))?;
    let (path, written) = persist(&settings.out_dir, &artifact.name, &artifact.text)?;
    info!(path = %path.display(), ?written, "artifact persisted");

    let stub = if settings.assembler_stub {
        let text = assembler_stub(&params, &artifact.fingerprint);
        let (stub_path, _) = persist(&settings.out_dir, &stub_name(&artifact.fingerprint), &text)?;
        Some(stub_path)
    } else {
        None
    };

    let verification = adapter.submit(&artifact.text, cancel);

    Ok(Outcome {
        seed: seed.to_string(),
        params,
        artifact,
        path,
        written,
        stub,
        verification,
    })
}

/// Write `text` to `dir/name` unless an identical file is already there.
pub fn persist(dir: &Path, name: &str, text: &str) -> Result<(PathBuf, Written)> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let path = dir.join(name);
    if let Ok(existing) = fs::read_to_string(&path) {
        if existing == text {
            return Ok((path, Written::Unchanged));
        }
    }
    fs::write(&path, text).with_context(|| format!("writing {}", path.display()))?;
    Ok((path, Written::Created))
}
