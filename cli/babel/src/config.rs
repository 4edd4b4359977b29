//! `babel.toml` project configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use babel_hdl::TOP_MODULE;
use babel_verify::{SkipVerification, ToolAdapter, ToolCommand, VerificationAdapter};
use serde::Deserialize;

pub const CONFIG_FILE: &str = "babel.toml";

/// Top-level configuration. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BabelConfig {
    pub output: OutputConfig,
    pub search: SearchConfig,
    pub verification: VerificationConfig,
}

/// Where artifacts go.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Artifact directory, relative to the directory holding `babel.toml`.
    pub dir: PathBuf,
    /// Write `assembler_<fingerprint>.py` next to each artifact.
    pub assembler_stub: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            assembler_stub: true,
        }
    }
}

/// Similarity search defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    pub candidates: Vec<String>,
    pub top_k: usize,
    /// Custom lexicon file replacing the built-in table.
    pub lexicon: Option<PathBuf>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            candidates: (0..10).map(|i| format!("seed_{i}")).collect(),
            top_k: 5,
            lexicon: None,
        }
    }
}

/// External checker settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VerificationConfig {
    pub enabled: bool,
    pub tool: String,
    /// Argument template for tools other than yosys; `{file}` and `{top}`
    /// are substituted. Defaults to `["{file}"]`.
    pub args: Option<Vec<String>>,
    pub timeout_secs: u64,
    pub estimate_gates: bool,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            tool: "yosys".to_string(),
            args: None,
            timeout_secs: 30,
            estimate_gates: true,
        }
    }
}

impl VerificationConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Adapter for these settings.
    pub fn adapter(&self) -> Box<dyn VerificationAdapter> {
        if !self.enabled {
            return Box::new(SkipVerification::new("verification disabled"));
        }
        match (&self.args, self.tool.as_str()) {
            (None, "yosys") => Box::new(ToolAdapter::yosys(
                TOP_MODULE,
                self.timeout(),
                self.estimate_gates,
            )),
            (args, tool) => {
                let args = args.clone().unwrap_or_else(|| vec!["{file}".to_string()]);
                Box::new(ToolAdapter::new(
                    ToolCommand::new(tool, args),
                    TOP_MODULE,
                    self.timeout(),
                ))
            }
        }
    }
}

impl BabelConfig {
    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Search upward from `start_dir` for a `babel.toml` file, parse and
    /// return it along with the directory it was found in.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(CONFIG_FILE);
            if candidate.is_file() {
                let content = std::fs::read_to_string(&candidate)
                    .with_context(|| format!("reading {}", candidate.display()))?;
                let mut config = Self::parse(&content)
                    .with_context(|| format!("parsing {}", candidate.display()))?;
                config.anchor(&dir);
                return Ok(Some((config, dir)));
            }
            if !dir.pop() {
                return Ok(None);
            }
        }
    }

    /// Resolve relative paths against the config file's directory.
    fn anchor(&mut self, dir: &Path) {
        if self.output.dir.is_relative() {
            self.output.dir = dir.join(&self.output.dir);
        }
        if let Some(lexicon) = &self.search.lexicon {
            if lexicon.is_relative() {
                self.search.lexicon = Some(dir.join(lexicon));
            }
        }
    }
}
