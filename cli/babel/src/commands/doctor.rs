//! `babel doctor`: environment diagnostics.

use std::path::Path;
use std::process::Command;

use anyhow::Result;
use babel_verify::find_on_path;

use crate::commands::lexicon::LexiconSource;
use crate::config::{BabelConfig, CONFIG_FILE};

/// Print configuration, lexicon and tool status.
///
/// Problems with `babel.toml` or the lexicon are reported, never returned:
/// this command has to work when the project setup is broken.
pub fn run(project_dir: &Path, lexicon_flag: Option<&Path>) -> Result<()> {
    println!("=== Babel Doctor ===");
    println!();
    println!("Babel version: {}", env!("CARGO_PKG_VERSION"));
    println!();

    println!("--- Configuration ---");
    let config = match BabelConfig::find_and_load(project_dir) {
        Ok(Some((config, dir))) => {
            println!("  {CONFIG_FILE}: found at {}", dir.display());
            config
        }
        Ok(None) => {
            println!("  {CONFIG_FILE}: not found (using defaults)");
            BabelConfig::default()
        }
        Err(e) => {
            println!("  {CONFIG_FILE}: error: {e:#}");
            BabelConfig::default()
        }
    };
    println!("  Output dir:   {}", config.output.dir.display());
    println!("  Candidates:   {}", config.search.candidates.join(", "));
    let source = LexiconSource {
        path: lexicon_flag
            .map(Path::to_path_buf)
            .or_else(|| config.search.lexicon.clone()),
    };
    match source.load() {
        Ok(lexicon) => println!("  Lexicon:      {} words ({})", lexicon.len(), source.describe()),
        Err(e) => println!("  Lexicon:      error: {e:#}"),
    }
    println!();

    println!("--- Verification ---");
    let verification = &config.verification;
    if !verification.enabled {
        println!("  disabled in {CONFIG_FILE}");
        return Ok(());
    }
    println!("  Timeout: {} s", verification.timeout_secs);
    print_tool_status(&verification.tool);
    Ok(())
}

fn print_tool_status(name: &str) {
    let Some(path) = find_on_path(name) else {
        println!("  {name}: not found on PATH (verification will report unavailable)");
        return;
    };
    let version = Command::new(&path)
        .arg("-V")
        .output()
        .ok()
        .and_then(|out| {
            String::from_utf8_lossy(&out.stdout)
                .lines()
                .next()
                .map(str::to_string)
        })
        .unwrap_or_else(|| "(unknown version)".to_string());
    println!("  {name}: {} [{version}]", path.display());
}
