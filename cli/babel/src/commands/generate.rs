//! `babel generate`: derive, emit, persist and verify one core.

use anyhow::Result;
use babel_core::{ParamField, ParameterSet};
use babel_search::SimilaritySearchEngine;
use babel_verify::{CancelToken, VerificationAdapter};
use tracing::warn;

use crate::commands::lexicon::LexiconSource;
use crate::commands::search::print_ranking;
use crate::pipeline::{run_request, Outcome, Settings, Written};

/// Query words and where to search for them.
pub struct Query<'a> {
    pub words: &'a [String],
    pub candidates: &'a [String],
    pub top_k: usize,
    pub lexicon: &'a LexiconSource,
}

/// Generate the core for `seed`.
///
/// Verification failures and lexicon load failures are printed but do not
/// make the command fail. The lexicon is only loaded when there are words.
pub fn run(
    seed: &str,
    query: &Query<'_>,
    settings: &Settings,
    adapter: &dyn VerificationAdapter,
) -> Result<()> {
    let outcome = run_request(seed, settings, adapter, &CancelToken::new())?;

    println!("=== Babel core for seed {:?} ===", outcome.seed);
    println!("Fingerprint: {}", outcome.artifact.fingerprint);
    println!();
    print_parameters(&outcome.params);

    if !query.words.is_empty() {
        println!();
        print_search(query);
    }

    println!();
    print_files(&outcome);

    println!();
    println!("--- Verification ({}) ---", adapter.name());
    println!("  {}", outcome.verification.to_string().trim_end());
    Ok(())
}

fn print_search(query: &Query<'_>) {
    match query.lexicon.load() {
        Ok(lexicon) => {
            let engine = SimilaritySearchEngine::new(&lexicon);
            let target = engine.build_target_vector(query.words);
            let hits = engine.search(query.candidates, &target, query.top_k);
            print_ranking(query.words, &target, &hits);
        }
        Err(e) => {
            warn!(lexicon = %query.lexicon.describe(), "similarity search skipped");
            println!("--- Similarity search: {} ---", query.words.join(" "));
            println!("  skipped: {e:#}");
        }
    }
}

/// Print each parameter on its own line.
pub fn print_parameters(params: &ParameterSet) {
    println!("--- Parameters ---");
    for field in ParamField::ALL {
        let value = params.field_value(field);
        if field == ParamField::NumRegs {
            println!(
                "  {:<18}{value} ({})",
                field.name(),
                params.num_regs().names().join(", ")
            );
        } else {
            println!("  {:<18}{value}", field.name());
        }
    }
}

fn print_files(outcome: &Outcome) {
    println!("--- Files ---");
    let state = match outcome.written {
        Written::Created => "written",
        Written::Unchanged => "unchanged",
    };
    println!("  Verilog:   {} ({state})", outcome.path.display());
    println!("  Modules:   {}", outcome.artifact.modules.join(", "));
    if let Some(stub) = &outcome.stub {
        println!("  Assembler: {} (placeholder)", stub.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use babel_verify::SkipVerification;

    #[test]
    fn generate_with_query_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            out_dir: dir.path().to_path_buf(),
            assembler_stub: true,
        };
        let words = vec!["cisc".to_string(), "powerful".to_string(), "fast_memory".to_string()];
        let candidates: Vec<String> = (0..10).map(|i| format!("seed_{i}")).collect();
        let lexicon = LexiconSource::default();
        let query = Query {
            words: &words,
            candidates: &candidates,
            top_k: 5,
            lexicon: &lexicon,
        };
        run("seed_789", &query, &settings, &SkipVerification::new("off")).unwrap();
        assert!(dir.path().join("micro_x86_core_752b2c0d.v").is_file());
        assert!(dir.path().join("assembler_752b2c0d.py").is_file());
    }

    #[test]
    fn broken_lexicon_does_not_block_generation() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            out_dir: dir.path().to_path_buf(),
            assembler_stub: false,
        };
        let lexicon = LexiconSource {
            path: Some(dir.path().join("missing.toml")),
        };
        let words = vec!["cisc".to_string()];
        let query = Query {
            words: &words,
            candidates: &[],
            top_k: 5,
            lexicon: &lexicon,
        };
        run("seed_789", &query, &settings, &SkipVerification::new("off")).unwrap();
        assert!(dir.path().join("micro_x86_core_752b2c0d.v").is_file());
    }
}
