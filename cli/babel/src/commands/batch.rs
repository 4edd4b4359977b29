//! `babel batch`: generate many cores in parallel.
//!
//! Requests are striped across scoped worker threads. Each request owns a
//! cancellation token, and an error in one is recorded against that seed
//! only. Results come back in input order.

use std::thread;

use anyhow::{bail, Result};
use babel_verify::{CancelToken, VerificationAdapter};
use tracing::debug;

use crate::pipeline::{run_request, Outcome, Settings};

/// Seeds longer than this are printed unpadded.
const MAX_SEED_COLUMN: usize = 32;

/// Run every seed through the pipeline on up to `jobs` threads.
pub fn generate_all(
    seeds: &[String],
    jobs: usize,
    settings: &Settings,
    adapter: &dyn VerificationAdapter,
) -> Vec<Result<Outcome>> {
    let workers = jobs.clamp(1, seeds.len().max(1));
    let tokens: Vec<CancelToken> = seeds.iter().map(|_| CancelToken::new()).collect();
    debug!(requests = seeds.len(), workers, "starting batch");

    let mut indexed: Vec<(usize, Result<Outcome>)> = thread::scope(|scope| {
        let handles: Vec<_> = (0..workers)
            .map(|worker| {
                let tokens = &tokens;
                scope.spawn(move || {
                    (worker..seeds.len())
                        .step_by(workers)
                        .map(|i| (i, run_request(&seeds[i], settings, adapter, &tokens[i])))
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles
            .into_iter()
            .flat_map(|handle| match handle.join() {
                Ok(results) => results,
                Err(panic) => std::panic::resume_unwind(panic),
            })
            .collect()
    });
    indexed.sort_by_key(|(i, _)| *i);
    indexed.into_iter().map(|(_, result)| result).collect()
}

/// Generate every seed and print one line per request.
pub fn run(
    seeds: &[String],
    jobs: usize,
    settings: &Settings,
    adapter: &dyn VerificationAdapter,
) -> Result<()> {
    let results = generate_all(seeds, jobs, settings, adapter);
    let width = seeds
        .iter()
        .map(|s| s.chars().count())
        .max()
        .unwrap_or(0)
        .min(MAX_SEED_COLUMN);

    println!("=== Babel batch: {} seeds ===", seeds.len());
    let mut failed = 0;
    for (seed, result) in seeds.iter().zip(&results) {
        match result {
            Ok(outcome) => println!(
                "  {seed:<width$}  {}  verification {}",
                outcome.artifact.name, outcome.verification.status
            ),
            Err(e) => {
                failed += 1;
                println!("  {seed:<width$}  error: {e:#}");
            }
        }
    }
    if failed > 0 {
        bail!("{failed} of {} requests failed", seeds.len());
    }
    Ok(())
}
