//! `babel search`: rank candidate seeds against query words.

use anyhow::Result;
use babel_search::{SearchHit, SimilaritySearchEngine, TargetVector};

/// Run a similarity search and print the ranking.
pub fn run(
    engine: &SimilaritySearchEngine<'_>,
    words: &[String],
    candidates: &[String],
    top_k: usize,
) -> Result<()> {
    let target = engine.build_target_vector(words);
    let hits = engine.search(candidates, &target, top_k);
    print_ranking(words, &target, &hits);
    Ok(())
}

/// Print a ranked result list under a heading naming the query.
pub fn print_ranking(words: &[String], target: &TargetVector, hits: &[SearchHit]) {
    println!("--- Similarity search: {} ---", words.join(" "));
    println!("  Target: {target}");
    if hits.is_empty() {
        println!("  (no candidates)");
        return;
    }
    for (rank, hit) in hits.iter().enumerate() {
        println!("  {:>2}. {hit}", rank + 1);
    }
}
