//! Ranking caller-supplied candidate seeds against a target.

use std::fmt;

use babel_core::derive;
use tracing::{debug, trace};

use crate::distance::distance;
use crate::lexicon::Lexicon;
use crate::target::TargetVector;

/// One ranked candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub seed: String,
    pub score: f64,
}

impl fmt::Display for SearchHit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<16} {:.2}", self.seed, self.score)
    }
}

/// Similarity search over a read-only lexicon.
///
/// The engine never enumerates seeds itself; the candidate universe is
/// always supplied by the caller.
#[derive(Debug, Clone, Copy)]
pub struct SimilaritySearchEngine<'a> {
    lexicon: &'a Lexicon,
}

impl Default for SimilaritySearchEngine<'static> {
    fn default() -> Self {
        Self::new(Lexicon::builtin())
    }
}

impl<'a> SimilaritySearchEngine<'a> {
    pub fn new(lexicon: &'a Lexicon) -> Self {
        Self { lexicon }
    }

    pub fn lexicon(&self) -> &'a Lexicon {
        self.lexicon
    }

    /// Merge query words into a target, later words winning per field.
    pub fn build_target_vector<S: AsRef<str>>(&self, words: &[S]) -> TargetVector {
        TargetVector::build(self.lexicon, words)
    }

    /// Score every candidate, sort ascending, and keep the first `top_k`.
    ///
    /// Ties keep the candidates' input order.
    pub fn search<S: AsRef<str>>(
        &self,
        candidates: &[S],
        target: &TargetVector,
        top_k: usize,
    ) -> Vec<SearchHit> {
        let mut hits: Vec<SearchHit> = candidates
            .iter()
            .map(|seed| {
                let seed = seed.as_ref();
                let score = distance(&derive(seed), target);
                trace!(seed, score, "scored candidate");
                SearchHit {
                    seed: seed.to_string(),
                    score,
                }
            })
            .collect();
        // stable: equal scores keep input order
        hits.sort_by(|a, b| a.score.total_cmp(&b.score));
        hits.truncate(top_k);
        debug!(
            candidates = candidates.len(),
            returned = hits.len(),
            %target,
            "similarity search complete"
        );
        hits
    }
}
