//! Lexicon-driven similarity search over Babel parameter space.
//!
//! Query words are folded through a read-only [`Lexicon`] into a
//! [`TargetVector`]; caller-supplied candidate seeds are derived, scored by
//! [`distance`], and ranked with a stable ascending sort.

pub mod distance;
pub mod engine;
pub mod error;
pub mod lexicon;
pub mod target;

pub use distance::{distance, MISMATCH_WEIGHT};
pub use engine::{SearchHit, SimilaritySearchEngine};
pub use error::{LexiconError, Result};
pub use lexicon::{Lexicon, Preference};
pub use target::TargetVector;
