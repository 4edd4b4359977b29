//! CLI command implementations.

pub mod batch;
pub mod doctor;
pub mod generate;
pub mod lexicon;
pub mod search;
