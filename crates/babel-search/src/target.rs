//! Merged parameter preferences built from query words.

use std::fmt;

use babel_core::{ParamField, ParameterSet};
use tracing::debug;

use crate::lexicon::{Lexicon, Preference};

/// At most one preferred value per parameter field.
///
/// Fields left unset never contribute to distance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetVector {
    slots: [Option<Preference>; 6],
}

fn slot(field: ParamField) -> usize {
    match field {
        ParamField::NumRegs => 0,
        ParamField::DecoderType => 1,
        ParamField::PipelineDepth => 2,
        ParamField::AddressingModes => 3,
        ParamField::ExecUnits => 4,
        ParamField::MemoryInterface => 5,
    }
}

impl TargetVector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold `words` through `lexicon` in order. Unknown words are skipped;
    /// on a field collision the later word wins.
    pub fn build<S: AsRef<str>>(lexicon: &Lexicon, words: &[S]) -> Self {
        let mut target = Self::new();
        for word in words {
            let word = word.as_ref();
            match lexicon.lookup(word) {
                Some(prefs) => {
                    for pref in prefs {
                        target.set(*pref);
                    }
                }
                None => debug!(word, "ignoring unknown lexicon word"),
            }
        }
        target
    }

    /// A target naming every field of `params`.
    pub fn from_params(params: &ParameterSet) -> Self {
        let mut target = Self::new();
        for pref in Preference::all_of(params) {
            target.set(pref);
        }
        target
    }

    /// Set a field, replacing any earlier preference for it.
    pub fn set(&mut self, pref: Preference) {
        self.slots[slot(pref.field())] = Some(pref);
    }

    pub fn get(&self, field: ParamField) -> Option<Preference> {
        self.slots[slot(field)]
    }

    /// Set preferences in field order.
    pub fn iter(&self) -> impl Iterator<Item = &Preference> {
        self.slots.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }
}

impl fmt::Display for TargetVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("(no preferences)");
        }
        let parts: Vec<String> = self.iter().map(ToString::to_string).collect();
        f.write_str(&parts.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use babel_core::{AddressingModes, DecoderType, MemoryInterface, NumRegs};

    #[test]
    fn later_word_wins_on_collision() {
        let t = TargetVector::build(Lexicon::builtin(), &["compact", "powerful"]);
        assert_eq!(t.get(ParamField::NumRegs), Some(Preference::NumRegs(NumRegs::Eight)));
        assert_eq!(
            t.get(ParamField::AddressingModes),
            Some(Preference::AddressingModes(AddressingModes::all()))
        );

        let t = TargetVector::build(Lexicon::builtin(), &["powerful", "compact"]);
        assert_eq!(t.get(ParamField::NumRegs), Some(Preference::NumRegs(NumRegs::Four)));
    }

    #[test]
    fn unknown_words_are_ignored() {
        let t = TargetVector::build(Lexicon::builtin(), &["shiny", "cisc", "", "fast_memory"]);
        assert_eq!(t.len(), 2);
        assert_eq!(
            t.get(ParamField::DecoderType),
            Some(Preference::DecoderType(DecoderType::Microcoded))
        );
        assert_eq!(
            t.get(ParamField::MemoryInterface),
            Some(Preference::MemoryInterface(MemoryInterface::Cached))
        );
        assert!(t.get(ParamField::PipelineDepth).is_none());
    }

    #[test]
    fn empty_query_sets_nothing() {
        let words: [&str; 0] = [];
        let t = TargetVector::build(Lexicon::builtin(), &words);
        assert!(t.is_empty());
        assert_eq!(t.to_string(), "(no preferences)");
    }

    #[test]
    fn from_params_sets_every_field() {
        let t = TargetVector::from_params(&babel_core::derive("seed_123"));
        assert_eq!(t.len(), 6);
        assert_eq!(
            t.to_string(),
            "num_regs=8 decoder_type=microcoded pipeline_depth=3 \
             addressing_modes={[reg], [reg+imm], [reg+reg]} exec_units=separate-agu-alu \
             memory_interface=simple"
        );
    }
}
