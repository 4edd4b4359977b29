//! Partial mismatch distance between a parameter set and a target.

use babel_core::ParameterSet;

use crate::target::TargetVector;

/// Penalty weight for one mismatching field. Squared when applied.
pub const MISMATCH_WEIGHT: f64 = 1.0;

/// Sum of squared mismatch penalties over the fields `target` sets.
///
/// Unset fields contribute nothing, so this is a partial comparison rather
/// than a metric over the full domain.
pub fn distance(candidate: &ParameterSet, target: &TargetVector) -> f64 {
    target
        .iter()
        .filter(|pref| !pref.matches(candidate))
        .map(|_| MISMATCH_WEIGHT * MISMATCH_WEIGHT)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::{Lexicon, Preference};
    use babel_core::{derive, DecoderType, NumRegs, ParamField};
    use proptest::prelude::*;

    #[test]
    fn empty_target_scores_zero() {
        assert_eq!(distance(&derive("seed_0"), &TargetVector::new()), 0.0);
    }

    #[test]
    fn counts_each_mismatch_once() {
        // seed_789: 4 regs, hardwired, cached
        let params = derive("seed_789");
        let target = TargetVector::build(Lexicon::builtin(), &["cisc", "powerful", "fast_memory"]);
        // decoder, num_regs and addressing modes differ; memory matches
        assert_eq!(distance(&params, &target), 3.0);
    }

    #[test]
    fn only_set_fields_count() {
        let mut target = TargetVector::new();
        target.set(Preference::NumRegs(NumRegs::Eight));
        let params = derive("seed_123");
        assert_eq!(distance(&params, &target), 0.0);
        target.set(Preference::DecoderType(DecoderType::Hardwired));
        assert_eq!(distance(&params, &target), MISMATCH_WEIGHT * MISMATCH_WEIGHT);
        assert!(target.get(ParamField::MemoryInterface).is_none());
    }

    proptest! {
        #[test]
        fn own_values_score_zero(seed in ".*") {
            let params = derive(&seed);
            prop_assert_eq!(distance(&params, &TargetVector::from_params(&params)), 0.0);
        }
    }
}
