use babel_core::{derive, ParamField};
use babel_search::{distance, Lexicon, Preference, SimilaritySearchEngine, TargetVector};

fn candidates() -> Vec<String> {
    (0..10).map(|i| format!("seed_{i}")).collect()
}

#[test]
fn generate_with_query_ranks_candidates() {
    let params = derive("seed_789");
    assert_eq!(params.num_regs().count(), 4);

    let engine = SimilaritySearchEngine::default();
    let target = engine.build_target_vector(&["cisc", "powerful", "fast_memory"]);
    let hits = engine.search(&candidates(), &target, 5);

    assert!(!hits.is_empty());
    assert!(hits.len() <= 5);
    assert!(hits.windows(2).all(|w| w[0].score <= w[1].score));
    for hit in &hits {
        assert!(candidates().contains(&hit.seed));
        assert_eq!(hit.score, distance(&derive(&hit.seed), &target));
    }
}

#[test]
fn search_is_repeatable() {
    let engine = SimilaritySearchEngine::default();
    let target = engine.build_target_vector(&["risc_like", "deep_pipeline"]);
    let first = engine.search(&candidates(), &target, 5);
    let second = engine.search(&candidates(), &target, 5);
    assert_eq!(first, second);
}

#[test]
fn merge_order_is_last_write_wins() {
    let lexicon = Lexicon::builtin();
    let target = TargetVector::build(lexicon, &["compact", "powerful"]);
    let powerful = lexicon.lookup("powerful").unwrap();
    let expected = powerful
        .iter()
        .find(|p| p.field() == ParamField::NumRegs)
        .copied();
    assert_eq!(target.get(ParamField::NumRegs), expected);
    assert!(matches!(expected, Some(Preference::NumRegs(_))));
}

#[test]
fn partial_target_is_not_a_full_metric() {
    // Two different parameter sets can both sit at distance zero from a
    // target that leaves fields unset.
    let a = derive("seed_3");
    let b = derive("seed_6");
    assert_ne!(a, b);
    let target = TargetVector::build(Lexicon::builtin(), &["compact"]);
    assert_eq!(distance(&a, &target), 0.0);
    assert_eq!(distance(&b, &target), 0.0);
}
