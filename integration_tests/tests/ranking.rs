mod common;

use arena_core::{cohort_stats, has_special_badge, is_elite, is_podium, BadgeKind};

#[test]
fn cohort_ranking_is_a_contiguous_permutation() {
    let engine = common::engine();
    let ranked = engine.rank(&common::fixture_cohort()).unwrap();

    let positions: Vec<u32> = ranked.iter().map(|entry| entry.position).collect();
    assert_eq!(positions, vec![1, 2, 3, 4, 5]);

    // Strength never increases down the list.
    for pair in ranked.windows(2) {
        assert!(pair[0].strength >= pair[1].strength);
    }
}

#[test]
fn podium_badges_are_distinct_and_stop_at_third() {
    let engine = common::engine();
    let ranked = engine.rank(&common::fixture_cohort()).unwrap();

    assert_eq!(ranked[0].badge, Some(BadgeKind::FirstPlace));
    assert_eq!(ranked[1].badge, Some(BadgeKind::SecondPlace));
    assert_eq!(ranked[2].badge, Some(BadgeKind::ThirdPlace));
    assert_eq!(ranked[3].badge, None);
    assert_eq!(ranked[4].badge, None);

    for entry in &ranked {
        assert_eq!(has_special_badge(entry.position), entry.badge.is_some());
        assert_eq!(is_podium(entry.position), entry.badge.is_some());
        assert!(is_elite(entry.position));
    }
}

#[test]
fn tied_members_keep_a_deterministic_order() {
    let engine = common::engine();
    let ranked = engine.rank(&common::fixture_cohort()).unwrap();

    // dr-cruz and dr-vega are identical; ids break the tie.
    assert_eq!(ranked[3].id, "dr-cruz");
    assert_eq!(ranked[4].id, "dr-vega");

    let rerun = engine.rank(&common::fixture_cohort()).unwrap();
    assert_eq!(ranked, rerun);
}

#[test]
fn percentiles_span_the_cohort() {
    let engine = common::engine();
    let ranked = engine.rank(&common::fixture_cohort()).unwrap();

    assert_eq!(ranked.first().unwrap().percentile, 100);
    assert_eq!(ranked.last().unwrap().percentile, 20);
    for pair in ranked.windows(2) {
        assert!(pair[0].percentile >= pair[1].percentile);
    }
}

#[test]
fn stats_summarize_the_ranked_cohort() {
    let engine = common::engine();
    let ranked = engine.rank(&common::fixture_cohort()).unwrap();
    let stats = cohort_stats(&ranked);

    assert_eq!(stats.students, 5);
    // (96.5 + 91.0 + 88.0 + 82.5 + 82.5) / 5 = 88.1
    assert!((stats.average_score - 88.1).abs() < 1e-9);
}

#[test]
fn score_dominates_the_secondary_signals() {
    let engine = common::engine();
    let cohort = vec![
        common::member("grinder", 80.0, 30, 200.0),
        common::member("ace", 99.0, 0, 0.0),
    ];
    let ranked = engine.rank(&cohort).unwrap();
    // With zero streak and study time, a 99 average still loses to a
    // fully-capped grinder: 69.3 against 86.0.
    assert_eq!(ranked[0].id, "grinder");

    let cohort = vec![
        common::member("grinder", 80.0, 30, 200.0),
        common::member("ace", 99.0, 20, 100.0),
    ];
    let ranked = engine.rank(&cohort).unwrap();
    assert_eq!(ranked[0].id, "ace");
}
