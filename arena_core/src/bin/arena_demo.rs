use std::collections::HashSet;

use chrono::Utc;
use tracing::info;

use arena_core::{mock_cohort, season_progress, ArenaEngine, SeasonStanding};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let engine = ArenaEngine::builtin();
    let now = Utc::now();

    info!(
        leagues = engine.leagues().leagues().len(),
        xp_actions = engine.xp_catalog().sources().len(),
        achievements = engine.achievement_catalog().achievements().len(),
        "Study Arena engine ready"
    );

    let cohort = mock_cohort(25, 0xa11ce);
    let ranked = engine.rank(&cohort).expect("mock cohort is well-formed");

    for entry in ranked.iter().take(5) {
        info!(
            target: "study_arena::ranking",
            position = entry.position,
            id = %entry.id,
            strength = entry.strength,
            percentile = entry.percentile,
            badge = entry.badge.map(|badge| badge.name()).unwrap_or("-"),
            "ranking.entry"
        );
    }

    for total_xp in [0, 480, 1_850, 6_200, 12_500] {
        let placement = engine.classify(total_xp).expect("non-negative demo totals");
        let next = engine
            .xp_to_next_rank(total_xp)
            .expect("non-negative demo totals");
        info!(
            target: "study_arena::league",
            total_xp,
            league = %placement.league.name,
            division = placement.division_numeral().unwrap_or(""),
            needed = next.needed,
            at_max = next.at_max_rank,
            "league.placement"
        );
    }

    let conditions: HashSet<String> = ["streak_7_days".to_string()].into_iter().collect();
    let awarded = engine.award_xp("streak_bonus", &conditions, now, None);
    info!(target: "study_arena::xp", awarded, "xp.streak_bonus_awarded");

    if let Some(season) = engine.active_season(now) {
        let days = season.days_remaining(now);
        let progress =
            season_progress(4_200, 0, 15_000, days).expect("demo totals are consistent");
        let standing = SeasonStanding {
            best_tier: 3,
            season_xp: 4_200,
            ..Default::default()
        };
        let rewards = season.unlocked_rewards(&standing, engine.leagues());
        info!(
            target: "study_arena::season",
            season = %season.name,
            days_remaining = days,
            percent = progress.percent_complete,
            pace = progress.xp_per_day_needed,
            rewards = rewards.len(),
            "season.progress"
        );
    } else {
        info!(target: "study_arena::season", "season.none_active");
    }
}
