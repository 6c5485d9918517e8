use std::sync::Arc;

use anyhow::Result;

use arena_core::{
    AchievementCatalog, ArenaEngine, LeagueTable, SeasonCalendar, XpCatalog,
};

/// The engine accepts alternate tables, so a deployment can reshape the
/// ladder without touching the logic.
#[test]
fn a_two_league_ladder_classifies_consistently() -> Result<()> {
    let json = serde_json::json!({
        "leagues": [
            { "id": "novice", "name": "Novice", "tier": 1, "min_xp": 0, "max_xp": 999, "division_count": 2 },
            { "id": "expert", "name": "Expert", "tier": 2, "min_xp": 1000, "division_count": 1 }
        ]
    });
    let leagues = Arc::new(LeagueTable::from_json_str(&json.to_string())?);

    // The builtin season rewards name the builtin leagues, so the reshaped
    // ladder ships with an empty calendar.
    let engine = ArenaEngine::new(
        leagues,
        XpCatalog::builtin(),
        AchievementCatalog::builtin(),
        Arc::new(SeasonCalendar::new(Vec::new())?),
    )?;

    let placement = engine.classify(0)?;
    assert_eq!(placement.league.id, "novice");
    assert_eq!(placement.division, 1);

    let placement = engine.classify(600)?;
    assert_eq!(placement.division, 2);

    let next = engine.xp_to_next_rank(600)?;
    assert_eq!(next.needed, 400);
    assert_eq!(next.total, 1_000);

    let top = engine.xp_to_next_rank(5_000)?;
    assert!(top.at_max_rank);
    Ok(())
}

#[test]
fn a_custom_xp_catalog_replaces_the_builtin_actions() -> Result<()> {
    let catalog = XpCatalog::from_json_str(
        r#"{
            "sources": [
                {
                    "action": "flashcard_review",
                    "base_xp": 5,
                    "multipliers": [
                        { "condition": "deck_finished", "multiplier": 4 }
                    ]
                }
            ]
        }"#,
    )?;

    let finished = ["deck_finished".to_string()].into_iter().collect();
    assert_eq!(catalog.compute_xp("flashcard_review", &finished, None), 20);
    // Builtin actions are gone in the replacement catalog.
    assert_eq!(
        catalog.compute_xp("correct_answer", &std::collections::HashSet::new(), None),
        0
    );
    Ok(())
}
