use arena_core::{ArenaEngine, CohortMember};

pub fn engine() -> ArenaEngine {
    ArenaEngine::builtin()
}

/// Fixed five-member cohort with a clear strength ordering and one tie.
pub fn fixture_cohort() -> Vec<CohortMember> {
    vec![
        member("dr-lopez", 96.5, 28, 180.0),
        member("dr-garcia", 91.0, 14, 120.0),
        member("dr-torres", 88.0, 21, 90.0),
        member("dr-cruz", 82.5, 5, 45.0),
        member("dr-vega", 82.5, 5, 45.0),
    ]
}

pub fn member(id: &str, score: f64, streak: u32, hours: f64) -> CohortMember {
    CohortMember {
        id: id.to_string(),
        score,
        streak_days: streak,
        study_time_hours: hours,
    }
}
