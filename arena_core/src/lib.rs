//! Gamification and ranking engine for the Study Arena exam-prep platform.
//!
//! Pure computation over immutable catalogs: XP awards with stacking
//! multipliers, league/division classification, season progress, achievement
//! unlocks, and cohort ranking with podium badges. Persistence, transport,
//! and rendering live with the callers; everything here is a synchronous
//! function over caller-supplied snapshots.

pub mod achievement;
pub mod badge;
pub mod engine;
pub mod league;
pub mod ranking;
pub mod season;
pub mod xp;

pub use achievement::{
    Achievement, AchievementCatalog, AchievementCatalogError, AchievementRequirement, Category,
    Rarity,
};
pub use badge::{badge_for, has_special_badge, BadgeKind};
pub use engine::{ArenaEngine, EngineConfigError};
pub use league::{League, LeagueTable, LeagueTableError, NegativeXp, NextRank, Placement};
pub use ranking::{
    cohort_stats, is_elite, is_podium, mock_cohort, percentile, rank, weighted_strength,
    CohortMember, CohortStats, RankedStudent, RankingError,
};
pub use season::{
    season_progress, RewardRequirement, Season, SeasonCalendar, SeasonCalendarError, SeasonEvent,
    SeasonProgress, SeasonProgressError, SeasonReward, SeasonStanding,
};
pub use xp::{XpCatalog, XpCatalogError, XpMultiplier, XpSource};
