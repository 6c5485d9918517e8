use std::{collections::HashSet, sync::Arc};

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::achievement::AchievementCatalog;
use crate::league::{LeagueTable, NegativeXp, NextRank, Placement};
use crate::ranking::{rank, CohortMember, RankedStudent, RankingError};
use crate::season::{Season, SeasonCalendar, RewardRequirement};
use crate::xp::XpCatalog;

#[derive(Debug, Error)]
pub enum EngineConfigError {
    #[error("season reward {reward} references unknown league {league}")]
    UnknownRewardLeague { reward: String, league: String },
}

/// The assembled engine: every catalog behind an `Arc`, injected at startup
/// so tests and deployments can swap tables without touching the logic. All
/// operations are pure over these immutable catalogs plus caller-supplied
/// snapshots, so one engine can serve any number of students concurrently.
#[derive(Debug, Clone)]
pub struct ArenaEngine {
    leagues: Arc<LeagueTable>,
    xp: Arc<XpCatalog>,
    achievements: Arc<AchievementCatalog>,
    seasons: Arc<SeasonCalendar>,
}

impl ArenaEngine {
    pub fn builtin() -> Self {
        Self::new(
            LeagueTable::builtin(),
            XpCatalog::builtin(),
            AchievementCatalog::builtin(),
            SeasonCalendar::builtin(),
        )
        .expect("builtin catalogs should be mutually consistent")
    }

    /// Assemble an engine from already-validated catalogs, cross-checking
    /// the references between them (rank rewards must name real leagues).
    pub fn new(
        leagues: Arc<LeagueTable>,
        xp: Arc<XpCatalog>,
        achievements: Arc<AchievementCatalog>,
        seasons: Arc<SeasonCalendar>,
    ) -> Result<Self, EngineConfigError> {
        for season in seasons.seasons() {
            for reward in &season.rewards {
                if let RewardRequirement::Rank(league_id) = &reward.requirement {
                    if leagues.league(league_id).is_none() {
                        return Err(EngineConfigError::UnknownRewardLeague {
                            reward: reward.id.clone(),
                            league: league_id.clone(),
                        });
                    }
                }
            }
        }
        Ok(Self {
            leagues,
            xp,
            achievements,
            seasons,
        })
    }

    pub fn leagues(&self) -> &LeagueTable {
        &self.leagues
    }

    pub fn xp_catalog(&self) -> &XpCatalog {
        &self.xp
    }

    pub fn achievement_catalog(&self) -> &AchievementCatalog {
        &self.achievements
    }

    pub fn season_calendar(&self) -> &SeasonCalendar {
        &self.seasons
    }

    /// XP for one action instance at a given instant. The season bonus only
    /// applies while a season is active: an explicit caller bonus wins,
    /// otherwise a running special event supplies one.
    pub fn award_xp(
        &self,
        action: &str,
        conditions: &HashSet<String>,
        now: DateTime<Utc>,
        caller_bonus: Option<f64>,
    ) -> u32 {
        let bonus = if self.seasons.active_season(now).is_some() {
            caller_bonus.or_else(|| self.seasons.active_bonus(now))
        } else {
            None
        };
        self.xp.compute_xp(action, conditions, bonus)
    }

    pub fn classify(&self, total_xp: i64) -> Result<Placement<'_>, NegativeXp> {
        self.leagues.classify(total_xp)
    }

    pub fn xp_to_next_rank(&self, total_xp: i64) -> Result<NextRank, NegativeXp> {
        self.leagues.xp_to_next_rank(total_xp)
    }

    pub fn active_season(&self, now: DateTime<Utc>) -> Option<&Season> {
        self.seasons.active_season(now)
    }

    pub fn rank(&self, cohort: &[CohortMember]) -> Result<Vec<RankedStudent>, RankingError> {
        rank(cohort)
    }
}
