use std::{
    collections::HashSet,
    fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};

use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

use crate::achievement::Rarity;
use crate::league::LeagueTable;

pub const BUILTIN_SEASON_CALENDAR: &str = include_str!("data/seasons.json");

#[derive(Debug, Clone, Deserialize)]
struct SeasonCalendarData {
    seasons: Vec<Season>,
}

/// A time-boxed competitive period with its rewards and bonus events.
#[derive(Debug, Clone, Deserialize)]
pub struct Season {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub theme: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(default)]
    pub rewards: Vec<SeasonReward>,
    #[serde(default)]
    pub special_events: Vec<SeasonEvent>,
}

impl Season {
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        now >= self.start_date && now <= self.end_date
    }

    pub fn days_remaining(&self, now: DateTime<Utc>) -> i64 {
        if now >= self.end_date {
            return 0;
        }
        (self.end_date - now).num_days()
    }

    pub fn active_event(&self, now: DateTime<Utc>) -> Option<&SeasonEvent> {
        self.special_events
            .iter()
            .find(|event| now >= event.start_date && now <= event.end_date)
    }

    /// Rewards the student's current standing has earned. Rank requirements
    /// compare the best league tier reached this season against the tier of
    /// the league the reward names.
    pub fn unlocked_rewards(
        &self,
        standing: &SeasonStanding,
        leagues: &LeagueTable,
    ) -> Vec<&SeasonReward> {
        self.rewards
            .iter()
            .filter(|reward| requirement_met(&reward.requirement, standing, leagues))
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeasonReward {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub requirement: RewardRequirement,
    pub rarity: Rarity,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum RewardRequirement {
    /// Reach the named league at any point in the season.
    Rank(String),
    /// Accumulate this much XP within the season.
    Xp(u32),
    /// Unlock the named achievement.
    Achievement(String),
    /// Caller-defined flag (first-to-finish challenges and the like).
    Special(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeasonEvent {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub bonus_xp: f64,
}

/// Snapshot of one student's season-relative state, supplied by the caller
/// when evaluating season rewards.
#[derive(Debug, Clone, Default)]
pub struct SeasonStanding {
    pub best_tier: u8,
    pub season_xp: u64,
    pub achievements: HashSet<String>,
    pub special_flags: HashSet<String>,
}

fn requirement_met(
    requirement: &RewardRequirement,
    standing: &SeasonStanding,
    leagues: &LeagueTable,
) -> bool {
    match requirement {
        RewardRequirement::Rank(league_id) => leagues
            .league(league_id)
            .map_or(false, |league| standing.best_tier >= league.tier),
        RewardRequirement::Xp(threshold) => standing.season_xp >= *threshold as u64,
        RewardRequirement::Achievement(id) => standing.achievements.contains(id),
        RewardRequirement::Special(flag) => standing.special_flags.contains(flag),
    }
}

#[derive(Debug, Error)]
pub enum SeasonCalendarError {
    #[error("failed to parse season calendar: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read season calendar from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("duplicate season id {id}")]
    Duplicate { id: String },
    #[error("season {id} ends before it starts")]
    InvertedWindow { id: String },
    #[error("event {event} in season {season} ends before it starts")]
    InvertedEventWindow { season: String, event: String },
    #[error("event {event} falls outside season {season}")]
    EventOutsideSeason { season: String, event: String },
    #[error("event {event} in season {season} has a non-positive bonus")]
    BadEventBonus { season: String, event: String },
    #[error("seasons {first} and {second} overlap")]
    Overlap { first: String, second: String },
}

/// The season schedule. At most one season may cover any instant, so
/// overlapping windows are a configuration error caught at load.
#[derive(Debug, Clone)]
pub struct SeasonCalendar {
    seasons: Vec<Season>,
}

impl SeasonCalendar {
    pub fn builtin() -> Arc<Self> {
        Arc::new(
            Self::from_json_str(BUILTIN_SEASON_CALENDAR)
                .expect("builtin season calendar should parse and validate"),
        )
    }

    pub fn from_json_str(json: &str) -> Result<Self, SeasonCalendarError> {
        let data: SeasonCalendarData = serde_json::from_str(json)?;
        Self::new(data.seasons)
    }

    pub fn from_file(path: &Path) -> Result<Self, SeasonCalendarError> {
        let contents = fs::read_to_string(path).map_err(|source| SeasonCalendarError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    pub fn new(mut seasons: Vec<Season>) -> Result<Self, SeasonCalendarError> {
        seasons.sort_by_key(|season| season.start_date);
        let calendar = Self { seasons };
        calendar.validate()?;
        Ok(calendar)
    }

    fn validate(&self) -> Result<(), SeasonCalendarError> {
        let mut ids = HashSet::new();
        for season in &self.seasons {
            if !ids.insert(season.id.as_str()) {
                return Err(SeasonCalendarError::Duplicate {
                    id: season.id.clone(),
                });
            }
            if season.end_date <= season.start_date {
                return Err(SeasonCalendarError::InvertedWindow {
                    id: season.id.clone(),
                });
            }
            for event in &season.special_events {
                if event.end_date <= event.start_date {
                    return Err(SeasonCalendarError::InvertedEventWindow {
                        season: season.id.clone(),
                        event: event.id.clone(),
                    });
                }
                if event.start_date < season.start_date || event.end_date > season.end_date {
                    return Err(SeasonCalendarError::EventOutsideSeason {
                        season: season.id.clone(),
                        event: event.id.clone(),
                    });
                }
                if event.bonus_xp <= 0.0 {
                    return Err(SeasonCalendarError::BadEventBonus {
                        season: season.id.clone(),
                        event: event.id.clone(),
                    });
                }
            }
        }

        for pair in self.seasons.windows(2) {
            if pair[1].start_date <= pair[0].end_date {
                return Err(SeasonCalendarError::Overlap {
                    first: pair[0].id.clone(),
                    second: pair[1].id.clone(),
                });
            }
        }

        Ok(())
    }

    pub fn seasons(&self) -> &[Season] {
        &self.seasons
    }

    pub fn season(&self, id: &str) -> Option<&Season> {
        self.seasons.iter().find(|season| season.id == id)
    }

    pub fn active_season(&self, now: DateTime<Utc>) -> Option<&Season> {
        self.seasons.iter().find(|season| season.is_active(now))
    }

    /// Bonus multiplier of the special event covering `now`, if the active
    /// season is running one. Feeds the season-bonus step of XP awards.
    pub fn active_bonus(&self, now: DateTime<Utc>) -> Option<f64> {
        self.active_season(now)?
            .active_event(now)
            .map(|event| event.bonus_xp)
    }
}

/// Season-relative progress for display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeasonProgress {
    pub percent_complete: f64,
    pub xp_per_day_needed: u64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SeasonProgressError {
    #[error("season target XP must be positive")]
    ZeroTarget,
    #[error("current XP {current} is below the season-start XP {start}")]
    XpRegression { current: u64, start: u64 },
}

/// Progress toward a season XP target. A current total below the recorded
/// season-start XP implies XP loss upstream and is surfaced as an error
/// rather than clamped away, so the data problem stays visible.
pub fn season_progress(
    current_xp: u64,
    season_start_xp: u64,
    target_xp: u64,
    days_remaining: i64,
) -> Result<SeasonProgress, SeasonProgressError> {
    if target_xp == 0 {
        return Err(SeasonProgressError::ZeroTarget);
    }
    if current_xp < season_start_xp {
        tracing::warn!(
            target: "study_arena::season",
            current_xp,
            season_start_xp,
            "season.xp_regression"
        );
        return Err(SeasonProgressError::XpRegression {
            current: current_xp,
            start: season_start_xp,
        });
    }

    let season_xp = current_xp - season_start_xp;
    let percent_complete = ((season_xp as f64 / target_xp as f64) * 100.0).clamp(0.0, 100.0);

    let deficit = target_xp as i64 - season_xp as i64;
    let xp_per_day_needed = if deficit <= 0 || days_remaining <= 0 {
        0
    } else {
        (deficit as f64 / days_remaining as f64).ceil() as u64
    };

    Ok(SeasonProgress {
        percent_complete,
        xp_per_day_needed,
    })
}
