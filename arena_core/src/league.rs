use std::{
    collections::HashSet,
    fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::Deserialize;
use thiserror::Error;

pub const BUILTIN_LEAGUE_TABLE: &str = include_str!("data/leagues.json");

const ROMAN_NUMERALS: [&str; 5] = ["I", "II", "III", "IV", "V"];

#[derive(Debug, Clone, Deserialize)]
struct LeagueTableData {
    leagues: Vec<League>,
}

/// One XP bracket of the ladder. Leagues are static configuration and never
/// mutated after the table is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct League {
    pub id: String,
    pub name: String,
    pub tier: u8,
    pub min_xp: u32,
    /// `None` marks the open-ended top league.
    #[serde(default)]
    pub max_xp: Option<u32>,
    pub division_count: u8,
}

impl League {
    pub fn contains(&self, xp: u64) -> bool {
        xp >= self.min_xp as u64 && self.max_xp.map_or(true, |max| xp <= max as u64)
    }

    fn span(&self) -> f64 {
        (self.max_xp.unwrap_or(self.min_xp + 1000) - self.min_xp) as f64
    }
}

/// League placement computed from a total XP value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement<'a> {
    pub league: &'a League,
    pub division: u8,
}

impl Placement<'_> {
    /// Division as the roman numeral used on rank displays ("Gold III").
    /// Leagues with a single division carry no numeral.
    pub fn division_numeral(&self) -> Option<&'static str> {
        if self.league.division_count <= 1 {
            return None;
        }
        ROMAN_NUMERALS.get(self.division as usize - 1).copied()
    }
}

/// Distance to the next division or league boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NextRank {
    pub needed: u64,
    pub total: u64,
    pub at_max_rank: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("total XP must be non-negative, got {0}")]
pub struct NegativeXp(pub i64);

#[derive(Debug, Error)]
pub enum LeagueTableError {
    #[error("failed to parse league table: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read league table from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("league table is empty")]
    Empty,
    #[error("duplicate league id {id}")]
    Duplicate { id: String },
    #[error("duplicate league tier {tier}")]
    DuplicateTier { tier: u8 },
    #[error("league {id} has no divisions")]
    NoDivisions { id: String },
    #[error("league {id} xp range is inverted or empty")]
    InvertedRange { id: String },
    #[error("top league {id} must be open-ended")]
    BoundedTop { id: String },
    #[error("league {id} below the top must have a max xp")]
    UnboundedInterior { id: String },
    #[error("lowest league {id} must start at 0 xp")]
    NonZeroFloor { id: String },
    #[error("xp gap or overlap between {upper} and {lower}: {lower} ends at {end}, {upper} starts at {start}")]
    Discontinuity {
        upper: String,
        lower: String,
        end: u32,
        start: u32,
    },
}

/// The ordered ladder of leagues, highest tier first. The ranges partition
/// XP space from 0 upward with no gaps or overlaps; [`LeagueTable::new`]
/// rejects any table violating that.
#[derive(Debug, Clone)]
pub struct LeagueTable {
    leagues: Vec<League>,
}

impl LeagueTable {
    pub fn builtin() -> Arc<Self> {
        Arc::new(
            Self::from_json_str(BUILTIN_LEAGUE_TABLE)
                .expect("builtin league table should parse and validate"),
        )
    }

    pub fn from_json_str(json: &str) -> Result<Self, LeagueTableError> {
        let data: LeagueTableData = serde_json::from_str(json)?;
        Self::new(data.leagues)
    }

    pub fn from_file(path: &Path) -> Result<Self, LeagueTableError> {
        let contents = fs::read_to_string(path).map_err(|source| LeagueTableError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    pub fn new(mut leagues: Vec<League>) -> Result<Self, LeagueTableError> {
        leagues.sort_by(|a, b| b.tier.cmp(&a.tier));
        let table = Self { leagues };
        table.validate()?;
        Ok(table)
    }

    fn validate(&self) -> Result<(), LeagueTableError> {
        if self.leagues.is_empty() {
            return Err(LeagueTableError::Empty);
        }

        let mut ids = HashSet::new();
        let mut tiers = HashSet::new();
        for league in &self.leagues {
            if !ids.insert(league.id.as_str()) {
                return Err(LeagueTableError::Duplicate {
                    id: league.id.clone(),
                });
            }
            if !tiers.insert(league.tier) {
                return Err(LeagueTableError::DuplicateTier { tier: league.tier });
            }
            if league.division_count == 0 {
                return Err(LeagueTableError::NoDivisions {
                    id: league.id.clone(),
                });
            }
            if let Some(max) = league.max_xp {
                if max <= league.min_xp {
                    return Err(LeagueTableError::InvertedRange {
                        id: league.id.clone(),
                    });
                }
            }
        }

        let top = &self.leagues[0];
        if top.max_xp.is_some() {
            return Err(LeagueTableError::BoundedTop { id: top.id.clone() });
        }

        let bottom = self.leagues.last().expect("table is non-empty");
        if bottom.min_xp != 0 {
            return Err(LeagueTableError::NonZeroFloor {
                id: bottom.id.clone(),
            });
        }

        for pair in self.leagues.windows(2) {
            let (upper, lower) = (&pair[0], &pair[1]);
            let end = lower.max_xp.ok_or_else(|| LeagueTableError::UnboundedInterior {
                id: lower.id.clone(),
            })?;
            if end + 1 != upper.min_xp {
                return Err(LeagueTableError::Discontinuity {
                    upper: upper.id.clone(),
                    lower: lower.id.clone(),
                    end,
                    start: upper.min_xp,
                });
            }
        }

        Ok(())
    }

    pub fn leagues(&self) -> &[League] {
        &self.leagues
    }

    pub fn league(&self, id: &str) -> Option<&League> {
        self.leagues.iter().find(|league| league.id == id)
    }

    pub fn lowest(&self) -> &League {
        self.leagues.last().expect("table is non-empty")
    }

    /// Map a total XP value to its league and division. Negative totals are
    /// rejected at the boundary rather than clamped, so an upstream sign bug
    /// cannot masquerade as a Bronze placement.
    pub fn classify(&self, total_xp: i64) -> Result<Placement<'_>, NegativeXp> {
        if total_xp < 0 {
            return Err(NegativeXp(total_xp));
        }
        let xp = total_xp as u64;

        for league in &self.leagues {
            if league.contains(xp) {
                return Ok(Placement {
                    league,
                    division: division_for(league, xp),
                });
            }
        }

        // Unreachable with a validated table; degrade to the entry rank.
        let league = self.lowest();
        tracing::warn!(
            target: "study_arena::league",
            xp,
            "league.classify_fallback"
        );
        Ok(Placement {
            league,
            division: league.division_count,
        })
    }

    /// XP still needed for the next division or league. `needed` counts from
    /// `total_xp` to the boundary, `total` is the full width of the step.
    pub fn xp_to_next_rank(&self, total_xp: i64) -> Result<NextRank, NegativeXp> {
        let placement = self.classify(total_xp)?;
        let league = placement.league;
        let xp = total_xp as u64;

        if league.max_xp.is_none() {
            return Ok(NextRank {
                needed: 0,
                total: 0,
                at_max_rank: true,
            });
        }

        if placement.division == league.division_count {
            if let Some(next) = self.league_above(league) {
                return Ok(NextRank {
                    needed: (next.min_xp as u64).saturating_sub(xp),
                    total: (next.min_xp - league.min_xp) as u64,
                    at_max_rank: false,
                });
            }
            return Ok(NextRank {
                needed: 0,
                total: 0,
                at_max_rank: true,
            });
        }

        let bucket = league.span() / league.division_count as f64;
        let boundary = league.min_xp as f64 + placement.division as f64 * bucket;
        Ok(NextRank {
            needed: (boundary - xp as f64).ceil().max(0.0) as u64,
            total: bucket.ceil() as u64,
            at_max_rank: false,
        })
    }

    fn league_above(&self, league: &League) -> Option<&League> {
        let index = self
            .leagues
            .iter()
            .position(|entry| entry.id == league.id)?;
        index.checked_sub(1).map(|above| &self.leagues[above])
    }
}

fn division_for(league: &League, xp: u64) -> u8 {
    if league.division_count <= 1 {
        return 1;
    }
    let bucket = league.span() / league.division_count as f64;
    let xp_in_league = (xp - league.min_xp as u64) as f64;
    // The +1 keeps the exact league floor inside division 1.
    let raw = ((xp_in_league + 1.0) / bucket).ceil() as i64;
    raw.clamp(1, league.division_count as i64) as u8
}
