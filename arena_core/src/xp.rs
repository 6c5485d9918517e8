use std::{
    collections::HashSet,
    fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::Deserialize;
use thiserror::Error;

pub const BUILTIN_XP_SOURCES: &str = include_str!("data/xp_sources.json");

#[derive(Debug, Clone, Deserialize)]
struct XpCatalogData {
    sources: Vec<XpSource>,
}

/// An XP-granting action with its base award and stacking multipliers.
#[derive(Debug, Clone, Deserialize)]
pub struct XpSource {
    pub action: String,
    pub base_xp: u32,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub multipliers: Vec<XpMultiplier>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct XpMultiplier {
    pub condition: String,
    pub multiplier: f64,
}

#[derive(Debug, Error)]
pub enum XpCatalogError {
    #[error("failed to parse xp catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read xp catalog from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("duplicate xp action {action}")]
    Duplicate { action: String },
    #[error("xp action {action} has a zero base award")]
    ZeroBase { action: String },
    #[error("xp action {action} has a non-positive multiplier for {condition}")]
    BadMultiplier { action: String, condition: String },
}

/// Static registry of XP sources. Award computation is deterministic: the
/// stacking order is the catalog-declaration order of each source's
/// multipliers, never the iteration order of the caller's condition set.
#[derive(Debug, Clone)]
pub struct XpCatalog {
    sources: Vec<XpSource>,
}

impl XpCatalog {
    pub fn builtin() -> Arc<Self> {
        Arc::new(
            Self::from_json_str(BUILTIN_XP_SOURCES)
                .expect("builtin xp catalog should parse and validate"),
        )
    }

    pub fn from_json_str(json: &str) -> Result<Self, XpCatalogError> {
        let data: XpCatalogData = serde_json::from_str(json)?;
        Self::new(data.sources)
    }

    pub fn from_file(path: &Path) -> Result<Self, XpCatalogError> {
        let contents = fs::read_to_string(path).map_err(|source| XpCatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    pub fn new(sources: Vec<XpSource>) -> Result<Self, XpCatalogError> {
        let mut seen = HashSet::new();
        for source in &sources {
            if !seen.insert(source.action.as_str()) {
                return Err(XpCatalogError::Duplicate {
                    action: source.action.clone(),
                });
            }
            if source.base_xp == 0 {
                return Err(XpCatalogError::ZeroBase {
                    action: source.action.clone(),
                });
            }
            for entry in &source.multipliers {
                if entry.multiplier <= 0.0 {
                    return Err(XpCatalogError::BadMultiplier {
                        action: source.action.clone(),
                        condition: entry.condition.clone(),
                    });
                }
            }
        }
        Ok(Self { sources })
    }

    pub fn sources(&self) -> &[XpSource] {
        &self.sources
    }

    pub fn source(&self, action: &str) -> Option<&XpSource> {
        self.sources.iter().find(|source| source.action == action)
    }

    /// XP granted for one action instance. Unknown actions award 0 so a stale
    /// or typoed action name can never corrupt a student's XP total; the miss
    /// is logged for the ops trail. `season_bonus` is the final multiplier
    /// and must only be supplied while a season is active.
    pub fn compute_xp(
        &self,
        action: &str,
        conditions: &HashSet<String>,
        season_bonus: Option<f64>,
    ) -> u32 {
        let Some(source) = self.source(action) else {
            tracing::warn!(
                target: "study_arena::xp",
                action,
                "xp.unknown_action"
            );
            return 0;
        };

        let mut xp = source.base_xp as f64;
        for entry in &source.multipliers {
            if conditions.contains(&entry.condition) {
                xp *= entry.multiplier;
            }
        }
        if let Some(bonus) = season_bonus {
            xp *= bonus;
        }

        xp.floor().max(0.0) as u32
    }
}
