use std::{
    collections::{HashMap, HashSet},
    fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::Deserialize;
use thiserror::Error;

pub const BUILTIN_ACHIEVEMENTS: &str = include_str!("data/achievements.json");

#[derive(Debug, Clone, Deserialize)]
struct AchievementCatalogData {
    achievements: Vec<Achievement>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rarity::Common => "common",
            Rarity::Rare => "rare",
            Rarity::Epic => "epic",
            Rarity::Legendary => "legendary",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Study,
    Performance,
    Social,
    Special,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Study => "study",
            Category::Performance => "performance",
            Category::Social => "social",
            Category::Special => "special",
        }
    }
}

/// Threshold an achievement unlocks at. `metric` names an entry of the
/// caller's metric snapshot; requirements with a `timeframe` rely on the
/// caller having already folded the time-of-day condition into that metric
/// (this module does no clock arithmetic).
#[derive(Debug, Clone, Deserialize)]
pub struct AchievementRequirement {
    pub metric: String,
    pub value: f64,
    #[serde(default)]
    pub timeframe: Option<String>,
}

/// A one-time unlockable milestone. Definitions are static; the unlocked
/// state lives with the caller, never on the definition.
#[derive(Debug, Clone, Deserialize)]
pub struct Achievement {
    pub id: String,
    pub name: String,
    pub description: String,
    pub rarity: Rarity,
    pub category: Category,
    pub requirement: AchievementRequirement,
    pub xp_reward: u32,
}

#[derive(Debug, Error)]
pub enum AchievementCatalogError {
    #[error("failed to parse achievement catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read achievement catalog from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("duplicate achievement id {id}")]
    Duplicate { id: String },
    #[error("achievement {id} has a non-positive requirement value")]
    BadThreshold { id: String },
}

#[derive(Debug, Clone)]
pub struct AchievementCatalog {
    achievements: Vec<Achievement>,
}

impl AchievementCatalog {
    pub fn builtin() -> Arc<Self> {
        Arc::new(
            Self::from_json_str(BUILTIN_ACHIEVEMENTS)
                .expect("builtin achievement catalog should parse and validate"),
        )
    }

    pub fn from_json_str(json: &str) -> Result<Self, AchievementCatalogError> {
        let data: AchievementCatalogData = serde_json::from_str(json)?;
        Self::new(data.achievements)
    }

    pub fn from_file(path: &Path) -> Result<Self, AchievementCatalogError> {
        let contents = fs::read_to_string(path).map_err(|source| AchievementCatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    pub fn new(achievements: Vec<Achievement>) -> Result<Self, AchievementCatalogError> {
        let mut seen = HashSet::new();
        for achievement in &achievements {
            if !seen.insert(achievement.id.as_str()) {
                return Err(AchievementCatalogError::Duplicate {
                    id: achievement.id.clone(),
                });
            }
            if achievement.requirement.value <= 0.0 {
                return Err(AchievementCatalogError::BadThreshold {
                    id: achievement.id.clone(),
                });
            }
        }
        Ok(Self { achievements })
    }

    pub fn achievements(&self) -> &[Achievement] {
        &self.achievements
    }

    pub fn achievement(&self, id: &str) -> Option<&Achievement> {
        self.achievements.iter().find(|entry| entry.id == id)
    }

    pub fn by_category(&self, category: Category) -> Vec<&Achievement> {
        self.achievements
            .iter()
            .filter(|entry| entry.category == category)
            .collect()
    }

    /// Achievements whose threshold the metric snapshot now meets, minus the
    /// ones already unlocked. A metric meets its requirement when it equals
    /// or exceeds the threshold. Re-running with the same inputs returns the
    /// same set, so the caller can persist unlocks idempotently.
    pub fn newly_unlocked<'a>(
        &'a self,
        metrics: &HashMap<String, f64>,
        already_unlocked: &HashSet<String>,
    ) -> Vec<&'a Achievement> {
        let unlocked: Vec<&Achievement> = self
            .achievements
            .iter()
            .filter(|entry| !already_unlocked.contains(&entry.id))
            .filter(|entry| {
                metrics
                    .get(&entry.requirement.metric)
                    .map_or(false, |value| *value >= entry.requirement.value)
            })
            .collect();

        for achievement in &unlocked {
            tracing::info!(
                target: "study_arena::achievement",
                id = %achievement.id,
                rarity = achievement.rarity.as_str(),
                xp_reward = achievement.xp_reward,
                "achievement.unlocked"
            );
        }

        unlocked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(entries: &[(&str, f64)]) -> HashMap<String, f64> {
        entries
            .iter()
            .map(|(name, value)| (name.to_string(), *value))
            .collect()
    }

    #[test]
    fn streak_threshold_uses_meets_or_exceeds() {
        let catalog = AchievementCatalog::builtin();
        let none = HashSet::new();

        let below = catalog.newly_unlocked(&metrics(&[("daily_streak", 6.0)]), &none);
        assert!(below.iter().all(|a| a.id != "fire_streak"));

        let exact = catalog.newly_unlocked(&metrics(&[("daily_streak", 7.0)]), &none);
        assert!(exact.iter().any(|a| a.id == "fire_streak"));

        let above = catalog.newly_unlocked(&metrics(&[("daily_streak", 31.0)]), &none);
        assert!(above.iter().any(|a| a.id == "fire_streak"));
        assert!(above.iter().any(|a| a.id == "unstoppable"));
    }

    #[test]
    fn already_unlocked_is_never_returned_again() {
        let catalog = AchievementCatalog::builtin();
        let snapshot = metrics(&[("daily_streak", 7.0), ("sessions_completed", 3.0)]);

        let first = catalog.newly_unlocked(&snapshot, &HashSet::new());
        let first_ids: HashSet<String> = first.iter().map(|a| a.id.clone()).collect();
        assert!(first_ids.contains("fire_streak"));
        assert!(first_ids.contains("first_session"));

        let second = catalog.newly_unlocked(&snapshot, &first_ids);
        assert!(second.is_empty());
    }

    #[test]
    fn timeframe_requirements_read_the_encoded_metric() {
        let catalog = AchievementCatalog::builtin();
        let none = HashSet::new();

        let unlocked = catalog.newly_unlocked(&metrics(&[("early_session", 1.0)]), &none);
        assert!(unlocked.iter().any(|a| a.id == "early_bird"));

        let missing = catalog.newly_unlocked(&metrics(&[("late_session", 0.0)]), &none);
        assert!(missing.iter().all(|a| a.id != "night_owl"));
    }

    #[test]
    fn unrelated_metrics_unlock_nothing() {
        let catalog = AchievementCatalog::builtin();
        let unlocked =
            catalog.newly_unlocked(&metrics(&[("nonexistent_metric", 9_999.0)]), &HashSet::new());
        assert!(unlocked.is_empty());
    }

    #[test]
    fn category_filter_groups_definitions() {
        let catalog = AchievementCatalog::builtin();
        let social = catalog.by_category(Category::Social);
        assert_eq!(social.len(), 2);
        assert!(social.iter().all(|a| a.category == Category::Social));
    }

    #[test]
    fn rewards_come_from_the_definition() {
        let catalog = AchievementCatalog::builtin();
        assert_eq!(catalog.achievement("champion").unwrap().xp_reward, 2_000);
        assert_eq!(
            catalog.achievement("champion").unwrap().rarity,
            Rarity::Legendary
        );
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let achievement = Achievement {
            id: "dup".to_string(),
            name: "Dup".to_string(),
            description: String::new(),
            rarity: Rarity::Common,
            category: Category::Study,
            requirement: AchievementRequirement {
                metric: "anything".to_string(),
                value: 1.0,
                timeframe: None,
            },
            xp_reward: 10,
        };
        let result = AchievementCatalog::new(vec![achievement.clone(), achievement]);
        assert!(matches!(result, Err(AchievementCatalogError::Duplicate { .. })));
    }
}
