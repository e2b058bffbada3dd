use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

use super::Rarity;

/// Condition an achievement waits for.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub enum AchievementTrigger {
    RollCount(u64),
    RarityAtLeast(Rarity),
    ValueAtLeast(u64),
    CollectionSize(usize),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct AchievementGrant {
    pub coins: u64,
    pub luck: f64,
}

/// Static definition of an achievement.
#[derive(Debug, Clone, Serialize)]
pub struct AchievementDef {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub trigger: AchievementTrigger,
    pub grant: AchievementGrant,
}

/// Record of an unlocked achievement, stored on the player.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UnlockedAchievement {
    pub id: String,
    pub name: String,
    pub description: String,
    pub unlocked_at: DateTime<Utc>,
    pub grant: AchievementGrant,
}

impl UnlockedAchievement {
    pub fn from_def(def: &AchievementDef, unlocked_at: DateTime<Utc>) -> Self {
        Self {
            id: def.id.to_string(),
            name: def.name.to_string(),
            description: def.description.to_string(),
            unlocked_at,
            grant: def.grant,
        }
    }
}
