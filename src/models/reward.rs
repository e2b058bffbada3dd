use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{GameError, Result};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
    Mythic,
    Divine,
    Celestial,
    Transcendent,
    Omnipotent,
}

impl Rarity {
    pub const ALL: [Rarity; 10] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::Epic,
        Rarity::Legendary,
        Rarity::Mythic,
        Rarity::Divine,
        Rarity::Celestial,
        Rarity::Transcendent,
        Rarity::Omnipotent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Rarity::Common => "Common",
            Rarity::Uncommon => "Uncommon",
            Rarity::Rare => "Rare",
            Rarity::Epic => "Epic",
            Rarity::Legendary => "Legendary",
            Rarity::Mythic => "Mythic",
            Rarity::Divine => "Divine",
            Rarity::Celestial => "Celestial",
            Rarity::Transcendent => "Transcendent",
            Rarity::Omnipotent => "Omnipotent",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Rarity::ALL
            .iter()
            .copied()
            .find(|r| r.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

/// What an entry pays out before the lucky multiplier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RewardValue {
    Fixed(u64),
    Range { min: u64, max: u64 },
}

impl RewardValue {
    pub fn bounds(&self) -> (u64, u64) {
        match *self {
            RewardValue::Fixed(v) => (v, v),
            RewardValue::Range { min, max } => (min, max),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RewardEntry {
    pub label: String,
    pub value: RewardValue,
    pub weight: f64,
    pub rarity: Rarity,
    pub color: Option<String>,
}

impl RewardEntry {
    pub fn fixed(label: &str, value: u64, weight: f64, rarity: Rarity) -> Self {
        Self {
            label: label.to_string(),
            value: RewardValue::Fixed(value),
            weight,
            rarity,
            color: None,
        }
    }

    pub fn ranged(label: &str, min: u64, max: u64, weight: f64, rarity: Rarity, color: &str) -> Self {
        Self {
            label: label.to_string(),
            value: RewardValue::Range { min, max },
            weight,
            rarity,
            color: Some(color.to_string()),
        }
    }
}

/// A named group of weighted rewards with an entry cost.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RewardTable {
    pub name: String,
    pub cost: u64,
    pub entries: Vec<RewardEntry>,
}

impl RewardTable {
    pub fn validate(&self) -> Result<()> {
        if self.entries.is_empty() {
            return Err(GameError::Configuration(format!(
                "reward table '{}' has no entries",
                self.name
            )));
        }

        for entry in &self.entries {
            if !entry.weight.is_finite() || entry.weight < 0.0 {
                return Err(GameError::Configuration(format!(
                    "entry '{}' in '{}' has invalid weight {}",
                    entry.label, self.name, entry.weight
                )));
            }
            if let RewardValue::Range { min, max } = entry.value {
                if min > max {
                    return Err(GameError::Configuration(format!(
                        "entry '{}' in '{}' has min {} above max {}",
                        entry.label, self.name, min, max
                    )));
                }
            }
        }

        Ok(())
    }

    pub fn total_weight(&self) -> f64 {
        self.entries.iter().map(|e| e.weight).sum()
    }
}

/// Result of one selector draw.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RewardOutcome {
    pub label: String,
    pub rarity: Rarity,
    pub color: Option<String>,
    pub min_value: u64,
    pub max_value: u64,
    /// Value drawn inside `[min_value, max_value]`.
    pub rolled_value: u64,
    /// `rolled_value` after the lucky multiplier.
    pub value: u64,
    pub lucky: bool,
}

/// An outcome once it lands in a player's collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OwnedAura {
    pub id: Uuid,
    pub name: String,
    pub rarity: Rarity,
    pub value: u64,
    pub color: Option<String>,
    pub min_value: u64,
    pub max_value: u64,
    pub lucky: bool,
    pub obtained_at: DateTime<Utc>,
}

impl OwnedAura {
    pub fn from_outcome(outcome: &RewardOutcome, obtained_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: outcome.label.clone(),
            rarity: outcome.rarity,
            value: outcome.value,
            color: outcome.color.clone(),
            min_value: outcome.min_value,
            max_value: outcome.max_value,
            lucky: outcome.lucky,
            obtained_at,
        }
    }
}
