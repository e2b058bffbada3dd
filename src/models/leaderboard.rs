use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::Account;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum LeaderboardCategory {
    HighestAura,
    TotalRolls,
    TotalCoins,
    ChestScore,
}

impl LeaderboardCategory {
    /// Categories derived from persisted player state.
    pub const PLAYER: [LeaderboardCategory; 3] = [
        LeaderboardCategory::HighestAura,
        LeaderboardCategory::TotalRolls,
        LeaderboardCategory::TotalCoins,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LeaderboardCategory::HighestAura => "highest_aura",
            LeaderboardCategory::TotalRolls => "total_rolls",
            LeaderboardCategory::TotalCoins => "total_coins",
            LeaderboardCategory::ChestScore => "chest_score",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "highest_aura" | "highest" => Some(LeaderboardCategory::HighestAura),
            "total_rolls" | "rolls" => Some(LeaderboardCategory::TotalRolls),
            "total_coins" | "coins" => Some(LeaderboardCategory::TotalCoins),
            "chest_score" | "chest" => Some(LeaderboardCategory::ChestScore),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeaderboardEntry {
    pub holder: String,
    pub account_id: Option<Uuid>,
    pub category: LeaderboardCategory,
    pub value: u64,
    pub updated_at: DateTime<Utc>,
}

impl LeaderboardEntry {
    /// One entry per player category, reflecting the account right now.
    pub fn for_account(account: &Account, updated_at: DateTime<Utc>) -> Vec<LeaderboardEntry> {
        LeaderboardCategory::PLAYER
            .iter()
            .map(|&category| {
                let value = match category {
                    LeaderboardCategory::HighestAura => account.state.highest_value_aura,
                    LeaderboardCategory::TotalRolls => account.state.total_rolls,
                    _ => account.state.coins,
                };
                LeaderboardEntry {
                    holder: account.username.clone(),
                    account_id: Some(account.id),
                    category,
                    value,
                    updated_at,
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RankedEntry {
    pub rank: usize,
    pub holder: String,
    pub value: u64,
    pub updated_at: DateTime<Utc>,
}
