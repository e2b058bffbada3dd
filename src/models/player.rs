use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use uuid::Uuid;

use super::{OwnedAura, Rarity, UnlockedAchievement};

/// Time-boxed additive luck bonus.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivePotion {
    pub multiplier: f64,
    pub expires_at: DateTime<Utc>,
    pub kind: String,
}

impl ActivePotion {
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

/// Mutable progression record owned by one account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerState {
    pub coins: u64,
    pub total_rolls: u64,
    pub base_luck: f64,
    pub permanent_luck_bonus: f64,
    pub auras: Vec<OwnedAura>,
    pub achievements: Vec<UnlockedAchievement>,
    pub active_potions: Vec<ActivePotion>,
    pub highest_value_aura: u64,
    pub last_daily_reward: Option<DateTime<Utc>>,
    pub streak_days: u32,
    pub starter_bundle_claimed: bool,
}

impl PlayerState {
    pub fn new(starting_coins: u64, base_luck: f64) -> Self {
        Self {
            coins: starting_coins,
            total_rolls: 0,
            base_luck,
            permanent_luck_bonus: 0.0,
            auras: Vec::new(),
            achievements: Vec::new(),
            active_potions: Vec::new(),
            highest_value_aura: 0,
            last_daily_reward: None,
            streak_days: 0,
            starter_bundle_claimed: false,
        }
    }

    pub fn has_achievement(&self, id: &str) -> bool {
        self.achievements.iter().any(|a| a.id == id)
    }

    pub fn rarity_counts(&self) -> BTreeMap<Rarity, usize> {
        let mut counts = BTreeMap::new();
        for aura in &self.auras {
            *counts.entry(aura.rarity).or_insert(0) += 1;
        }
        counts
    }
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new(1000, 1.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub state: PlayerState,
    pub created_at: DateTime<Utc>,
    pub last_login: DateTime<Utc>,
}

impl Account {
    pub fn new(username: String, email: String, state: PlayerState) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username,
            email,
            state,
            created_at: now,
            last_login: now,
        }
    }

    /// Usernames match exactly (case-sensitive); emails are stored lowercase
    /// and match case-insensitively.
    pub fn matches_login(&self, identifier: &str) -> bool {
        self.username == identifier || self.email == identifier.to_lowercase()
    }
}

/// Read-only summary shown on a player's profile page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub username: String,
    pub email: String,
    pub total_auras: usize,
    pub highest_value_aura: u64,
    pub total_rolls: u64,
    pub total_coins: u64,
    pub achievements_unlocked: usize,
    pub streak_days: u32,
    pub member_since: DateTime<Utc>,
    pub last_login: DateTime<Utc>,
    pub rarity_counts: BTreeMap<Rarity, usize>,
}

impl ProfileSummary {
    pub fn from_account(account: &Account) -> Self {
        let state = &account.state;
        Self {
            username: account.username.clone(),
            email: account.email.clone(),
            total_auras: state.auras.len(),
            highest_value_aura: state.highest_value_aura,
            total_rolls: state.total_rolls,
            total_coins: state.coins,
            achievements_unlocked: state.achievements.len(),
            streak_days: state.streak_days,
            member_since: account.created_at,
            last_login: account.last_login,
            rarity_counts: state.rarity_counts(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_potion_expiry_is_exclusive() {
        let now = Utc::now();
        let potion = ActivePotion { multiplier: 2.0, expires_at: now, kind: "test".to_string() };
        assert!(!potion.is_active(now));
        assert!(potion.is_active(now - Duration::seconds(1)));
    }

    #[test]
    fn test_login_matches_username_or_email() {
        let account = Account::new(
            "explorer".to_string(),
            "explorer@example.com".to_string(),
            PlayerState::default(),
        );
        assert!(account.matches_login("explorer"));
        assert!(account.matches_login("Explorer@Example.com"));
        assert!(!account.matches_login("someone"));
    }

    #[test]
    fn test_username_login_is_case_sensitive() {
        let account = Account::new(
            "Explorer".to_string(),
            "explorer@example.com".to_string(),
            PlayerState::default(),
        );
        assert!(account.matches_login("Explorer"));
        assert!(!account.matches_login("explorer"));
        assert!(!account.matches_login("EXPLORER"));
    }

    #[test]
    fn test_rarity_counts() {
        let mut state = PlayerState::default();
        for rarity in [Rarity::Common, Rarity::Common, Rarity::Epic] {
            state.auras.push(OwnedAura {
                id: Uuid::new_v4(),
                name: "Aura".to_string(),
                rarity,
                value: 10,
                color: None,
                min_value: 1,
                max_value: 100,
                lucky: false,
                obtained_at: Utc::now(),
            });
        }
        let counts = state.rarity_counts();
        assert_eq!(counts.get(&Rarity::Common), Some(&2));
        assert_eq!(counts.get(&Rarity::Epic), Some(&1));
        assert_eq!(counts.get(&Rarity::Rare), None);
    }
}
