use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::debug;
use uuid::Uuid;

use crate::{
    models::{Account, GameError, LeaderboardCategory, LeaderboardEntry, Result},
    rolling::MAX_LEADERBOARD_LIMIT,
    store::AccountStore,
};

fn poisoned() -> GameError {
    GameError::Unexpected("memory store lock poisoned".to_string())
}

/// Process-local store. Contents vanish when the process exits.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    accounts: Arc<RwLock<HashMap<Uuid, Account>>>,
    // Insertion order doubles as the tie-breaker.
    leaderboard: Arc<RwLock<Vec<LeaderboardEntry>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn account_count(&self) -> usize {
        self.accounts.read().map(|a| a.len()).unwrap_or(0)
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn insert_account(&self, account: &Account) -> Result<()> {
        let mut accounts = self.accounts.write().map_err(|_| poisoned())?;

        let clash = accounts
            .values()
            .any(|a| a.username == account.username || a.email == account.email);
        if clash || accounts.contains_key(&account.id) {
            return Err(GameError::AlreadyExists(format!(
                "username or email already registered: {}",
                account.username
            )));
        }

        accounts.insert(account.id, account.clone());
        debug!("Inserted account {} into memory store", account.id);
        Ok(())
    }

    async fn find_account(&self, id: Uuid) -> Result<Option<Account>> {
        let accounts = self.accounts.read().map_err(|_| poisoned())?;
        Ok(accounts.get(&id).cloned())
    }

    async fn find_by_login(&self, identifier: &str) -> Result<Option<Account>> {
        let accounts = self.accounts.read().map_err(|_| poisoned())?;
        Ok(accounts.values().find(|a| a.matches_login(identifier)).cloned())
    }

    async fn save_account(&self, account: &Account) -> Result<()> {
        let mut accounts = self.accounts.write().map_err(|_| poisoned())?;
        match accounts.get_mut(&account.id) {
            Some(slot) => {
                *slot = account.clone();
                Ok(())
            }
            None => Err(GameError::NotFound(format!("account {}", account.id))),
        }
    }

    async fn upsert_leaderboard(&self, entry: &LeaderboardEntry) -> Result<()> {
        let mut rows = self.leaderboard.write().map_err(|_| poisoned())?;
        let existing = rows.iter_mut().find(|r| {
            r.category == entry.category && r.account_id.is_some() && r.account_id == entry.account_id
        });

        match existing {
            Some(row) => *row = entry.clone(),
            None => rows.push(entry.clone()),
        }
        Ok(())
    }

    async fn leaderboard(&self, category: LeaderboardCategory, limit: usize) -> Result<Vec<LeaderboardEntry>> {
        let rows = self.leaderboard.read().map_err(|_| poisoned())?;
        let mut matching: Vec<LeaderboardEntry> = rows
            .iter()
            .filter(|r| r.category == category)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.value.cmp(&a.value));
        matching.truncate(limit.clamp(1, MAX_LEADERBOARD_LIMIT));
        Ok(matching)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PlayerState;
    use chrono::Utc;

    fn account(name: &str) -> Account {
        Account::new(name.to_string(), format!("{}@example.com", name), PlayerState::default())
    }

    #[tokio::test]
    async fn test_insert_and_lookup() {
        let store = MemoryStore::new();
        let acc = account("hunter");
        store.insert_account(&acc).await.unwrap();

        assert_eq!(store.find_account(acc.id).await.unwrap(), Some(acc.clone()));
        assert_eq!(store.find_by_login("hunter").await.unwrap().map(|a| a.id), Some(acc.id));
        assert_eq!(store.find_by_login("HUNTER@example.com").await.unwrap().map(|a| a.id), Some(acc.id));
        assert!(store.find_by_login("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let store = MemoryStore::new();
        store.insert_account(&account("hunter")).await.unwrap();
        let dup = store.insert_account(&account("hunter")).await;
        assert!(matches!(dup, Err(GameError::AlreadyExists(_))));
        assert_eq!(store.account_count(), 1);
    }

    #[tokio::test]
    async fn test_save_unknown_account_fails() {
        let store = MemoryStore::new();
        let result = store.save_account(&account("ghost")).await;
        assert!(matches!(result, Err(GameError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_upsert_keeps_position() {
        let store = MemoryStore::new();
        let a = account("alpha");
        let b = account("beta");
        let row = |acc: &Account, value| LeaderboardEntry {
            holder: acc.username.clone(),
            account_id: Some(acc.id),
            category: LeaderboardCategory::TotalRolls,
            value,
            updated_at: Utc::now(),
        };

        store.upsert_leaderboard(&row(&a, 5)).await.unwrap();
        store.upsert_leaderboard(&row(&b, 10)).await.unwrap();
        store.upsert_leaderboard(&row(&a, 10)).await.unwrap();

        let top = store.leaderboard(LeaderboardCategory::TotalRolls, 10).await.unwrap();
        let names: Vec<_> = top.iter().map(|r| r.holder.as_str()).collect();
        assert_eq!(names, vec!["alpha", "beta"]);
    }
}
