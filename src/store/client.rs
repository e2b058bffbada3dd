use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{Account, LeaderboardCategory, LeaderboardEntry, Result};

/// Opaque record store for accounts and their leaderboard rows.
///
/// Writes are whole-record and last-write-wins; there is no locking across
/// calls.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Store name for logs
    fn name(&self) -> &'static str;

    /// Insert a new account. Fails with `AlreadyExists` on a username or
    /// email clash.
    async fn insert_account(&self, account: &Account) -> Result<()>;

    async fn find_account(&self, id: Uuid) -> Result<Option<Account>>;

    /// Look an account up by exact username or case-insensitive email.
    async fn find_by_login(&self, identifier: &str) -> Result<Option<Account>>;

    /// Overwrite an existing account. Fails with `NotFound` if it is gone.
    async fn save_account(&self, account: &Account) -> Result<()>;

    /// Insert or replace the row for `(account_id, category)`. A replaced row
    /// keeps its original position for tie-breaking.
    async fn upsert_leaderboard(&self, entry: &LeaderboardEntry) -> Result<()>;

    /// Rows of `category`, highest first, at most `limit`.
    async fn leaderboard(&self, category: LeaderboardCategory, limit: usize) -> Result<Vec<LeaderboardEntry>>;
}
