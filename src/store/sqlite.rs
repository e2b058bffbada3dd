use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    config::DatabaseSettings,
    models::{Account, GameError, LeaderboardCategory, LeaderboardEntry, Result},
    rolling::MAX_LEADERBOARD_LIMIT,
    store::AccountStore,
};

const SCHEMA: [&str; 2] = [
    "CREATE TABLE IF NOT EXISTS accounts (
        id TEXT PRIMARY KEY,
        username TEXT NOT NULL UNIQUE,
        email TEXT NOT NULL UNIQUE,
        document TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS leaderboard (
        seq INTEGER PRIMARY KEY AUTOINCREMENT,
        account_id TEXT,
        category TEXT NOT NULL,
        holder TEXT NOT NULL,
        value INTEGER NOT NULL,
        updated_at TEXT NOT NULL,
        UNIQUE (account_id, category)
    )",
];

/// Durable store: one JSON document per account plus a leaderboard table.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub async fn connect(settings: &DatabaseSettings) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(&settings.url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(settings.max_connections)
            .min_connections(settings.min_connections)
            .acquire_timeout(Duration::from_secs(settings.connect_timeout_seconds))
            .connect_with(options)
            .await?;

        info!("Connected to SQLite store at {}", settings.url);
        Self::with_pool(pool).await
    }

    /// Private in-memory database; lives as long as the returned store.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        Self::with_pool(pool).await
    }

    async fn with_pool(pool: SqlitePool) -> Result<Self> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&pool).await?;
        }
        Ok(Self { pool })
    }

    fn decode_account(row: &SqliteRow) -> Result<Account> {
        let document: String = row.try_get("document")?;
        Ok(serde_json::from_str(&document)?)
    }

    fn decode_entry(row: &SqliteRow, category: LeaderboardCategory) -> Result<LeaderboardEntry> {
        let account_id = row
            .try_get::<Option<String>, _>("account_id")?
            .map(|id| Uuid::parse_str(&id))
            .transpose()
            .map_err(|e| GameError::Unexpected(format!("corrupt account id: {}", e)))?;
        let value: i64 = row.try_get("value")?;
        let updated_at: String = row.try_get("updated_at")?;
        let updated_at = DateTime::parse_from_rfc3339(&updated_at)
            .map_err(|e| GameError::Unexpected(format!("corrupt timestamp: {}", e)))?
            .with_timezone(&Utc);

        Ok(LeaderboardEntry {
            holder: row.try_get("holder")?,
            account_id,
            category,
            value: u64::try_from(value).unwrap_or(0),
            updated_at,
        })
    }
}

#[async_trait]
impl AccountStore for SqliteStore {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    async fn insert_account(&self, account: &Account) -> Result<()> {
        let document = serde_json::to_string(account)?;
        sqlx::query("INSERT INTO accounts (id, username, email, document) VALUES (?, ?, ?, ?)")
            .bind(account.id.to_string())
            .bind(&account.username)
            .bind(&account.email)
            .bind(document)
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => GameError::AlreadyExists(
                    format!("username or email already registered: {}", account.username),
                ),
                other => GameError::Database(other),
            })?;

        debug!("Inserted account {} into SQLite store", account.id);
        Ok(())
    }

    async fn find_account(&self, id: Uuid) -> Result<Option<Account>> {
        let row = sqlx::query("SELECT document FROM accounts WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Self::decode_account).transpose()
    }

    async fn find_by_login(&self, identifier: &str) -> Result<Option<Account>> {
        let row = sqlx::query("SELECT document FROM accounts WHERE username = ? OR email = ? LIMIT 1")
            .bind(identifier)
            .bind(identifier.to_lowercase())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Self::decode_account).transpose()
    }

    async fn save_account(&self, account: &Account) -> Result<()> {
        let document = serde_json::to_string(account)?;
        let result = sqlx::query("UPDATE accounts SET document = ? WHERE id = ?")
            .bind(document)
            .bind(account.id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(GameError::NotFound(format!("account {}", account.id)));
        }
        Ok(())
    }

    async fn upsert_leaderboard(&self, entry: &LeaderboardEntry) -> Result<()> {
        sqlx::query(
            "INSERT INTO leaderboard (account_id, category, holder, value, updated_at)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT (account_id, category) DO UPDATE SET
                holder = excluded.holder,
                value = excluded.value,
                updated_at = excluded.updated_at",
        )
        .bind(entry.account_id.map(|id| id.to_string()))
        .bind(entry.category.as_str())
        .bind(&entry.holder)
        .bind(i64::try_from(entry.value).unwrap_or(i64::MAX))
        .bind(entry.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn leaderboard(&self, category: LeaderboardCategory, limit: usize) -> Result<Vec<LeaderboardEntry>> {
        let limit = limit.clamp(1, MAX_LEADERBOARD_LIMIT) as i64;
        let rows = sqlx::query(
            "SELECT account_id, holder, value, updated_at FROM leaderboard
             WHERE category = ?
             ORDER BY value DESC, seq ASC
             LIMIT ?",
        )
        .bind(category.as_str())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(|row| Self::decode_entry(row, category)).collect()
    }
}
