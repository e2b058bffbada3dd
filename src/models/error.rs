use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Insufficient funds: need {needed} coins, have {available}")]
    InsufficientFunds { needed: u64, available: u64 },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Already claimed: {0}")]
    AlreadyClaimed(String),

    #[error("Daily reward already claimed, next claim in {seconds_left}s")]
    DailyRewardNotReady { seconds_left: u64 },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl GameError {
    /// Expected conditions a player can cause and correct themselves.
    /// Everything else is an operator problem and gets logged as such.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            GameError::InsufficientFunds { .. }
                | GameError::InvalidInput(_)
                | GameError::NotFound(_)
                | GameError::AlreadyExists(_)
                | GameError::AlreadyClaimed(_)
                | GameError::DailyRewardNotReady { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, GameError>;
