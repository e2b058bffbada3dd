//! Typed request bodies. Anything arriving from outside the process is
//! parsed into one of these and validated before it reaches the core.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{GameError, Result};

pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 20;

pub const MAX_LUCK_INCREASE: f64 = 100.0;
pub const MAX_POTION_MULTIPLIER: f64 = 100.0;
/// One week.
pub const MAX_POTION_DURATION_MS: u64 = 7 * 24 * 60 * 60 * 1000;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Parse a JSON body and validate it. Malformed JSON and wrong field types
/// come back as `InvalidInput`, same as failed validation.
pub fn parse_request<T: DeserializeOwned + Validate>(body: &str) -> Result<T> {
    let request: T = serde_json::from_str(body)
        .map_err(|e| GameError::InvalidInput(format!("malformed request: {}", e)))?;
    request.validate()?;
    Ok(request)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
}

impl RegisterRequest {
    pub fn normalized(&self) -> (String, String) {
        (self.username.trim().to_string(), self.email.trim().to_lowercase())
    }
}

impl Validate for RegisterRequest {
    fn validate(&self) -> Result<()> {
        let (username, email) = self.normalized();
        let len = username.chars().count();
        if !(USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&len) {
            return Err(GameError::InvalidInput(format!(
                "username must be between {} and {} characters",
                USERNAME_MIN_LEN, USERNAME_MAX_LEN
            )));
        }

        let well_formed = email
            .split_once('@')
            .map(|(local, domain)| !local.is_empty() && domain.contains('.'))
            .unwrap_or(false);
        if !well_formed {
            return Err(GameError::InvalidInput(format!("invalid email: {}", email)));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LuckUpgradeRequest {
    pub luck_increase: f64,
    pub cost: u64,
}

impl Validate for LuckUpgradeRequest {
    fn validate(&self) -> Result<()> {
        if !self.luck_increase.is_finite() || self.luck_increase <= 0.0 || self.cost == 0 {
            return Err(GameError::InvalidInput(
                "luck upgrade needs a positive increase and cost".to_string(),
            ));
        }
        if self.luck_increase > MAX_LUCK_INCREASE {
            return Err(GameError::InvalidInput(format!(
                "luck increase may not exceed {}",
                MAX_LUCK_INCREASE
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PotionRequest {
    pub multiplier: f64,
    pub duration_ms: u64,
    pub cost: u64,
    pub kind: String,
}

impl Validate for PotionRequest {
    fn validate(&self) -> Result<()> {
        if !self.multiplier.is_finite() || self.multiplier <= 0.0 || self.multiplier > MAX_POTION_MULTIPLIER {
            return Err(GameError::InvalidInput(format!(
                "potion multiplier must be in (0, {}]",
                MAX_POTION_MULTIPLIER
            )));
        }
        if self.duration_ms == 0 || self.cost == 0 {
            return Err(GameError::InvalidInput("potion duration and cost must be positive".to_string()));
        }
        if self.duration_ms > MAX_POTION_DURATION_MS {
            return Err(GameError::InvalidInput(format!(
                "potion duration may not exceed {} ms",
                MAX_POTION_DURATION_MS
            )));
        }
        if self.kind.trim().is_empty() {
            return Err(GameError::InvalidInput("potion kind is required".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreSubmission {
    pub player_name: Option<String>,
    pub score: Option<f64>,
}

impl Validate for ScoreSubmission {
    fn validate(&self) -> Result<()> {
        let has_name = self.player_name.as_deref().map(|n| !n.trim().is_empty()).unwrap_or(false);
        let has_score = self.score.map(|s| s.is_finite()).unwrap_or(false);
        if !has_name || !has_score {
            return Err(GameError::InvalidInput("player name and numeric score are required".to_string()));
        }
        Ok(())
    }
}
