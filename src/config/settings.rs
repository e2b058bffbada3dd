use serde::{Deserialize, Serialize};
use config::{Config, ConfigError, File};
use std::path::Path;

use crate::models::{MAX_LUCK_INCREASE, MAX_POTION_DURATION_MS, MAX_POTION_MULTIPLIER};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub app: AppSettings,
    pub economy: EconomySettings,
    pub daily: DailySettings,
    pub starter_bundle: StarterBundleSettings,
    pub database: DatabaseSettings,
    pub leaderboard: LeaderboardSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub version: String,
    pub log_level: String,
    pub environment: Environment,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EconomySettings {
    pub starting_coins: u64,
    pub base_luck: f64,
    pub roll_cost: u64,
    pub quick_roll_cost: u64,
    pub quick_roll_count: u32,
    pub coin_reward_divisor: u64,
    pub lucky_chance: f64,
    pub lucky_multiplier: u64,
    /// Weights at or above this are common and scale by the square root of luck.
    pub common_weight_threshold: f64,
    /// Weights below this are extreme rarities and also scale by the square
    /// root. Everything between scales linearly.
    pub extreme_weight_threshold: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailySettings {
    pub base_reward: u64,
    pub max_streak_multiplier: u32,
    pub cooldown_hours: i64,
    pub streak_window_hours: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StarterBundleSettings {
    pub coins: u64,
    pub luck: f64,
    pub potion_multiplier: f64,
    pub potion_duration_secs: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardSettings {
    pub default_limit: usize,
    pub max_limit: usize,
    pub scoreboard_capacity: usize,
    pub name_max_len: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app: AppSettings {
                name: "Aura RNG".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                log_level: "info".to_string(),
                environment: Environment::Development,
            },
            economy: EconomySettings {
                starting_coins: 1000,
                base_luck: 1.0,
                roll_cost: 50,
                quick_roll_cost: 500,
                quick_roll_count: 10,
                coin_reward_divisor: 10,
                lucky_chance: 0.10,
                lucky_multiplier: 2,
                common_weight_threshold: 1.0,
                extreme_weight_threshold: 0.1,
            },
            daily: DailySettings {
                base_reward: 100,
                max_streak_multiplier: 7,
                cooldown_hours: 24,
                streak_window_hours: 48,
            },
            starter_bundle: StarterBundleSettings {
                coins: 1000,
                luck: 0.5,
                potion_multiplier: 2.0,
                potion_duration_secs: 60,
            },
            database: DatabaseSettings {
                url: "sqlite://aura_rng.db".to_string(),
                max_connections: 5,
                min_connections: 1,
                connect_timeout_seconds: 30,
            },
            leaderboard: LeaderboardSettings {
                default_limit: 10,
                max_limit: 100,
                scoreboard_capacity: 100,
                name_max_len: 20,
            },
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(Config::try_from(&Settings::default())?)
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("AURA_RNG").separator("__"))
            .build()?;

        s.try_deserialize()
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(Config::try_from(&Settings::default())?)
            .add_source(File::from(path.as_ref()))
            .build()?;

        s.try_deserialize()
    }

    pub fn validate(&self) -> Result<(), String> {
        let e = &self.economy;
        if e.roll_cost == 0 || e.quick_roll_cost == 0 {
            return Err("Roll costs must be positive".to_string());
        }
        if e.quick_roll_count == 0 {
            return Err("Quick roll count must be positive".to_string());
        }
        if e.coin_reward_divisor == 0 {
            return Err("Coin reward divisor must be positive".to_string());
        }
        if !(0.0..=1.0).contains(&e.lucky_chance) {
            return Err(format!("Lucky chance must be between 0 and 1, got {}", e.lucky_chance));
        }
        if e.base_luck < 0.0 || !e.base_luck.is_finite() {
            return Err("Base luck must be a non-negative number".to_string());
        }
        let bands_ordered = e.extreme_weight_threshold >= 0.0
            && e.extreme_weight_threshold <= e.common_weight_threshold
            && e.common_weight_threshold.is_finite();
        if !bands_ordered {
            return Err("Weight thresholds must satisfy 0 <= extreme <= common".to_string());
        }

        let b = &self.starter_bundle;
        if !b.potion_multiplier.is_finite() || b.potion_multiplier <= 0.0 || b.potion_multiplier > MAX_POTION_MULTIPLIER {
            return Err(format!("Starter potion multiplier must be in (0, {}]", MAX_POTION_MULTIPLIER));
        }
        let max_secs = (MAX_POTION_DURATION_MS / 1000) as i64;
        if b.potion_duration_secs <= 0 || b.potion_duration_secs > max_secs {
            return Err(format!("Starter potion duration must be between 1 and {} seconds", max_secs));
        }
        if !b.luck.is_finite() || b.luck < 0.0 || b.luck > MAX_LUCK_INCREASE {
            return Err(format!("Starter luck must be in [0, {}]", MAX_LUCK_INCREASE));
        }

        let d = &self.daily;
        if d.cooldown_hours <= 0 || d.streak_window_hours < d.cooldown_hours {
            return Err("Daily streak window must cover the cooldown".to_string());
        }

        let l = &self.leaderboard;
        if l.default_limit == 0 || l.default_limit > l.max_limit {
            return Err("Leaderboard default limit must be between 1 and max_limit".to_string());
        }

        Ok(())
    }
}
