pub mod models;
pub mod config;
pub mod rolling;
pub mod store;
pub mod service;

pub use models::{Account, GameError, PlayerState, Rarity, Result, RewardOutcome, RewardTable};
pub use config::Settings;
pub use service::{ChestArcade, GameService, RollKind};
