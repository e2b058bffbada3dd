pub mod selector;
pub mod luck;
pub mod progression;
pub mod achievements;
pub mod leaderboard;
pub mod daily;
pub mod shop;

pub use selector::{select_reward, RewardSelector, RollRules};
pub use luck::{prune_and_total_luck, total_luck};
pub use progression::{apply_roll, RollPlan, RollReport};
pub use achievements::evaluate_achievements;
pub use leaderboard::{top_leaderboard, MAX_LEADERBOARD_LIMIT};
pub use daily::{claim_daily_reward, DailyClaim};
pub use shop::{claim_starter_bundle, purchase_luck_upgrade, purchase_potion};
