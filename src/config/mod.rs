pub mod settings;
pub mod tables;
pub mod achievements;

pub use settings::*;
pub use tables::{aura_table, chest_table, ChestKind};
pub use achievements::{get_achievement_def, ALL_ACHIEVEMENTS};
