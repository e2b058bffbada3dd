//! Static achievement definitions, in evaluation order.

use crate::models::{AchievementDef, AchievementGrant, AchievementTrigger, Rarity};

pub const ALL_ACHIEVEMENTS: &[AchievementDef] = &[
    AchievementDef {
        id: "first_roll",
        name: "First Roll",
        description: "Perform your first roll",
        trigger: AchievementTrigger::RollCount(1),
        grant: AchievementGrant { coins: 100, luck: 0.1 },
    },
    AchievementDef {
        id: "roll_master",
        name: "Roll Master",
        description: "Perform 100 rolls",
        trigger: AchievementTrigger::RollCount(100),
        grant: AchievementGrant { coins: 1_000, luck: 0.5 },
    },
    AchievementDef {
        id: "roll_legend",
        name: "Roll Legend",
        description: "Perform 1,000 rolls",
        trigger: AchievementTrigger::RollCount(1_000),
        grant: AchievementGrant { coins: 10_000, luck: 1.0 },
    },
    AchievementDef {
        id: "first_rare",
        name: "First Rarity",
        description: "Obtain your first aura of Rare tier or above",
        trigger: AchievementTrigger::RarityAtLeast(Rarity::Rare),
        grant: AchievementGrant { coins: 500, luck: 0.2 },
    },
    AchievementDef {
        id: "millionaire",
        name: "Millionaire",
        description: "Obtain an aura worth 1,000,000 or more",
        trigger: AchievementTrigger::ValueAtLeast(1_000_000),
        grant: AchievementGrant { coins: 5_000, luck: 2.0 },
    },
    AchievementDef {
        id: "collector",
        name: "Collector",
        description: "Own 50 auras",
        trigger: AchievementTrigger::CollectionSize(50),
        grant: AchievementGrant { coins: 2_000, luck: 0.8 },
    },
];

pub fn get_achievement_def(id: &str) -> Option<&'static AchievementDef> {
    ALL_ACHIEVEMENTS.iter().find(|def| def.id == id)
}
