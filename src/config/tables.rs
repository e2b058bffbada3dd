//! Static reward tables: the aura roll table used by accounts and the
//! three arcade chests.

use crate::models::{GameError, Rarity, Result, RewardEntry, RewardTable};

pub const AURA_TABLE_NAME: &str = "aura";

/// The persisted-account roll table. Weights are percentages.
pub fn aura_table(roll_cost: u64) -> RewardTable {
    RewardTable {
        name: AURA_TABLE_NAME.to_string(),
        cost: roll_cost,
        entries: vec![
            RewardEntry::ranged("Common Breeze", 1, 100, 40.0, Rarity::Common, "#95a5a6"),
            RewardEntry::ranged("Basic Light", 1, 100, 35.0, Rarity::Common, "#95a5a6"),
            RewardEntry::ranged("Blue Wind", 101, 1_000, 15.0, Rarity::Rare, "#3498db"),
            RewardEntry::ranged("Electric Spark", 101, 1_000, 12.0, Rarity::Rare, "#3498db"),
            RewardEntry::ranged("Purple Flame", 1_001, 10_000, 8.0, Rarity::Epic, "#9b59b6"),
            RewardEntry::ranged("Mystic Crystal", 1_001, 10_000, 6.0, Rarity::Epic, "#9b59b6"),
            RewardEntry::ranged("Radiant Gold", 10_001, 100_000, 3.0, Rarity::Legendary, "#f39c12"),
            RewardEntry::ranged("Golden Phoenix", 10_001, 100_000, 2.0, Rarity::Legendary, "#f39c12"),
            RewardEntry::ranged("Crimson Dragon", 100_001, 1_000_000, 1.0, Rarity::Mythic, "#e74c3c"),
            RewardEntry::ranged("Eternal Storm", 100_001, 1_000_000, 0.8, Rarity::Mythic, "#e74c3c"),
            RewardEntry::ranged("Divine Aurora", 1_000_001, 100_000_000, 0.5, Rarity::Divine, "#fd79a8"),
            RewardEntry::ranged("Celestial Star", 1_000_001, 100_000_000, 0.3, Rarity::Divine, "#fd79a8"),
            RewardEntry::ranged("Infinite Galaxy", 100_000_001, 1_000_000_000, 0.1, Rarity::Celestial, "#00cec9"),
            RewardEntry::ranged("Eternal Cosmos", 100_000_001, 1_000_000_000, 0.08, Rarity::Celestial, "#00cec9"),
            RewardEntry::ranged("Omnipresence", 1_000_000_001, 10_000_000_000, 0.05, Rarity::Transcendent, "#6c5ce7"),
            RewardEntry::ranged("Absolute Reality", 1_000_000_001, 10_000_000_000, 0.03, Rarity::Transcendent, "#6c5ce7"),
            RewardEntry::ranged("Supreme Deity", 10_000_000_001, 100_000_000_000, 0.01, Rarity::Omnipotent, "#ffd700"),
            RewardEntry::ranged("Universal Creator", 10_000_000_001, 100_000_000_000, 0.005, Rarity::Omnipotent, "#ffd700"),
        ],
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChestKind {
    Common,
    Rare,
    Legendary,
}

impl ChestKind {
    pub const ALL: [ChestKind; 3] = [ChestKind::Common, ChestKind::Rare, ChestKind::Legendary];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChestKind::Common => "common",
            ChestKind::Rare => "rare",
            ChestKind::Legendary => "legendary",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "common" => Ok(ChestKind::Common),
            "rare" => Ok(ChestKind::Rare),
            "legendary" => Ok(ChestKind::Legendary),
            other => Err(GameError::InvalidInput(format!("unknown chest type: {}", other))),
        }
    }
}

/// Arcade chest tables. Weights are probabilities.
pub fn chest_table(kind: ChestKind) -> RewardTable {
    let (cost, entries) = match kind {
        ChestKind::Common => (
            10,
            vec![
                RewardEntry::fixed("Copper Coin", 5, 0.4, Rarity::Common),
                RewardEntry::fixed("Small Gem", 15, 0.3, Rarity::Common),
                RewardEntry::fixed("Health Potion", 25, 0.2, Rarity::Uncommon),
                RewardEntry::fixed("Iron Sword", 50, 0.08, Rarity::Rare),
                RewardEntry::fixed("Magic Armor", 100, 0.02, Rarity::Legendary),
            ],
        ),
        ChestKind::Rare => (
            50,
            vec![
                RewardEntry::fixed("Silver Coin", 25, 0.3, Rarity::Common),
                RewardEntry::fixed("Magic Crystal", 75, 0.25, Rarity::Uncommon),
                RewardEntry::fixed("Enchanted Sword", 150, 0.2, Rarity::Rare),
                RewardEntry::fixed("Ring of Power", 300, 0.15, Rarity::Epic),
                RewardEntry::fixed("King's Crown", 500, 0.08, Rarity::Legendary),
                RewardEntry::fixed("Orb of Destiny", 1_000, 0.02, Rarity::Mythic),
            ],
        ),
        ChestKind::Legendary => (
            200,
            vec![
                RewardEntry::fixed("Gold Coin", 100, 0.25, Rarity::Uncommon),
                RewardEntry::fixed("Divine Fragment", 250, 0.2, Rarity::Rare),
                RewardEntry::fixed("Legendary Sword", 500, 0.2, Rarity::Epic),
                RewardEntry::fixed("Celestial Armor", 750, 0.15, Rarity::Legendary),
                RewardEntry::fixed("Staff of Time", 1_500, 0.15, Rarity::Mythic),
                RewardEntry::fixed("Ancestral Relic", 3_000, 0.05, Rarity::Divine),
            ],
        ),
    };

    RewardTable {
        name: kind.as_str().to_string(),
        cost,
        entries,
    }
}
