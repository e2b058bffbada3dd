use chrono::{DateTime, Utc};

use crate::{
    config::ALL_ACHIEVEMENTS,
    models::{AchievementDef, AchievementTrigger, PlayerState, UnlockedAchievement},
};

pub fn is_satisfied(trigger: &AchievementTrigger, state: &PlayerState) -> bool {
    match *trigger {
        AchievementTrigger::RollCount(n) => state.total_rolls >= n,
        AchievementTrigger::RarityAtLeast(tier) => state.auras.iter().any(|a| a.rarity >= tier),
        AchievementTrigger::ValueAtLeast(n) => state.highest_value_aura >= n,
        AchievementTrigger::CollectionSize(n) => state.auras.len() >= n,
    }
}

/// Unlock every static achievement `state` now qualifies for.
pub fn evaluate_achievements(state: &mut PlayerState, now: DateTime<Utc>) -> Vec<&'static AchievementDef> {
    evaluate_against(ALL_ACHIEVEMENTS, state, now)
}

/// Unlock newly satisfied definitions from `defs` and apply their grants.
/// Ids already on the record are skipped, so repeated calls never grant twice.
pub fn evaluate_against<'a>(
    defs: &'a [AchievementDef],
    state: &mut PlayerState,
    now: DateTime<Utc>,
) -> Vec<&'a AchievementDef> {
    let mut unlocked = Vec::new();

    for def in defs {
        if state.has_achievement(def.id) || !is_satisfied(&def.trigger, state) {
            continue;
        }

        state.achievements.push(UnlockedAchievement::from_def(def, now));
        state.coins = state.coins.saturating_add(def.grant.coins);
        state.permanent_luck_bonus += def.grant.luck;
        unlocked.push(def);
    }

    unlocked
}
