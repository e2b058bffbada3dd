use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    config::EconomySettings,
    models::{GameError, OwnedAura, PlayerState, Result, RewardOutcome, RewardTable},
    rolling::RewardSelector,
};

/// How many draws a roll makes and what it costs in total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollPlan {
    pub batch_size: u32,
    pub cost: u64,
}

impl RollPlan {
    pub fn single(economy: &EconomySettings) -> Self {
        Self { batch_size: 1, cost: economy.roll_cost }
    }

    pub fn quick(economy: &EconomySettings) -> Self {
        Self { batch_size: economy.quick_roll_count, cost: economy.quick_roll_cost }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RollReport {
    pub outcomes: Vec<RewardOutcome>,
    pub coin_reward: u64,
    pub best: RewardOutcome,
    pub luck_used: f64,
}

/// Apply a paid roll to `state`.
///
/// Affordability is checked and every draw is made before the record is
/// touched, so a failure leaves `state` exactly as it was.
pub fn apply_roll<R: Rng>(
    state: &mut PlayerState,
    plan: RollPlan,
    table: &RewardTable,
    selector: &RewardSelector,
    luck: f64,
    coin_reward_divisor: u64,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Result<RollReport> {
    if plan.batch_size == 0 {
        return Err(GameError::InvalidInput("batch size must be at least 1".to_string()));
    }
    if coin_reward_divisor == 0 {
        return Err(GameError::Configuration("coin reward divisor must be positive".to_string()));
    }
    if state.coins < plan.cost {
        return Err(GameError::InsufficientFunds {
            needed: plan.cost,
            available: state.coins,
        });
    }

    let outcomes = (0..plan.batch_size)
        .map(|_| selector.select(table, luck, rng))
        .collect::<Result<Vec<_>>>()?;

    let coin_reward: u64 = outcomes.iter().map(|o| o.value / coin_reward_divisor).sum();

    // Ties keep the earliest draw.
    let best = outcomes
        .iter()
        .fold(None::<&RewardOutcome>, |best, o| match best {
            Some(b) if b.value >= o.value => Some(b),
            _ => Some(o),
        })
        .cloned()
        .ok_or_else(|| GameError::Unexpected("roll produced no outcomes".to_string()))?;

    state.coins -= plan.cost;
    state.total_rolls += u64::from(plan.batch_size);
    for outcome in &outcomes {
        state.auras.push(OwnedAura::from_outcome(outcome, now));
        if outcome.value > state.highest_value_aura {
            state.highest_value_aura = outcome.value;
        }
    }
    state.coins = state.coins.saturating_add(coin_reward);

    Ok(RollReport {
        outcomes,
        coin_reward,
        best,
        luck_used: luck,
    })
}
