use crate::{
    config::EconomySettings,
    models::{Result, RewardOutcome, RewardTable, RewardValue},
};
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RollRules {
    pub common_weight_threshold: f64,
    pub extreme_weight_threshold: f64,
    pub lucky_chance: f64,
    pub lucky_multiplier: u64,
}

impl Default for RollRules {
    fn default() -> Self {
        Self {
            common_weight_threshold: 1.0,
            extreme_weight_threshold: 0.1,
            lucky_chance: 0.10,
            lucky_multiplier: 2,
        }
    }
}

impl From<&EconomySettings> for RollRules {
    fn from(economy: &EconomySettings) -> Self {
        Self {
            common_weight_threshold: economy.common_weight_threshold,
            extreme_weight_threshold: economy.extreme_weight_threshold,
            lucky_chance: economy.lucky_chance,
            lucky_multiplier: economy.lucky_multiplier,
        }
    }
}

pub struct RewardSelector {
    rules: RollRules,
}

impl RewardSelector {
    pub fn new(rules: RollRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RollRules {
        &self.rules
    }

    /// Luck-adjusted weight.
    ///
    /// Rare weights in `[extreme, common)` scale linearly with luck. Common
    /// weights and extreme rarities below `extreme` scale by its square root,
    /// so raising luck always shifts share from commons toward rares.
    pub fn adjusted_weight(&self, weight: f64, luck: f64) -> f64 {
        let luck = if luck.is_finite() { luck.max(0.0) } else { 0.0 };
        let rules = &self.rules;
        if weight < rules.common_weight_threshold && weight >= rules.extreme_weight_threshold {
            weight * luck
        } else {
            weight * luck.sqrt()
        }
    }

    /// Pick one entry of `table` and roll its value. Never fails on weights:
    /// when the draw lands nowhere the first entry is returned.
    pub fn select<R: Rng>(&self, table: &RewardTable, luck: f64, rng: &mut R) -> Result<RewardOutcome> {
        table.validate()?;

        let index = self.pick_index(table, luck, rng);
        let entry = &table.entries[index];
        let (min_value, max_value) = entry.value.bounds();

        let rolled_value = match entry.value {
            RewardValue::Fixed(v) => v,
            RewardValue::Range { min, max } => rng.gen_range(min..=max),
        };

        let lucky = rng.gen::<f64>() < self.rules.lucky_chance;
        let value = if lucky {
            rolled_value.saturating_mul(self.rules.lucky_multiplier)
        } else {
            rolled_value
        };

        Ok(RewardOutcome {
            label: entry.label.clone(),
            rarity: entry.rarity,
            color: entry.color.clone(),
            min_value,
            max_value,
            rolled_value,
            value,
            lucky,
        })
    }

    fn pick_index<R: Rng>(&self, table: &RewardTable, luck: f64, rng: &mut R) -> usize {
        let adjusted: Vec<f64> = table
            .entries
            .iter()
            .map(|e| self.adjusted_weight(e.weight, luck))
            .collect();
        let total: f64 = adjusted.iter().sum();

        if !total.is_finite() || total <= 0.0 {
            return 0;
        }

        let draw = rng.gen::<f64>() * total;
        let mut running = 0.0;
        for (i, weight) in adjusted.iter().enumerate() {
            running += weight;
            if *weight > 0.0 && running > draw {
                return i;
            }
        }

        0
    }
}

impl Default for RewardSelector {
    fn default() -> Self {
        Self::new(RollRules::default())
    }
}

/// Convenience wrapper returning the outcome together with its lucky flag.
pub fn select_reward<R: Rng>(
    selector: &RewardSelector,
    table: &RewardTable,
    luck: f64,
    rng: &mut R,
) -> Result<(RewardOutcome, bool)> {
    let outcome = selector.select(table, luck, rng)?;
    let lucky = outcome.lucky;
    Ok((outcome, lucky))
}
