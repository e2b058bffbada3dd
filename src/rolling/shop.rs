use chrono::{DateTime, Duration, Utc};

use crate::{
    config::StarterBundleSettings,
    models::{
        ActivePotion, GameError, LuckUpgradeRequest, PlayerState, PotionRequest, Result, Validate,
    },
};

fn charge(state: &mut PlayerState, cost: u64) -> Result<()> {
    if state.coins < cost {
        return Err(GameError::InsufficientFunds { needed: cost, available: state.coins });
    }
    state.coins -= cost;
    Ok(())
}

fn expiry(now: DateTime<Utc>, duration: Duration) -> Result<DateTime<Utc>> {
    now.checked_add_signed(duration)
        .ok_or_else(|| GameError::InvalidInput("potion duration out of range".to_string()))
}

pub fn purchase_luck_upgrade(state: &mut PlayerState, request: &LuckUpgradeRequest) -> Result<()> {
    request.validate()?;
    charge(state, request.cost)?;
    state.permanent_luck_bonus += request.luck_increase;
    Ok(())
}

pub fn purchase_potion(state: &mut PlayerState, request: &PotionRequest, now: DateTime<Utc>) -> Result<ActivePotion> {
    request.validate()?;
    let duration_ms = i64::try_from(request.duration_ms)
        .map_err(|_| GameError::InvalidInput("potion duration too large".to_string()))?;
    let expires_at = expiry(now, Duration::milliseconds(duration_ms))?;
    charge(state, request.cost)?;

    let potion = ActivePotion {
        multiplier: request.multiplier,
        expires_at,
        kind: request.kind.trim().to_string(),
    };
    state.active_potions.push(potion.clone());
    Ok(potion)
}

pub fn claim_starter_bundle(
    state: &mut PlayerState,
    bundle: &StarterBundleSettings,
    now: DateTime<Utc>,
) -> Result<ActivePotion> {
    if state.starter_bundle_claimed {
        return Err(GameError::AlreadyClaimed("starter bundle".to_string()));
    }

    let potion = ActivePotion {
        multiplier: bundle.potion_multiplier,
        expires_at: expiry(now, Duration::milliseconds(bundle.potion_duration_secs.max(0).saturating_mul(1000)))?,
        kind: "starter".to_string(),
    };

    state.coins = state.coins.saturating_add(bundle.coins);
    state.permanent_luck_bonus += bundle.luck;
    state.starter_bundle_claimed = true;
    state.active_potions.push(potion.clone());
    Ok(potion)
}
