use chrono::{DateTime, Utc};

use crate::models::PlayerState;

/// Upper bound on effective luck; keeps adjusted weights finite.
pub const MAX_TOTAL_LUCK: f64 = 1_000_000.0;

/// Effective luck without touching the record. Expired potions are skipped.
pub fn total_luck(state: &PlayerState, now: DateTime<Utc>) -> f64 {
    let potions: f64 = state
        .active_potions
        .iter()
        .filter(|p| p.is_active(now))
        .map(|p| p.multiplier)
        .sum();

    let total = state.base_luck + state.permanent_luck_bonus + potions;
    if total.is_nan() {
        return 0.0;
    }
    total.clamp(0.0, MAX_TOTAL_LUCK)
}

/// Drops expired potions from `state`, then returns its effective luck.
///
/// Mutates the record, so only call this on paths that persist the state
/// afterwards; read-only paths use [`total_luck`].
pub fn prune_and_total_luck(state: &mut PlayerState, now: DateTime<Utc>) -> f64 {
    prune_expired_potions(state, now);
    total_luck(state, now)
}

/// Returns how many potions were removed.
pub fn prune_expired_potions(state: &mut PlayerState, now: DateTime<Utc>) -> usize {
    let before = state.active_potions.len();
    state.active_potions.retain(|p| p.is_active(now));
    before - state.active_potions.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ActivePotion;
    use chrono::Duration;

    fn potion(multiplier: f64, expires_at: DateTime<Utc>) -> ActivePotion {
        ActivePotion { multiplier, expires_at, kind: "test".to_string() }
    }

    #[test]
    fn test_base_plus_bonus() {
        let mut state = PlayerState::default();
        state.permanent_luck_bonus = 0.5;
        assert!((total_luck(&state, Utc::now()) - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_expired_potions_excluded_and_pruned() {
        let now = Utc::now();
        let mut state = PlayerState::default();
        state.active_potions.push(potion(2.0, now + Duration::seconds(30)));
        state.active_potions.push(potion(5.0, now));
        state.active_potions.push(potion(3.0, now - Duration::seconds(1)));

        assert!((total_luck(&state, now) - 3.0).abs() < 1e-9);
        assert_eq!(state.active_potions.len(), 3, "read path must not mutate");

        let luck = prune_and_total_luck(&mut state, now);
        assert!((luck - 3.0).abs() < 1e-9);
        assert_eq!(state.active_potions.len(), 1);

        // Pruning twice changes nothing further.
        assert_eq!(prune_expired_potions(&mut state, now), 0);
    }

    #[test]
    fn test_stacked_huge_potions_stay_finite() {
        let now = Utc::now();
        let mut state = PlayerState::default();
        state.active_potions.push(potion(1e308, now + Duration::minutes(5)));
        state.active_potions.push(potion(1e308, now + Duration::minutes(5)));

        let luck = total_luck(&state, now);
        assert!(luck.is_finite());
        assert_eq!(luck, MAX_TOTAL_LUCK);
    }

    #[test]
    fn test_luck_never_negative() {
        let mut state = PlayerState::default();
        state.base_luck = -4.0;
        assert_eq!(total_luck(&state, Utc::now()), 0.0);
    }
}
