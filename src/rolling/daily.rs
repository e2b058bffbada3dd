use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    config::DailySettings,
    models::{GameError, PlayerState, Result},
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyClaim {
    pub coin_reward: u64,
    pub streak_days: u32,
}

/// Claim the once-a-day coin reward.
///
/// A claim inside the cooldown fails with the seconds left. The streak grows
/// when the previous claim is within the streak window, otherwise restarts.
pub fn claim_daily_reward(state: &mut PlayerState, rules: &DailySettings, now: DateTime<Utc>) -> Result<DailyClaim> {
    let cooldown = Duration::hours(rules.cooldown_hours);
    let window = Duration::hours(rules.streak_window_hours);

    let since_last = state.last_daily_reward.map(|last| now - last);

    if let Some(elapsed) = since_last {
        if elapsed < cooldown {
            let left = cooldown - elapsed;
            // Round up so "0 seconds left" never shows while still blocked.
            let seconds_left = (left.num_milliseconds().max(0) as u64 + 999) / 1000;
            return Err(GameError::DailyRewardNotReady { seconds_left });
        }
    }

    let streak_days = match since_last {
        Some(elapsed) if elapsed < window => state.streak_days.saturating_add(1),
        _ => 1,
    };

    let coin_reward = rules.base_reward * u64::from(streak_days.min(rules.max_streak_multiplier));

    state.streak_days = streak_days;
    state.coins = state.coins.saturating_add(coin_reward);
    state.last_daily_reward = Some(now);

    Ok(DailyClaim { coin_reward, streak_days })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;

    fn rules() -> DailySettings {
        Settings::default().daily
    }

    #[test]
    fn test_first_claim_starts_streak() {
        let mut state = PlayerState::new(0, 1.0);
        let claim = claim_daily_reward(&mut state, &rules(), Utc::now()).unwrap();
        assert_eq!(claim, DailyClaim { coin_reward: 100, streak_days: 1 });
        assert_eq!(state.coins, 100);
    }

    #[test]
    fn test_claim_within_cooldown_rejected() {
        let now = Utc::now();
        let mut state = PlayerState::new(0, 1.0);
        state.last_daily_reward = Some(now - Duration::hours(23));
        state.streak_days = 3;

        match claim_daily_reward(&mut state, &rules(), now) {
            Err(GameError::DailyRewardNotReady { seconds_left }) => assert_eq!(seconds_left, 3_600),
            other => panic!("expected cooldown error, got {:?}", other),
        }
        assert_eq!(state.coins, 0);
        assert_eq!(state.streak_days, 3);
    }

    #[test]
    fn test_streak_continues_inside_window() {
        let now = Utc::now();
        let mut state = PlayerState::new(0, 1.0);
        state.last_daily_reward = Some(now - Duration::hours(30));
        state.streak_days = 2;

        let claim = claim_daily_reward(&mut state, &rules(), now).unwrap();
        assert_eq!(claim.streak_days, 3);
        assert_eq!(claim.coin_reward, 300);
    }

    #[test]
    fn test_streak_resets_after_48_hours() {
        let now = Utc::now();
        let mut state = PlayerState::new(0, 1.0);
        state.last_daily_reward = Some(now - Duration::hours(49));
        state.streak_days = 5;

        let claim = claim_daily_reward(&mut state, &rules(), now).unwrap();
        assert_eq!(claim.streak_days, 1);
        assert_eq!(claim.coin_reward, 100);
    }

    #[test]
    fn test_reward_caps_at_seven_days() {
        let now = Utc::now();
        let mut state = PlayerState::new(0, 1.0);
        state.last_daily_reward = Some(now - Duration::hours(25));
        state.streak_days = 12;

        let claim = claim_daily_reward(&mut state, &rules(), now).unwrap();
        assert_eq!(claim.streak_days, 13);
        assert_eq!(claim.coin_reward, 700);
    }
}
