use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{debug, info};

use crate::{
    config::{chest_table, ChestKind, LeaderboardSettings},
    models::{LeaderboardCategory, LeaderboardEntry, RankedEntry, Result, RewardOutcome, ScoreSubmission, Validate},
    rolling::{select_reward, top_leaderboard, RewardSelector},
};

const CHEST_LUCK: f64 = 1.0;

#[derive(Debug, Clone, Serialize)]
pub struct ChestOpening {
    pub chest: &'static str,
    pub reward: RewardOutcome,
    pub chest_cost: u64,
    pub net_gain: i64,
}

/// Bounded, process-local score list for the chest arcade.
#[derive(Debug, Clone)]
pub struct ScoreBoard {
    entries: Vec<LeaderboardEntry>,
    capacity: usize,
    name_max_len: usize,
}

impl ScoreBoard {
    pub fn new(capacity: usize, name_max_len: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity: capacity.max(1),
            name_max_len: name_max_len.max(1),
        }
    }

    /// Board pre-filled with a few demo scores.
    pub fn seeded(capacity: usize, name_max_len: usize, now: DateTime<Utc>) -> Self {
        let mut board = Self::new(capacity, name_max_len);
        board.push("Demo Player", 150.0, now);
        board.push("Explorer", 89.0, now - Duration::hours(1));
        board.push("Treasure Hunter", 234.0, now - Duration::hours(2));
        board
    }

    pub fn submit(&mut self, submission: &ScoreSubmission, now: DateTime<Utc>) -> Result<LeaderboardEntry> {
        submission.validate()?;
        // validate() guarantees both fields
        let name = submission.player_name.as_deref().unwrap_or_default();
        let score = submission.score.unwrap_or_default();
        Ok(self.push(name, score, now))
    }

    fn push(&mut self, name: &str, score: f64, now: DateTime<Utc>) -> LeaderboardEntry {
        let holder: String = name.trim().chars().take(self.name_max_len).collect();
        let value = if score.is_finite() && score > 0.0 { score.floor() as u64 } else { 0 };

        let entry = LeaderboardEntry {
            holder,
            account_id: None,
            category: LeaderboardCategory::ChestScore,
            value,
            updated_at: now,
        };
        self.entries.push(entry.clone());

        if self.entries.len() > self.capacity {
            self.entries.sort_by(|a, b| b.value.cmp(&a.value));
            self.entries.truncate(self.capacity);
        }
        entry
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top(&self, limit: usize) -> Vec<RankedEntry> {
        top_leaderboard(&self.entries, LeaderboardCategory::ChestScore, limit)
    }
}

/// Stateless chest openings plus the arcade score board. No account or
/// balance is involved.
pub struct ChestArcade {
    selector: RewardSelector,
    scoreboard: ScoreBoard,
    default_limit: usize,
    rng: StdRng,
}

impl ChestArcade {
    pub fn new(selector: RewardSelector, settings: &LeaderboardSettings) -> Self {
        Self::with_rng(selector, settings, StdRng::from_entropy())
    }

    pub fn with_seed(selector: RewardSelector, settings: &LeaderboardSettings, seed: u64) -> Self {
        Self::with_rng(selector, settings, StdRng::seed_from_u64(seed))
    }

    fn with_rng(selector: RewardSelector, settings: &LeaderboardSettings, rng: StdRng) -> Self {
        Self {
            selector,
            scoreboard: ScoreBoard::seeded(settings.scoreboard_capacity, settings.name_max_len, Utc::now()),
            default_limit: settings.default_limit,
            rng,
        }
    }

    pub fn open_chest(&mut self, kind: &str) -> Result<ChestOpening> {
        let kind = ChestKind::parse(kind)?;
        let table = chest_table(kind);
        let (reward, lucky) = select_reward(&self.selector, &table, CHEST_LUCK, &mut self.rng)?;

        let net_gain = reward.value as i64 - table.cost as i64;
        debug!("Opened {} chest: {} ({}), lucky={}", kind.as_str(), reward.label, reward.value, lucky);

        Ok(ChestOpening {
            chest: kind.as_str(),
            reward,
            chest_cost: table.cost,
            net_gain,
        })
    }

    pub fn submit_score(&mut self, submission: &ScoreSubmission) -> Result<LeaderboardEntry> {
        let entry = self.scoreboard.submit(submission, Utc::now())?;
        info!("Chest score {} recorded for {}", entry.value, entry.holder);
        Ok(entry)
    }

    pub fn leaderboard(&self) -> Vec<RankedEntry> {
        self.scoreboard.top(self.default_limit)
    }

    pub fn scoreboard(&self) -> &ScoreBoard {
        &self.scoreboard
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GameError;

    fn submission(name: &str, score: f64) -> ScoreSubmission {
        ScoreSubmission {
            player_name: Some(name.to_string()),
            score: Some(score),
        }
    }

    #[test]
    fn test_seeded_board_order() {
        let board = ScoreBoard::seeded(100, 20, Utc::now());
        let top: Vec<_> = board.top(10).into_iter().map(|r| (r.rank, r.holder, r.value)).collect();
        assert_eq!(
            top,
            vec![
                (1, "Treasure Hunter".to_string(), 234),
                (2, "Demo Player".to_string(), 150),
                (3, "Explorer".to_string(), 89),
            ]
        );
    }

    #[test]
    fn test_submission_is_normalized() {
        let mut board = ScoreBoard::new(100, 20);
        let entry = board
            .submit(&submission("An Extremely Long Player Name", 42.9), Utc::now())
            .unwrap();
        assert_eq!(entry.holder.chars().count(), 20);
        assert_eq!(entry.value, 42);

        let negative = board.submit(&submission("Sad", -5.0), Utc::now()).unwrap();
        assert_eq!(negative.value, 0);
    }

    #[test]
    fn test_missing_fields_rejected() {
        let mut board = ScoreBoard::new(100, 20);
        let no_score = ScoreSubmission {
            player_name: Some("Nobody".to_string()),
            score: None,
        };
        assert!(matches!(board.submit(&no_score, Utc::now()), Err(GameError::InvalidInput(_))));
        assert!(board.is_empty());
    }

    #[test]
    fn test_capacity_keeps_best() {
        let mut board = ScoreBoard::new(3, 20);
        for (i, score) in [10.0, 50.0, 30.0, 40.0, 5.0].iter().enumerate() {
            board.submit(&submission(&format!("p{}", i), *score), Utc::now()).unwrap();
        }
        assert_eq!(board.len(), 3);
        let values: Vec<_> = board.top(10).into_iter().map(|r| r.value).collect();
        assert_eq!(values, vec![50, 40, 30]);
    }

    #[test]
    fn test_open_chest() {
        let settings = crate::config::Settings::default().leaderboard;
        let mut arcade = ChestArcade::with_seed(RewardSelector::default(), &settings, 11);

        for kind in ["common", "rare", "legendary"] {
            let opening = arcade.open_chest(kind).unwrap();
            assert_eq!(opening.chest, kind);
            assert_eq!(opening.net_gain, opening.reward.value as i64 - opening.chest_cost as i64);
        }

        assert!(matches!(arcade.open_chest("mimic"), Err(GameError::InvalidInput(_))));
    }
}
