use crate::models::{LeaderboardCategory, LeaderboardEntry, RankedEntry};

pub const MAX_LEADERBOARD_LIMIT: usize = 100;

/// Top `limit` entries of `category`, highest value first. Equal values keep
/// their input order. `limit` is clamped to `1..=100`.
pub fn top_leaderboard(
    entries: &[LeaderboardEntry],
    category: LeaderboardCategory,
    limit: usize,
) -> Vec<RankedEntry> {
    let limit = limit.clamp(1, MAX_LEADERBOARD_LIMIT);

    let mut matching: Vec<&LeaderboardEntry> = entries
        .iter()
        .filter(|e| e.category == category)
        .collect();
    // sort_by is stable
    matching.sort_by(|a, b| b.value.cmp(&a.value));

    matching
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(i, e)| RankedEntry {
            rank: i + 1,
            holder: e.holder.clone(),
            value: e.value,
            updated_at: e.updated_at,
        })
        .collect()
}
