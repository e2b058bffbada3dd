use crate::{
    config::{aura_table, Settings},
    models::{
        AchievementDef, Account, GameError, LeaderboardCategory, LeaderboardEntry,
        LuckUpgradeRequest, PlayerState, PotionRequest, ProfileSummary, RankedEntry,
        RegisterRequest, Result, RewardTable, Validate,
    },
    rolling::{
        self, apply_roll, evaluate_achievements, prune_and_total_luck, top_leaderboard, total_luck,
        DailyClaim, RewardSelector, RollPlan, RollReport, RollRules,
    },
    store::AccountStore,
};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollKind {
    Single,
    Quick,
}

#[derive(Debug, Clone, Serialize)]
pub struct RollResult {
    pub report: RollReport,
    pub new_achievements: Vec<&'static AchievementDef>,
    pub coins: u64,
    pub total_rolls: u64,
    pub total_luck: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct GameStateView {
    pub state: PlayerState,
    pub total_luck: f64,
}

impl GameStateView {
    fn of(state: &PlayerState, now: DateTime<Utc>) -> Self {
        Self {
            state: state.clone(),
            total_luck: total_luck(state, now),
        }
    }
}

/// Per-request orchestration: load the account, mutate in process, save.
pub struct GameService {
    store: Arc<dyn AccountStore>,
    settings: Settings,
    selector: RewardSelector,
    aura_table: RewardTable,
    rng: Mutex<StdRng>,
}

impl GameService {
    pub fn new(store: Arc<dyn AccountStore>, settings: Settings) -> Self {
        Self::with_rng(store, settings, StdRng::from_entropy())
    }

    /// Deterministic rolls, for simulations and tests.
    pub fn with_seed(store: Arc<dyn AccountStore>, settings: Settings, seed: u64) -> Self {
        Self::with_rng(store, settings, StdRng::seed_from_u64(seed))
    }

    fn with_rng(store: Arc<dyn AccountStore>, settings: Settings, rng: StdRng) -> Self {
        let selector = RewardSelector::new(RollRules::from(&settings.economy));
        let aura_table = aura_table(settings.economy.roll_cost);

        Self {
            store,
            settings,
            selector,
            aura_table,
            rng: Mutex::new(rng),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<Account> {
        let result = async {
            request.validate()?;
            let (username, email) = request.normalized();
            let state = PlayerState::new(self.settings.economy.starting_coins, self.settings.economy.base_luck);
            let account = Account::new(username, email, state);

            self.store.insert_account(&account).await?;
            info!("Registered account {} ({})", account.username, account.id);
            Ok::<_, GameError>(account)
        }
        .await;
        logged("register", result)
    }

    /// Resolve a username or email and stamp the login time.
    pub async fn sign_in(&self, identifier: &str) -> Result<Account> {
        let result = async {
            let mut account = self.resolve(identifier).await?;
            account.last_login = Utc::now();
            self.store.save_account(&account).await?;
            Ok::<_, GameError>(account)
        }
        .await;
        logged("sign_in", result)
    }

    pub async fn resolve(&self, identifier: &str) -> Result<Account> {
        self.store
            .find_by_login(identifier.trim())
            .await?
            .ok_or_else(|| GameError::NotFound(format!("account '{}'", identifier.trim())))
    }

    pub async fn game_state(&self, account_id: Uuid) -> Result<GameStateView> {
        let result = async {
            let mut account = self.load(account_id).await?;
            let now = Utc::now();
            let pruned = rolling::luck::prune_expired_potions(&mut account.state, now);
            if pruned > 0 {
                debug!("Pruned {} expired potions for {}", pruned, account.username);
                self.store.save_account(&account).await?;
            }
            Ok::<_, GameError>(GameStateView::of(&account.state, now))
        }
        .await;
        logged("game_state", result)
    }

    pub async fn roll(&self, account_id: Uuid, kind: RollKind) -> Result<RollResult> {
        let result = self.roll_inner(account_id, kind).await;
        logged("roll", result)
    }

    async fn roll_inner(&self, account_id: Uuid, kind: RollKind) -> Result<RollResult> {
        let mut account = self.load(account_id).await?;
        let now = Utc::now();
        let economy = &self.settings.economy;
        let plan = match kind {
            RollKind::Single => RollPlan::single(economy),
            RollKind::Quick => RollPlan::quick(economy),
        };

        // Luck is fixed once for the whole batch.
        let luck = prune_and_total_luck(&mut account.state, now);

        let report = {
            let mut rng = self
                .rng
                .lock()
                .map_err(|_| GameError::Unexpected("rng lock poisoned".to_string()))?;
            apply_roll(
                &mut account.state,
                plan,
                &self.aura_table,
                &self.selector,
                luck,
                economy.coin_reward_divisor,
                now,
                &mut *rng,
            )?
        };

        let new_achievements = evaluate_achievements(&mut account.state, now);
        for def in &new_achievements {
            info!("{} unlocked achievement {}", account.username, def.id);
        }

        self.store.save_account(&account).await?;
        self.publish_leaderboard(&account, now).await;

        info!(
            "{} rolled x{} at luck {:.2}: best {} ({}), +{} coins",
            account.username,
            plan.batch_size,
            luck,
            report.best.label,
            report.best.value,
            report.coin_reward
        );

        Ok(RollResult {
            report,
            new_achievements,
            coins: account.state.coins,
            total_rolls: account.state.total_rolls,
            total_luck: total_luck(&account.state, now),
        })
    }

    pub async fn upgrade_luck(&self, account_id: Uuid, request: &LuckUpgradeRequest) -> Result<GameStateView> {
        let result = self
            .mutate(account_id, |state, _now| rolling::purchase_luck_upgrade(state, request))
            .await
            .map(|(_, view)| view);
        logged("upgrade_luck", result)
    }

    pub async fn buy_potion(&self, account_id: Uuid, request: &PotionRequest) -> Result<GameStateView> {
        let result = self
            .mutate(account_id, |state, now| rolling::purchase_potion(state, request, now))
            .await
            .map(|(_, view)| view);
        logged("buy_potion", result)
    }

    pub async fn claim_starter_bundle(&self, account_id: Uuid) -> Result<GameStateView> {
        let bundle = self.settings.starter_bundle.clone();
        let result = self
            .mutate(account_id, |state, now| rolling::claim_starter_bundle(state, &bundle, now))
            .await
            .map(|(_, view)| view);
        logged("claim_starter_bundle", result)
    }

    pub async fn claim_daily_reward(&self, account_id: Uuid) -> Result<(DailyClaim, GameStateView)> {
        let daily = self.settings.daily.clone();
        let result = self
            .mutate(account_id, |state, now| rolling::claim_daily_reward(state, &daily, now))
            .await;
        logged("claim_daily_reward", result)
    }

    pub async fn leaderboard(&self, category: LeaderboardCategory, limit: Option<usize>) -> Result<Vec<RankedEntry>> {
        let result = async {
            if !LeaderboardCategory::PLAYER.contains(&category) {
                return Err(GameError::InvalidInput(format!(
                    "category '{}' is not a player leaderboard",
                    category.as_str()
                )));
            }
            let limit = limit
                .unwrap_or(self.settings.leaderboard.default_limit)
                .clamp(1, self.settings.leaderboard.max_limit);
            let entries = self.store.leaderboard(category, limit).await?;
            Ok::<_, GameError>(top_leaderboard(&entries, category, limit))
        }
        .await;
        logged("leaderboard", result)
    }

    pub async fn profile(&self, account_id: Uuid) -> Result<ProfileSummary> {
        let result = self.load(account_id).await.map(|a| ProfileSummary::from_account(&a));
        logged("profile", result)
    }

    async fn load(&self, account_id: Uuid) -> Result<Account> {
        self.store
            .find_account(account_id)
            .await?
            .ok_or_else(|| GameError::NotFound(format!("account {}", account_id)))
    }

    /// Load, apply `op`, save. Nothing is written when `op` fails.
    async fn mutate<T, F>(&self, account_id: Uuid, op: F) -> Result<(T, GameStateView)>
    where
        F: FnOnce(&mut PlayerState, DateTime<Utc>) -> Result<T>,
    {
        let mut account = self.load(account_id).await?;
        let now = Utc::now();
        rolling::luck::prune_expired_potions(&mut account.state, now);

        let output = op(&mut account.state, now)?;

        self.store.save_account(&account).await?;
        self.publish_leaderboard(&account, now).await;
        Ok((output, GameStateView::of(&account.state, now)))
    }

    /// Leaderboard rows are a projection of the saved account; a failed
    /// write is logged and left for the next update to repair.
    async fn publish_leaderboard(&self, account: &Account, now: DateTime<Utc>) {
        for entry in LeaderboardEntry::for_account(account, now) {
            if let Err(e) = self.store.upsert_leaderboard(&entry).await {
                warn!(
                    "Failed to update {} leaderboard for {}: {}",
                    entry.category.as_str(),
                    account.username,
                    e
                );
            }
        }
    }
}

fn logged<T>(operation: &str, result: Result<T>) -> Result<T> {
    if let Err(e) = &result {
        if e.is_user_facing() {
            warn!("{} rejected: {}", operation, e);
        } else {
            error!("{} failed: {}", operation, e);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MockAccountStore;

    fn account_with_coins(coins: u64) -> Account {
        Account::new(
            "hunter".to_string(),
            "hunter@example.com".to_string(),
            PlayerState::new(coins, 1.0),
        )
    }

    #[tokio::test]
    async fn test_roll_saves_and_publishes() {
        let account = account_with_coins(1_000);
        let id = account.id;
        let loaded = account.clone();

        let mut store = MockAccountStore::new();
        store
            .expect_find_account()
            .withf(move |requested| *requested == id)
            .returning(move |_| Ok(Some(loaded.clone())));
        store
            .expect_save_account()
            .withf(|saved| saved.state.total_rolls == 1 && saved.state.auras.len() == 1)
            .times(1)
            .returning(|_| Ok(()));
        store.expect_upsert_leaderboard().times(3).returning(|_| Ok(()));

        let service = GameService::with_seed(Arc::new(store), Settings::default(), 7);
        let result = service.roll(id, RollKind::Single).await.unwrap();

        assert_eq!(result.total_rolls, 1);
        assert_eq!(result.report.outcomes.len(), 1);
        let ids: Vec<_> = result.new_achievements.iter().map(|d| d.id).collect();
        assert!(ids.contains(&"first_roll"));
    }

    #[tokio::test]
    async fn test_insufficient_funds_never_saves() {
        let account = account_with_coins(40);
        let id = account.id;

        let mut store = MockAccountStore::new();
        store
            .expect_find_account()
            .returning(move |_| Ok(Some(account.clone())));
        store.expect_save_account().never();
        store.expect_upsert_leaderboard().never();

        let service = GameService::with_seed(Arc::new(store), Settings::default(), 1);
        let result = service.roll(id, RollKind::Single).await;
        assert!(matches!(result, Err(GameError::InsufficientFunds { needed: 50, available: 40 })));
    }

    #[tokio::test]
    async fn test_unknown_account_is_not_found() {
        let mut store = MockAccountStore::new();
        store.expect_find_account().returning(|_| Ok(None));

        let service = GameService::with_seed(Arc::new(store), Settings::default(), 1);
        let result = service.profile(Uuid::new_v4()).await;
        assert!(matches!(result, Err(GameError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_leaderboard_failure_does_not_fail_roll() {
        let account = account_with_coins(1_000);
        let id = account.id;

        let mut store = MockAccountStore::new();
        store
            .expect_find_account()
            .returning(move |_| Ok(Some(account.clone())));
        store.expect_save_account().times(1).returning(|_| Ok(()));
        store
            .expect_upsert_leaderboard()
            .returning(|_| Err(GameError::Unexpected("disk full".to_string())));

        let service = GameService::with_seed(Arc::new(store), Settings::default(), 3);
        assert!(service.roll(id, RollKind::Single).await.is_ok());
    }

    #[tokio::test]
    async fn test_chest_score_is_not_a_player_leaderboard() {
        let store = MockAccountStore::new();
        let service = GameService::with_seed(Arc::new(store), Settings::default(), 1);
        let result = service.leaderboard(LeaderboardCategory::ChestScore, None).await;
        assert!(matches!(result, Err(GameError::InvalidInput(_))));
    }
}
