use aura_rng::{
    config::{aura_table, Settings},
    models::{
        parse_request, GameError, LeaderboardCategory, PotionRequest, Rarity, RegisterRequest,
        RewardEntry, RewardTable, ScoreSubmission,
    },
    rolling::{RewardSelector, RollRules},
    service::{ChestArcade, GameService, RollKind},
    store::{AccountStore, MemoryStore, SqliteStore},
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;

fn two_entry_table() -> RewardTable {
    RewardTable {
        name: "pair".to_string(),
        cost: 50,
        entries: vec![
            RewardEntry::fixed("common", 5, 0.4, Rarity::Common),
            RewardEntry::fixed("rare", 50, 0.08, Rarity::Rare),
        ],
    }
}

async fn register(service: &GameService, name: &str) -> uuid::Uuid {
    service
        .register(&RegisterRequest {
            username: name.to_string(),
            email: format!("{}@example.com", name),
        })
        .await
        .unwrap()
        .id
}

#[test]
fn test_selection_converges_to_weights() {
    let selector = RewardSelector::default();
    let table = two_entry_table();
    let mut rng = ChaCha8Rng::seed_from_u64(2024);

    let draws = 60_000;
    let rare = (0..draws)
        .filter(|_| selector.select(&table, 1.0, &mut rng).unwrap().label == "rare")
        .count();

    let observed = rare as f64 / draws as f64;
    let expected = 0.08 / 0.48;
    assert!((observed - expected).abs() < 0.01, "observed {}", observed);
}

#[test]
fn test_default_luck_scaling() {
    let selector = RewardSelector::new(RollRules::from(&Settings::default().economy));

    assert!((selector.adjusted_weight(0.4, 4.0) - 1.6).abs() < 1e-12);
    assert!((selector.adjusted_weight(0.08, 4.0) - 0.16).abs() < 1e-12);
}

#[test]
fn test_potions_raise_divine_share() {
    let settings = Settings::default();
    let selector = RewardSelector::new(RollRules {
        lucky_chance: 0.0,
        ..RollRules::from(&settings.economy)
    });
    let table = aura_table(settings.economy.roll_cost);

    let divine_share = |luck: f64| {
        let mut rng = ChaCha8Rng::seed_from_u64(77);
        let draws = 200_000;
        let hits = (0..draws)
            .filter(|_| selector.select(&table, luck, &mut rng).unwrap().rarity >= Rarity::Divine)
            .count();
        hits as f64 / draws as f64
    };

    let base = divine_share(1.0);
    let boosted = divine_share(10.0);
    assert!(boosted > base * 2.0, "base {} boosted {}", base, boosted);
}

#[tokio::test]
async fn test_oversized_potion_rejected_by_service() {
    let store = Arc::new(MemoryStore::new()) as Arc<dyn AccountStore>;
    let service = GameService::with_seed(store, Settings::default(), 4);
    let id = register(&service, "brewer").await;

    let potion = PotionRequest {
        multiplier: 2.0,
        duration_ms: 10_000_000_000_000_000,
        cost: 100,
        kind: "luck".to_string(),
    };
    let result = service.buy_potion(id, &potion).await;
    assert!(matches!(result, Err(GameError::InvalidInput(_))));

    let view = service.game_state(id).await.unwrap();
    assert_eq!(view.state.coins, 1_000);
    assert!(view.state.active_potions.is_empty());
}

#[test]
fn test_aura_values_stay_in_range() {
    let selector = RewardSelector::default();
    let table = aura_table(50);
    let mut rng = ChaCha8Rng::seed_from_u64(9);

    for luck in [0.0, 1.0, 3.5, 100.0] {
        for _ in 0..2_000 {
            let outcome = selector.select(&table, luck, &mut rng).unwrap();
            assert!(table.entries.iter().any(|e| e.label == outcome.label));
            assert!(outcome.rolled_value >= outcome.min_value);
            assert!(outcome.rolled_value <= outcome.max_value);
        }
    }
}

#[tokio::test]
async fn test_full_session_on_memory_store() {
    let store = Arc::new(MemoryStore::new()) as Arc<dyn AccountStore>;
    let service = GameService::with_seed(store, Settings::default(), 5);
    let id = register(&service, "hunter").await;

    let single = service.roll(id, RollKind::Single).await.unwrap();
    assert_eq!(single.total_rolls, 1);

    let quick = service.roll(id, RollKind::Quick).await.unwrap();
    assert_eq!(quick.total_rolls, 11);
    assert_eq!(quick.report.outcomes.len(), 10);

    let profile = service.profile(id).await.unwrap();
    assert_eq!(profile.total_rolls, 11);
    assert_eq!(profile.total_auras, 11);
    assert!(profile.achievements_unlocked >= 1);

    // Achievements never unlock twice
    let again = service.roll(id, RollKind::Single).await.unwrap();
    assert!(again.new_achievements.iter().all(|d| d.id != "first_roll"));

    let board = service
        .leaderboard(LeaderboardCategory::TotalRolls, None)
        .await
        .unwrap();
    assert_eq!(board.len(), 1);
    assert_eq!(board[0].holder, "hunter");
    assert_eq!(board[0].value, 12);
}

#[tokio::test]
async fn test_broke_player_keeps_balance() {
    let mut settings = Settings::default();
    settings.economy.starting_coins = 40;

    let store = Arc::new(MemoryStore::new()) as Arc<dyn AccountStore>;
    let service = GameService::with_seed(store, settings, 1);
    let id = register(&service, "broke").await;

    let result = service.roll(id, RollKind::Single).await;
    assert!(matches!(
        result,
        Err(GameError::InsufficientFunds { needed: 50, available: 40 })
    ));

    let state = service.game_state(id).await.unwrap();
    assert_eq!(state.state.coins, 40);
    assert_eq!(state.state.total_rolls, 0);
}

#[tokio::test]
async fn test_shop_and_daily_on_sqlite_store() {
    let store = Arc::new(SqliteStore::in_memory().await.unwrap()) as Arc<dyn AccountStore>;
    let service = GameService::with_seed(store, Settings::default(), 3);
    let id = register(&service, "shopper").await;

    let (claim, view) = service.claim_daily_reward(id).await.unwrap();
    assert_eq!(claim.coin_reward, 100);
    assert_eq!(claim.streak_days, 1);
    assert_eq!(view.state.coins, 1_100);

    let again = service.claim_daily_reward(id).await;
    assert!(matches!(again, Err(GameError::DailyRewardNotReady { .. })));

    let view = service.claim_starter_bundle(id).await.unwrap();
    assert_eq!(view.state.coins, 2_100);
    assert!(view.total_luck > 1.5);
    assert!(matches!(
        service.claim_starter_bundle(id).await,
        Err(GameError::AlreadyClaimed(_))
    ));

    let potion = PotionRequest {
        multiplier: 1.0,
        duration_ms: 60_000,
        cost: 100,
        kind: "luck".to_string(),
    };
    let view = service.buy_potion(id, &potion).await.unwrap();
    assert_eq!(view.state.coins, 2_000);
    assert_eq!(view.state.active_potions.len(), 2);

    let reloaded = service.resolve("shopper@example.com").await.unwrap();
    assert_eq!(reloaded.state.coins, 2_000);
}

#[tokio::test]
async fn test_duplicate_registration_rejected() {
    let store = Arc::new(MemoryStore::new()) as Arc<dyn AccountStore>;
    let service = GameService::with_seed(store, Settings::default(), 1);
    register(&service, "hunter").await;

    let dup = service
        .register(&RegisterRequest {
            username: "hunter".to_string(),
            email: "other@example.com".to_string(),
        })
        .await;
    assert!(matches!(dup, Err(GameError::AlreadyExists(_))));
}

#[test]
fn test_untyped_body_rejected_at_boundary() {
    let missing = parse_request::<ScoreSubmission>(r#"{"player_name": "A"}"#);
    assert!(matches!(missing, Err(GameError::InvalidInput(_))));

    let wrong_type = parse_request::<ScoreSubmission>(r#"{"player_name": "A", "score": "lots"}"#);
    assert!(matches!(wrong_type, Err(GameError::InvalidInput(_))));

    let ok = parse_request::<ScoreSubmission>(r#"{"player_name": "A", "score": 12.5}"#).unwrap();
    assert_eq!(ok.score, Some(12.5));
}

#[test]
fn test_chest_arcade_board() {
    let settings = Settings::default();
    let mut arcade = ChestArcade::with_seed(RewardSelector::default(), &settings.leaderboard, 8);

    arcade
        .submit_score(&ScoreSubmission {
            player_name: Some("Newcomer".to_string()),
            score: Some(500.0),
        })
        .unwrap();

    let top = arcade.leaderboard();
    assert_eq!(top[0].holder, "Newcomer");
    assert_eq!(top[1].value, 234);
    assert!(top.len() <= 10);

    assert!(arcade.open_chest("legendary").is_ok());
}
