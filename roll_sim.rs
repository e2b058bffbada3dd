use aura_rng::{
    config::{aura_table, Settings},
    models::{Rarity, RegisterRequest},
    rolling::{RewardSelector, RollRules},
    service::{GameService, RollKind},
    store::{AccountStore, MemoryStore},
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

const DRAWS_PER_LEVEL: usize = 100_000;
const LUCK_LEVELS: [f64; 5] = [1.0, 1.5, 2.0, 5.0, 10.0];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let settings = Settings::default();
    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(42);

    info!("Simulating {} draws per luck level (seed {})", DRAWS_PER_LEVEL, seed);

    let selector = RewardSelector::new(RollRules::from(&settings.economy));
    let table = aura_table(settings.economy.roll_cost);
    let mut rng = StdRng::seed_from_u64(seed);

    for luck in LUCK_LEVELS {
        let mut counts: BTreeMap<Rarity, usize> = BTreeMap::new();
        let mut lucky = 0usize;
        let mut total_value = 0u64;

        for _ in 0..DRAWS_PER_LEVEL {
            let outcome = selector.select(&table, luck, &mut rng)?;
            *counts.entry(outcome.rarity).or_insert(0) += 1;
            total_value += outcome.value;
            if outcome.lucky {
                lucky += 1;
            }
        }

        println!("\n=== Luck x{:.1} ===", luck);
        for rarity in Rarity::ALL {
            let count = counts.get(&rarity).copied().unwrap_or(0);
            println!(
                "  {:<12} {:>7}  ({:>7.3}%)",
                rarity.as_str(),
                count,
                count as f64 * 100.0 / DRAWS_PER_LEVEL as f64
            );
        }
        println!("  Lucky draws: {:.2}%", lucky as f64 * 100.0 / DRAWS_PER_LEVEL as f64);
        println!("  Mean value:  {:.1}", total_value as f64 / DRAWS_PER_LEVEL as f64);
    }

    // Play one account until it can no longer afford a roll
    let store = Arc::new(MemoryStore::new()) as Arc<dyn AccountStore>;
    let service = GameService::with_seed(store, settings, seed);
    let account = service
        .register(&RegisterRequest {
            username: "simulator".to_string(),
            email: "sim@example.com".to_string(),
        })
        .await?;

    let mut rolls = 0u32;
    loop {
        match service.roll(account.id, RollKind::Single).await {
            Ok(result) => {
                rolls += 1;
                for def in &result.new_achievements {
                    info!("Unlocked {} after {} rolls", def.name, rolls);
                }
                if rolls >= 10_000 {
                    warn!("Stopping after {} rolls; balance still {}", rolls, result.coins);
                    break;
                }
            }
            Err(e) => {
                info!("Session ended after {} rolls: {}", rolls, e);
                break;
            }
        }
    }

    let profile = service.profile(account.id).await?;
    println!("\n=== Session ===");
    println!("Rolls: {}", profile.total_rolls);
    println!("Final coins: {}", profile.total_coins);
    println!("Highest aura: {}", profile.highest_value_aura);
    println!("Achievements: {}", profile.achievements_unlocked);
    for (rarity, count) in &profile.rarity_counts {
        println!("  {:<12} {}", rarity.as_str(), count);
    }

    Ok(())
}
