use aura_rng::{
    config::Settings,
    models::{LeaderboardCategory, LuckUpgradeRequest, PotionRequest, RegisterRequest, ScoreSubmission},
    rolling::{RewardSelector, RollRules},
    service::{ChestArcade, GameService, GameStateView, RollKind},
    store::{AccountStore, SqliteStore},
};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(name = "aura-rng")]
#[clap(about = "Roll for auras, open chests and climb the leaderboards", long_about = None)]
struct Cli {
    /// Override the database URL from settings
    #[clap(long, global = true)]
    database: Option<String>,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new account
    Register {
        #[clap(short, long)]
        username: String,

        #[clap(short, long)]
        email: String,
    },

    /// Sign in with a username or email
    Login {
        player: String,
    },

    /// Show coins, luck and potions
    State {
        player: String,
    },

    /// Spend coins on a roll
    Roll {
        player: String,

        /// Roll a full batch at the quick-roll price
        #[clap(short, long)]
        quick: bool,
    },

    /// Claim the daily coin reward
    Daily {
        player: String,
    },

    /// Buy a permanent luck bonus
    UpgradeLuck {
        player: String,

        #[clap(long)]
        increase: f64,

        #[clap(long)]
        cost: u64,
    },

    /// Buy a temporary luck potion
    Potion {
        player: String,

        #[clap(long)]
        multiplier: f64,

        /// Duration in seconds
        #[clap(long)]
        duration: u64,

        #[clap(long)]
        cost: u64,

        #[clap(long, default_value = "luck")]
        kind: String,
    },

    /// Claim the one-time starter bundle
    Starter {
        player: String,
    },

    /// Show a player's profile summary
    Profile {
        player: String,
    },

    /// Show a leaderboard (highest_aura, total_rolls, total_coins)
    Leaderboard {
        #[clap(default_value = "highest_aura")]
        category: String,

        #[clap(short, long)]
        limit: Option<usize>,
    },

    /// Open chests in the arcade
    Chest {
        /// Chest kind (common, rare, legendary)
        kind: String,

        #[clap(short = 'n', long, default_value = "1")]
        count: u32,

        /// Post the total value to the arcade score board under this name
        #[clap(long)]
        name: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let (mut settings, defaulted) = match Settings::new() {
        Ok(settings) => (settings, false),
        Err(_) => (Settings::default(), true),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.app.log_level)),
        )
        .init();

    if defaulted {
        info!("Using default settings");
    }
    if let Some(url) = cli.database {
        settings.database.url = url;
    }

    // Validate settings
    if let Err(e) = settings.validate() {
        error!("Invalid settings: {}", e);
        return Err(anyhow::anyhow!(e));
    }

    // The arcade needs no store
    if let Commands::Chest { kind, count, name } = &cli.command {
        return run_chest(&settings, kind, *count, name.as_deref());
    }

    let store = Arc::new(SqliteStore::connect(&settings.database).await?) as Arc<dyn AccountStore>;
    info!("Using {} store", store.name());
    let service = GameService::new(store, settings);

    match cli.command {
        Commands::Register { username, email } => {
            let account = service.register(&RegisterRequest { username, email }).await?;
            println!("\n=== Welcome, {} ===", account.username);
            println!("Account ID: {}", account.id);
            println!("Starting coins: {}", account.state.coins);
        }

        Commands::Login { player } => {
            let account = service.sign_in(&player).await?;
            println!("Signed in as {} ({})", account.username, account.id);
        }

        Commands::State { player } => {
            let account = service.resolve(&player).await?;
            let view = service.game_state(account.id).await?;
            print_state(&account.username, &view);
        }

        Commands::Roll { player, quick } => {
            let account = service.resolve(&player).await?;
            let kind = if quick { RollKind::Quick } else { RollKind::Single };
            let result = service.roll(account.id, kind).await?;

            println!("\n=== Roll Results (luck {:.2}) ===", result.report.luck_used);
            for outcome in &result.report.outcomes {
                let lucky = if outcome.lucky { "  LUCKY x2" } else { "" };
                println!(
                    "  {:<12} {:<20} {:>10}{}",
                    outcome.rarity.as_str(),
                    outcome.label,
                    outcome.value,
                    lucky
                );
            }
            println!("\nBest: {} ({})", result.report.best.label, result.report.best.value);
            println!("Coins earned: {}", result.report.coin_reward);
            println!("Balance: {}  Total rolls: {}", result.coins, result.total_rolls);

            for def in &result.new_achievements {
                println!("Achievement unlocked: {} - {}", def.name, def.description);
            }
        }

        Commands::Daily { player } => {
            let account = service.resolve(&player).await?;
            let (claim, view) = service.claim_daily_reward(account.id).await?;
            println!("Daily reward: +{} coins (streak {} days)", claim.coin_reward, claim.streak_days);
            println!("Balance: {}", view.state.coins);
        }

        Commands::UpgradeLuck { player, increase, cost } => {
            let account = service.resolve(&player).await?;
            let request = LuckUpgradeRequest {
                luck_increase: increase,
                cost,
            };
            let view = service.upgrade_luck(account.id, &request).await?;
            print_state(&account.username, &view);
        }

        Commands::Potion {
            player,
            multiplier,
            duration,
            cost,
            kind,
        } => {
            let account = service.resolve(&player).await?;
            let request = PotionRequest {
                multiplier,
                duration_ms: duration.saturating_mul(1000),
                cost,
                kind,
            };
            let view = service.buy_potion(account.id, &request).await?;
            print_state(&account.username, &view);
        }

        Commands::Starter { player } => {
            let account = service.resolve(&player).await?;
            let view = service.claim_starter_bundle(account.id).await?;
            println!("Starter bundle claimed!");
            print_state(&account.username, &view);
        }

        Commands::Profile { player } => {
            let account = service.resolve(&player).await?;
            let profile = service.profile(account.id).await?;
            println!("{}", serde_json::to_string_pretty(&profile)?);
        }

        Commands::Leaderboard { category, limit } => {
            let category = LeaderboardCategory::from_str(&category)
                .ok_or_else(|| anyhow::anyhow!("Invalid category: {}", category))?;
            let ranked = service.leaderboard(category, limit).await?;

            println!("\n=== {} ===", category.as_str());
            if ranked.is_empty() {
                println!("No entries yet");
            }
            for entry in ranked {
                println!("{:>3}. {:<20} {:>12}", entry.rank, entry.holder, entry.value);
            }
        }

        Commands::Chest { .. } => {}
    }

    Ok(())
}

fn run_chest(settings: &Settings, kind: &str, count: u32, name: Option<&str>) -> anyhow::Result<()> {
    let selector = RewardSelector::new(RollRules::from(&settings.economy));
    let mut arcade = ChestArcade::new(selector, &settings.leaderboard);

    let mut total_value = 0u64;
    let mut total_net = 0i64;
    for _ in 0..count.max(1) {
        let opening = arcade.open_chest(kind)?;
        println!(
            "{} chest: {} ({}) worth {}  net {:+}",
            opening.chest,
            opening.reward.label,
            opening.reward.rarity.as_str(),
            opening.reward.value,
            opening.net_gain
        );
        total_value += opening.reward.value;
        total_net += opening.net_gain;
    }
    println!("\nTotal value: {}  Net: {:+}", total_value, total_net);

    if let Some(name) = name {
        arcade.submit_score(&ScoreSubmission {
            player_name: Some(name.to_string()),
            score: Some(total_value as f64),
        })?;
    }

    println!("\n=== Chest Leaderboard ===");
    for entry in arcade.leaderboard() {
        println!("{:>3}. {:<20} {:>8}", entry.rank, entry.holder, entry.value);
    }
    Ok(())
}

fn print_state(username: &str, view: &GameStateView) {
    let state = &view.state;
    println!("\n=== {} ===", username);
    println!("Coins: {}", state.coins);
    println!("Total rolls: {}", state.total_rolls);
    println!("Luck: {:.2} (base {:.2} + bonus {:.2})", view.total_luck, state.base_luck, state.permanent_luck_bonus);
    println!("Auras owned: {}", state.auras.len());
    println!("Highest aura value: {}", state.highest_value_aura);
    for potion in &state.active_potions {
        println!("Potion: {} x{:.2} until {}", potion.kind, potion.multiplier, potion.expires_at);
    }
    println!("Achievements: {}", state.achievements.len());
}
