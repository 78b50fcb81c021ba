use std::path::PathBuf;

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use clap::{Parser, Subcommand};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use duel_ledger::api::state::AppState;
use duel_ledger::api::build_router;
use duel_ledger::calculate::build_season_stats;
use duel_ledger::config::AppConfig;
use duel_ledger::models::{
    current_season_code, get_season_info, recent_season_codes, season_code_from_date, Deck,
    GameMode, Match, MatchId, MatchResult, PlayOrder,
};
use duel_ledger::storage::{self, StorageConfig};

#[derive(Parser)]
#[command(name = "duel-ledger")]
#[command(about = "Personal ladder match tracker with season win-rate analytics")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: String,

    /// Data directory path (overrides config)
    #[arg(long)]
    data_dir: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Bind address (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port number (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Import matches from a JSON file
    Import {
        /// Path to a JSON array of match records
        file: String,

        /// Parse and report but don't store
        #[arg(long)]
        dry_run: bool,
    },

    /// Print season statistics
    Stats {
        /// Season code (default: current season)
        #[arg(long)]
        season: Option<String>,

        /// Only count matches played with this deck
        #[arg(long)]
        deck: Option<String>,
    },

    /// List recent seasons and their calendar bounds
    Seasons {
        /// How many seasons to list
        #[arg(long, default_value = "12")]
        count: i32,

        /// Season code to start from (default: current)
        #[arg(long)]
        from: Option<String>,
    },
}

/// One entry of an import file. Matches the create-request wire shape;
/// the season code may be omitted and derived from the date.
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportedMatch {
    season_code: Option<String>,
    date: String,
    #[serde(default)]
    mode: GameMode,
    #[serde(default)]
    rank: String,
    my_deck: Deck,
    opp_deck: Deck,
    play_order: PlayOrder,
    result: MatchResult,
    #[serde(default)]
    note: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting duel-ledger v{}", env!("CARGO_PKG_VERSION"));

    let config_path = PathBuf::from(&cli.config);
    let config = if config_path.exists() {
        AppConfig::from_file(&config_path)
            .with_context(|| format!("loading config from {}", cli.config))?
    } else {
        AppConfig::default()
    };

    let data_dir = cli
        .data_dir
        .map(PathBuf::from)
        .unwrap_or_else(|| config.data_dir.clone());
    let storage_config = StorageConfig::new(data_dir);

    match cli.command {
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);

            let cors = if config.server.cors_origin == "*" {
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any)
            } else {
                let origin = config
                    .server
                    .cors_origin
                    .parse::<HeaderValue>()
                    .context("invalid cors_origin in config")?;
                CorsLayer::new()
                    .allow_origin(origin)
                    .allow_methods(Any)
                    .allow_headers(Any)
            };

            let state = AppState::new(storage_config);
            let app = build_router(state)
                .layer(TraceLayer::new_for_http())
                .layer(cors);

            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }

        Commands::Import { file, dry_run } => {
            let contents = std::fs::read_to_string(&file)
                .with_context(|| format!("reading import file {}", file))?;
            let entries: Vec<ImportedMatch> =
                serde_json::from_str(&contents).context("parsing import file")?;

            let parsed = entries.len();
            let mut records: Vec<Match> = Vec::new();
            let mut skipped = 0usize;

            for entry in entries {
                let season_code = entry
                    .season_code
                    .or_else(|| season_code_from_date(&entry.date));
                let Some(season_code) = season_code else {
                    tracing::warn!("Skipping record with unusable date: {:?}", entry.date);
                    skipped += 1;
                    continue;
                };

                let now = chrono::Utc::now();
                records.push(Match {
                    id: MatchId::generate(),
                    season_code,
                    date: entry.date,
                    mode: entry.mode,
                    rank: entry.rank,
                    my_deck: entry.my_deck,
                    opp_deck: entry.opp_deck,
                    play_order: entry.play_order,
                    result: entry.result,
                    note: entry.note,
                    created_at: now,
                    updated_at: now,
                });
            }

            if !dry_run {
                storage::append_matches(&storage_config, &records)?;
            }

            println!("\n=== Import Results ===");
            println!("Records parsed:   {}", parsed);
            println!("Imported:         {}", records.len());
            println!("Skipped:          {}", skipped);
            if dry_run {
                println!("\n(dry run - no data written to disk)");
            }
        }

        Commands::Stats { season, deck } => {
            let season = season.unwrap_or_else(current_season_code);
            let info = get_season_info(&season);
            let code = info
                .as_ref()
                .map(|i| i.code.clone())
                .unwrap_or_else(|| season.clone());

            let mut matches = storage::read_matches(&storage_config)?;
            matches.retain(|m| m.season_code == code);
            if let Some(ref deck) = deck {
                matches.retain(|m| &m.my_deck.main == deck);
            }

            let range = info.as_ref().map(|i| i.range());
            let stats = build_season_stats(&matches, range.as_ref());

            println!("=== Season {} ===", code);
            if let Some(ref info) = info {
                println!("{} to {}", info.start, info.end);
            }
            if let Some(ref deck) = deck {
                println!("Deck: {}", deck);
            }
            println!();
            println!("Games:        {}", stats.total);
            println!(
                "Record:       {}W - {}L ({:.1}%)",
                stats.wins, stats.losses, stats.win_rate
            );
            println!(
                "Going first:  {} games ({:.1}%), {:.1}% win rate",
                stats.first_count, stats.first_rate, stats.first_win_rate
            );
            println!(
                "Going second: {} games, {:.1}% win rate",
                stats.second_count, stats.second_win_rate
            );

            if !stats.my_decks.is_empty() {
                println!("\nMy decks:");
                for row in stats.my_decks.iter().take(10) {
                    println!(
                        "  {:<24} {:>3} games  {:>5.1}%",
                        row.name, row.games, row.win_rate
                    );
                }
            }
            if !stats.opp_decks.is_empty() {
                println!("\nDecks faced:");
                for row in stats.opp_decks.iter().take(10) {
                    println!(
                        "  {:<24} {:>3} games  {:>5.1}%",
                        row.name, row.games, row.win_rate
                    );
                }
            }
        }

        Commands::Seasons { count, from } => {
            let codes = recent_season_codes(count, from.as_deref());
            if codes.is_empty() {
                println!("No seasons to list (check --count and --from).");
            } else {
                println!("=== Seasons ({}) ===\n", codes.len());
                for code in &codes {
                    if let Some(info) = get_season_info(code) {
                        let current = if *code == current_season_code() {
                            " [CURRENT]"
                        } else {
                            ""
                        };
                        println!("  {:<6} {} to {}{}", info.code, info.start, info.end, current);
                    }
                }
            }
        }
    }

    Ok(())
}
