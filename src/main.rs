//! Choreboard server binary.

use anyhow::Result;
use choreboard::cli::{Cli, Command};
use choreboard::config::Config;
use choreboard::db::{Database, now_ms};
use choreboard::http::{self, AppState};
use choreboard::performance::PerformanceService;
use choreboard::types::HouseholdRanking;
use choreboard::{seed, sweeper};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let mut config = Config::load(cli.config.as_deref())?;

    // CLI flags win over the config file
    if let Some(db_path) = cli.database {
        config.server.db_path = db_path;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    match cli.command {
        Some(Command::Sweep) => {
            let db = open_db(&config)?;
            let failed = db.sweep_overdue(now_ms())?;
            println!("Marked {} task(s) as failed", failed);
        }
        Some(Command::Rank { household }) => {
            let db = open_db(&config)?;
            let service = PerformanceService::new(&db, &config);
            match service.rank_household(&household)? {
                Some(ranking) => print_ranking(&ranking),
                None => anyhow::bail!("household not found: {}", household),
            }
        }
        Some(Command::Seed { household, weeks }) => {
            let db = open_db(&config)?;
            let created = seed::seed_household(&db, &household, weeks)?;
            println!("Created {} sample task(s)", created);
        }
        Some(Command::Serve) | None => run_server(config).await?,
    }

    Ok(())
}

fn open_db(config: &Config) -> Result<Database> {
    config.ensure_db_dir()?;
    Database::open(&config.server.db_path)
}

async fn run_server(config: Config) -> Result<()> {
    info!("Starting choreboard v{}", env!("CARGO_PKG_VERSION"));
    info!("Database: {:?}", config.server.db_path);

    let db = Arc::new(open_db(&config)?);
    info!("Database initialized successfully");

    let sweeper_handle = if config.sweeper.enabled {
        Some(sweeper::spawn(
            Arc::clone(&db),
            Duration::from_secs(config.sweeper.interval_secs),
        ))
    } else {
        info!("Deadline sweeper disabled by config");
        None
    };

    let addr = config.bind_addr();
    let state = AppState {
        db,
        config: Arc::new(config),
    };
    let result = http::serve(state, &addr).await;

    if let Some(handle) = sweeper_handle {
        handle.abort();
    }
    result
}

/// Human-readable ranking report for the `rank` subcommand.
fn print_ranking(ranking: &HouseholdRanking) {
    println!("Performance ranking for {}", ranking.household_name);
    println!();

    if ranking.members.is_empty() {
        println!("No members with task history.");
        return;
    }

    for member in &ranking.members {
        println!(
            "{}. {} - {}/{} tasks ({}%)",
            member.rank.unwrap_or(0),
            member.member_name,
            member.total_completed,
            member.total_tasks,
            member.overall_completion_rate
        );
        if member.top3_strengths.is_empty() {
            println!("   not enough data for category analysis");
        }
        for (i, strength) in member.top3_strengths.iter().enumerate() {
            println!(
                "   {}. {}: score {}/100, {}/{} tasks ({}%), on-time {}%",
                i + 1,
                strength.display_name,
                strength.score,
                strength.completed,
                strength.total_tasks,
                strength.completion_rate,
                strength.on_time_rate
            );
        }
        println!();
    }

    println!("Generated at {}", ranking.generated_at);
}
