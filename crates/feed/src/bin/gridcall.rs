use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use feed::canonical::transformer::OutcomeTransformer;
use feed::canonical::validator::ClassificationValidator;
use feed::sources::file::read_classification;
use feed::{Config, FeedLocation};
use serde::Serialize;
use storage::Database;
use storage::dto::league::LeagueResponse;
use storage::repository::PgStore;
use storage::services::league::leagues_for_user;
use storage::services::{get_standings, score_event, score_season, sync_schedule};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "gridcall")]
#[command(about = "Race-weekend prediction scoring", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, env = "DATABASE_URL", global = true, hide_env_values = true)]
    database_url: Option<String>,

    /// Directory or http(s) base URL of published classifications and schedules
    #[arg(long, env = "OUTCOME_FEED", global = true)]
    feed: Option<FeedLocation>,

    /// JSON scoring policy; built-in weights when unset
    #[arg(long, env = "SCORING_POLICY", global = true)]
    policy: Option<PathBuf>,

    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Load a season's calendar and roster from the feed into the database
    SyncSchedule { season: i32 },
    /// Score every prediction of one event
    ScoreEvent { event_id: Uuid },
    /// Rescore every finalized event of a season in round order
    ScoreSeason { season: i32 },
    /// Print a league table as JSON
    Standings { league_id: Uuid },
    /// List the leagues a user belongs to
    Leagues { user_id: Uuid },
    /// Validate a classification file and print the derived outcome
    CheckOutcome { file: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("gridcall={log_level},feed={log_level},storage={log_level}").into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config {
        database_url: cli.database_url,
        outcome_feed: cli.feed,
        scoring_policy: cli.policy,
    };

    match cli.command {
        Commands::Migrate => {
            let db = connect(&config).await?;
            db.run_migrations().await.context("Migration failed")?;
            tracing::info!("Migrations applied");
        }
        Commands::SyncSchedule { season } => {
            let schedule = config.outcome_feed()?.load_schedule(season).await?;
            let store = PgStore::new(connect(&config).await?.pool().clone());

            let report = sync_schedule(&store, &schedule)
                .await
                .with_context(|| format!("Syncing schedule for {season} failed"))?;
            print_json(&report)?;
        }
        Commands::ScoreEvent { event_id } => {
            let store = PgStore::new(connect(&config).await?.pool().clone());
            let feed = config.outcome_feed()?.connect()?;
            let policy = config.scoring_policy()?;

            let report = score_event(&store, &*feed, &policy, event_id, Utc::now())
                .await
                .with_context(|| format!("Scoring event {event_id} failed"))?;
            print_json(&report)?;
        }
        Commands::ScoreSeason { season } => {
            let store = PgStore::new(connect(&config).await?.pool().clone());
            let feed = config.outcome_feed()?.connect()?;
            let policy = config.scoring_policy()?;

            let reports = score_season(&store, &*feed, &policy, season, Utc::now())
                .await
                .with_context(|| format!("Scoring season {season} failed"))?;
            print_json(&reports)?;
        }
        Commands::Standings { league_id } => {
            let store = PgStore::new(connect(&config).await?.pool().clone());
            let table = get_standings(&store, &store, league_id, Utc::now())
                .await
                .with_context(|| format!("Loading standings for league {league_id} failed"))?;
            print_json(&table)?;
        }
        Commands::Leagues { user_id } => {
            let store = PgStore::new(connect(&config).await?.pool().clone());
            let leagues: Vec<LeagueResponse> = leagues_for_user(&store, user_id)
                .await?
                .into_iter()
                .map(LeagueResponse::from)
                .collect();
            print_json(&leagues)?;
        }
        Commands::CheckOutcome { file } => {
            tracing::info!("Loading classification from: {}", file.display());
            let classification = read_classification(&file).await?;

            let report = ClassificationValidator::validate(&classification)?;
            report.log_warnings();

            let outcome = OutcomeTransformer::to_outcome(
                &classification,
                Uuid::nil(),
                classification.sprint.is_some(),
            )?;
            tracing::info!(
                "✓ {} round {} is valid ({} warning(s))",
                classification.event.season,
                classification.event.round,
                report.warnings.len()
            );
            print_json(&outcome)?;
        }
    }

    Ok(())
}

async fn connect(config: &Config) -> Result<Database> {
    let url = config.database_url()?;
    Database::new(url)
        .await
        .context("Cannot connect to database")
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
