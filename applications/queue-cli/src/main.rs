/// OuterTune queue CLI - inspect and prune persisted queues
use clap::{Parser, Subcommand};
use outertune_core::QueueId;
use outertune_queue_cli::{commands, config::AppConfig};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "outertune-queue-cli")]
#[command(about = "Inspect and prune persisted OuterTune queues", long_about = None)]
struct Cli {
    /// Configuration file path (default: ./outertune.toml when present)
    #[arg(short, long, global = true, env = "OUTERTUNE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List saved queues, least recently used first
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show the tracks of one queue
    Show {
        /// Queue id
        id: QueueId,
        /// Print JSON instead of a listing
        #[arg(long)]
        json: bool,
    },
    /// Delete a saved queue
    Delete {
        /// Queue id
        id: QueueId,
    },
    /// Keep only the most recently used queues
    Prune {
        /// Number of queues to keep
        #[arg(short, long)]
        keep: usize,
    },
    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "outertune=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;

    if let Commands::Config = cli.command {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    let pool = outertune_storage::create_pool(&config.storage.database_url).await?;
    outertune_storage::run_migrations(&pool).await?;

    match cli.command {
        Commands::List { json } => {
            println!("{}", commands::list(&pool, &config.board, json).await?.trim_end());
        }
        Commands::Show { id, json } => {
            println!("{}", commands::show(&pool, id, json).await?.trim_end());
        }
        Commands::Delete { id } => {
            commands::delete(&pool, id).await?;
            println!("Deleted queue {}", id);
        }
        Commands::Prune { keep } => {
            let removed = commands::prune(&pool, &config.board, keep).await?;
            println!("Removed {} queue(s)", removed);
        }
        Commands::Config => {}
    }

    pool.close().await;
    Ok(())
}
