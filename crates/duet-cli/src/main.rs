use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "duet")]
#[command(about = "DUET - compare a single-shot LLM answer with a Parlant agent answer", long_about = None)]
struct Cli {
    /// Path to config.toml (defaults to the user config directory)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare both backends on one or more queries
    Compare {
        /// Queries to run, in order
        #[arg(required = true, num_args = 1..)]
        queries: Vec<String>,

        /// Print a JSON array instead of text blocks
        #[arg(long)]
        json: bool,

        /// Run the LLM call before the agent exchange instead of alongside it
        #[arg(long)]
        sequential: bool,
    },
    /// Run the configured demo queries
    Demo {
        /// Print a JSON array instead of text blocks
        #[arg(long)]
        json: bool,
    },
    /// Check that the agent backend is reachable and the agent id resolves
    Health,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted, abandoning in-flight comparison");
            on_interrupt.cancel();
        }
    });

    let config = commands::context::load_config(cli.config)?;

    match cli.command {
        Commands::Compare {
            queries,
            json,
            sequential,
        } => commands::compare::run(&config, &queries, json, sequential, &cancel).await?,
        Commands::Demo { json } => commands::demo::run(&config, json, &cancel).await?,
        Commands::Health => commands::health::run(&config).await?,
    }

    Ok(())
}
