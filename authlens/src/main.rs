mod commands;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use time::{format_description, UtcOffset};
use tracing_subscriber::filter::dynamic_filter_fn;
use tracing_subscriber::fmt::time::OffsetTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

#[derive(clap::Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the authentication database snapshot (SQLite)
    #[arg(long, short)]
    db: PathBuf,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Load a snapshot and print risk insights
    Report {
        /// Free-text filter over usernames and event reasons
        #[arg(long, short)]
        filter: Option<String>,
        /// Emit the report as JSON
        #[arg(long)]
        json: bool,
        /// Risk heuristic overrides (YAML)
        #[arg(long)]
        risk_config: Option<PathBuf>,
    },
    /// Unlock a locked user account
    Unlock {
        /// Id of the user to unlock
        user_id: i64,
    },
}

fn init_logging() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "authlens=info")
    }

    let offset = UtcOffset::current_local_offset()
        .unwrap_or_else(|_| UtcOffset::from_whole_seconds(0).unwrap());

    let env_filter = Arc::new(EnvFilter::from_default_env());
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_timer(OffsetTime::new(
            offset,
            format_description::parse("[day].[month].[year] [hour]:[minute]:[second]").unwrap(),
        ))
        .with_filter(dynamic_filter_fn(move |m, c| {
            env_filter.enabled(m, c.clone())
        }));

    tracing_subscriber::registry().with(fmt_layer).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Report {
            filter,
            json,
            risk_config,
        } => {
            crate::commands::report::command(&cli.db, filter.as_deref(), *json, risk_config.as_deref())
                .await
        }
        Commands::Unlock { user_id } => crate::commands::unlock::command(&cli.db, *user_id).await,
    }
}
