//! Board watcher CLI
//!
//! Local execution entry point.

use std::path::PathBuf;
use std::time::Duration;

use boardwatch::{
    error::Result,
    models::{Board, Config},
    pipeline::{self, Watcher},
    services::{ConsoleNotifier, HttpBoardClient},
    storage::{AnchorStore, LocalStorage},
};
use clap::{Parser, Subcommand};

/// boardwatch - Bulletin board keyword watcher
#[derive(Parser, Debug)]
#[command(
    name = "boardwatch",
    version,
    about = "Watch bulletin boards and route new posts to subscribers"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "boardwatch.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Bootstrap every board, then scan on an interval until Ctrl-C
    Watch {
        /// Override scan.interval_secs
        #[arg(long)]
        interval: Option<u64>,
    },

    /// Run a single scan round
    Scan,

    /// Validate the configuration file
    Validate,

    /// Show boards and saved anchors
    Info,
}

/// Initialize logging from the configured level, or debug when verbose.
fn init_logging(level: &str, verbose: bool) {
    let level = if verbose { "debug" } else { level };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn build_boards(config: &Config) -> Vec<Board> {
    config
        .boards
        .iter()
        .map(|entry| Board::from_config(entry, &config.listing))
        .collect()
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            init_logging("info", cli.verbose);
            log::error!("Failed to load {}: {}", cli.config.display(), e);
            return Err(e);
        }
    };
    init_logging(&config.logging.level, cli.verbose);

    log::info!("boardwatch starting...");
    log::info!("Loaded configuration from {}", cli.config.display());

    let storage = config.scan.state_dir.as_ref().map(LocalStorage::new);

    match cli.command {
        Command::Watch { interval } => {
            pipeline::run_validate(&config)?;

            let client = HttpBoardClient::new(&config)?;
            let notifier = ConsoleNotifier::new(config.notify.template.clone());
            let store = storage.as_ref().map(|s| s as &dyn AnchorStore);
            let watcher = Watcher::new(&config, &client, &client, &notifier, store);

            let mut boards = build_boards(&config);
            let interval = interval.unwrap_or(config.scan.interval_secs).max(1);
            let interval = Duration::from_secs(interval);
            pipeline::run_watch(&watcher, &mut boards, interval).await?;
        }

        Command::Scan => {
            config.validate()?;

            let client = HttpBoardClient::new(&config)?;
            let notifier = ConsoleNotifier::new(config.notify.template.clone());
            let store = storage.as_ref().map(|s| s as &dyn AnchorStore);
            let watcher = Watcher::new(&config, &client, &client, &notifier, store);

            let mut boards = build_boards(&config);
            if store.is_none() {
                log::warn!("scan.state_dir is not set; every board starts from its current head");
            }
            watcher.bootstrap_all(&mut boards).await;
            let stats = watcher.run_round(&mut boards).await;
            stats.log_summary();
        }

        Command::Validate => {
            pipeline::run_validate(&config)?;
            log::info!("All validations passed!");
        }

        Command::Info => {
            log::info!("Config file: {}", cli.config.display());
            for board in build_boards(&config) {
                log::info!("Board {}: {}", board.name, board.url);
                let Some(storage) = &storage else {
                    continue;
                };
                match storage.load_anchor(&board.name).await? {
                    Some(snapshot) => {
                        let ids: Vec<&str> =
                            snapshot.posts.iter().map(|p| p.post_id.as_str()).collect();
                        log::info!(
                            "  anchors [{}] saved at {}",
                            ids.join(", "),
                            snapshot.updated_at
                        );
                    }
                    None => log::info!("  no saved anchors yet"),
                }
            }
            if storage.is_none() {
                log::info!("Anchor persistence disabled (scan.state_dir not set)");
            }
        }
    }

    log::info!("Done!");

    Ok(())
}
