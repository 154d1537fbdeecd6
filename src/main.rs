//! Binary entrypoint for the Zone 25 CLI.
//!
//! Commands:
//! - `start` - run the platform scheduler (monitor, enforcement, restocking)
//! - `init` - create a starter `config.toml`
//! - `status` - print the pool, danger level, and enforcement backlog
//! - `export` - dump the world state to a JSON file
//!
//! See the library crate docs for module-level details: `zone25::`.
use anyhow::Result;
use clap::{Parser, Subcommand};
use log::info;

use zone25::config::Config;
use zone25::server::ZoneServer;
use zone25::world::storage::WorldStoreBuilder;
use zone25::zone::{current_danger_level, stashed_item_count};

#[derive(Parser)]
#[command(name = "zone25")]
#[command(about = "Platform economy core for the Zone 25 MUD")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the platform scheduler
    Start,
    /// Initialize a new configuration file
    Init,
    /// Show platform status and enforcement backlog
    Status,
    /// Export the world state as JSON
    Export {
        /// Output file path
        #[arg(short, long, default_value = "current_state.json")]
        output: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let pre_config = match cli.command {
        Commands::Init => None,
        _ => Config::load(&cli.config).await.ok(),
    };
    if !matches!(cli.command, Commands::Init) {
        init_logging(&pre_config, cli.verbose);
    }

    match cli.command {
        Commands::Start => {
            let config = match pre_config {
                Some(config) => config,
                None => Config::load(&cli.config).await?,
            };
            info!("Starting Zone 25 v{}", env!("CARGO_PKG_VERSION"));
            let mut server = ZoneServer::new(config)?;
            server.run().await?;
        }
        Commands::Init => {
            Config::create_default(&cli.config).await?;
            println!("Wrote default configuration to {}", cli.config);
        }
        Commands::Status => {
            let config = match pre_config {
                Some(config) => config,
                None => Config::load(&cli.config).await?,
            };
            let store = WorldStoreBuilder::new(&config.storage.data_dir)
                .with_initial_pool(config.station.initial_ash_pool)
                .open()?;

            let (level, count, limit) = current_danger_level(&store, &config.zone)?;
            println!(
                "Platform: {} ({}/{} items)",
                level.label().to_uppercase(),
                count,
                limit
            );
            println!("Station pool: {} ash", store.get_pool()?);
            println!("Citizens: {}", store.list_citizens()?.len());
            println!("Stashed items: {}", stashed_item_count(&store)?);
            println!(
                "Enforcement: {} open investigation(s), {} active run(s)",
                store.list_cases()?.len(),
                store.list_runs()?.len()
            );
        }
        Commands::Export { output } => {
            let config = match pre_config {
                Some(config) => config,
                None => Config::load(&cli.config).await?,
            };
            let store = WorldStoreBuilder::new(&config.storage.data_dir)
                .with_initial_pool(config.station.initial_ash_pool)
                .open()?;

            let state = serde_json::json!({
                "pool": store.get_pool()?,
                "citizens": store.list_citizens()?,
                "entities": store.list_entities()?,
                "shelves": store.list_shelves()?,
                "shops": store.list_shops()?,
            });
            let count = state["entities"].as_array().map(|a| a.len()).unwrap_or(0);
            tokio::fs::write(&output, serde_json::to_string_pretty(&state)?).await?;
            println!("Exported {} entities to {}", count, output);
        }
    }

    Ok(())
}

fn init_logging(config: &Option<Config>, verbosity: u8) {
    use std::io::Write;
    let mut builder = env_logger::Builder::new();

    // Base level from CLI verbosity overrides config
    let base_level = match verbosity {
        0 => config
            .as_ref()
            .and_then(|c| c.logging.level.parse().ok())
            .unwrap_or(log::LevelFilter::Info),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);

    if let Some(cfg) = config {
        if let Some(ref file) = cfg.logging.file {
            if let Ok(f) = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(file)
            {
                let mutex = std::sync::Arc::new(std::sync::Mutex::new(f));
                let write_mutex = mutex.clone();
                let is_tty = atty::is(atty::Stream::Stdout);

                builder.format(move |fmt, record| {
                    let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
                    let line = format!("{} [{}] {}", ts, record.level(), record.args());
                    if let Ok(mut guard) = write_mutex.lock() {
                        let _ = writeln!(guard, "{}", line);
                    }
                    if is_tty {
                        writeln!(fmt, "{}", line)?;
                    }
                    Ok(())
                });
            }
        }
    }

    let _ = builder.try_init();
}
