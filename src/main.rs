use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

use cheevobot::infrastructure::adapters::ConsoleTransport;
use cheevobot::infrastructure::config::{Config, Format};
use cheevobot::infrastructure::storage::JsonStore;
use cheevobot::{plugins, BotError, SteamBot};

#[derive(Parser)]
#[command(name = "cheevobot")]
#[command(about = "A Steam chat bot with plugin commands and permission lists", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path (.json, .yaml or .yml)
    #[arg(short, long, default_value = "cheevobot.json")]
    config: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot on the console transport
    Run {
        /// Identity token used for lines typed on the console
        #[arg(long, default_value = "console")]
        identity: String,
    },
    /// Show version
    Version,
    /// Print the default config
    InitConfig {
        /// Print YAML instead of JSON
        #[arg(long)]
        yaml: bool,
    },
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { identity } => {
            if let Err(e) = run_bot(cli.config, identity) {
                tracing::error!("{}", e);
                std::process::exit(1);
            }
        }
        Commands::Version => {
            println!("cheevobot v{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::InitConfig { yaml } => {
            let format = if yaml { Format::Yaml } else { Format::Json };
            match format.render(&Config::defaults()) {
                Ok(rendered) => {
                    print!("{}", rendered);
                    println!("\nSave this to {} and adjust as needed.", cli.config.display());
                }
                Err(e) => {
                    tracing::error!("Failed to render config: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }
}

fn run_bot(config_path: PathBuf, identity: String) -> Result<(), Box<dyn std::error::Error>> {
    let registry = plugins::registry()?;

    // One event at a time, on one thread
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    rt.block_on(async {
        let (events_tx, events_rx) = mpsc::channel(64);
        let transport = Arc::new(ConsoleTransport::new(events_tx).with_identity(identity));
        let store = Arc::new(JsonStore::new(&config_path));
        let bot = SteamBot::new(transport, store, registry);

        tracing::info!("Starting cheevobot with {}", config_path.display());
        bot.start().await?;
        tracing::info!("logged in, root keyword is '{}'", bot.config().cmd);

        tokio::select! {
            _ = bot.run(events_rx) => {}
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted, logging off");
                bot.stop().await?;
            }
        }
        Ok::<(), BotError>(())
    })?;
    Ok(())
}
