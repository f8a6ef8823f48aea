use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use snapdeck_core::{AppConfig, SectionLayout};

mod commands;

#[derive(Parser)]
#[command(name = "snapdeck")]
#[command(author, version, about = "Full-screen, snap-scrolling section decks for the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Use this config file instead of ~/.config/snapdeck/config.toml
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open a deck in the terminal
    Run {
        /// Deck file
        deck: PathBuf,
        /// Section to open, as `#id`, `id` or a URL with a fragment
        #[arg(short = 'f', long)]
        fragment: Option<String>,
        /// Section layout (defaults to the configured one)
        #[arg(short = 'l', long, value_enum)]
        layout: Option<LayoutArg>,
    },
    /// Print the section geometry of a deck
    List {
        /// Deck file
        deck: PathBuf,
        /// Viewport width in columns
        #[arg(long, default_value_t = 80)]
        width: u16,
        /// Viewport height in rows
        #[arg(long, default_value_t = 24)]
        height: u16,
        #[arg(short = 'l', long, value_enum)]
        layout: Option<LayoutArg>,
    },
    /// Feed a recorded input trace to a controller and print every decision
    Replay {
        /// Deck file
        deck: PathBuf,
        /// JSON trace: [{"at_ms": 0, "event": {"type": "wheel", "delta_y": 120}}, ...]
        trace: PathBuf,
        /// Section height used for the replay container
        #[arg(long, default_value_t = 100.0)]
        height: f64,
    },
    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,
    /// Write the default configuration file if none exists
    Init,
    /// Print the configuration file path
    Path,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LayoutArg {
    FullPage,
    Variable,
}

impl From<LayoutArg> for SectionLayout {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::FullPage => SectionLayout::FullPage,
            LayoutArg::Variable => SectionLayout::Variable,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config_path = cli.config.clone().unwrap_or_else(AppConfig::config_path);
    let config = Arc::new(AppConfig::load_from(&config_path)?);

    match cli.command {
        Commands::Run {
            deck,
            fragment,
            layout,
        } => {
            // The TUI owns the terminal, so logs go to a file
            init_file_logging(&config)?;
            let layout = layout.map(Into::into).unwrap_or(config.navigation.layout);
            commands::run::run(config, &deck, layout, fragment.as_deref()).await
        }
        Commands::List {
            deck,
            width,
            height,
            layout,
        } => {
            init_logging(&config);
            let layout = layout.map(Into::into).unwrap_or(config.navigation.layout);
            commands::list::run(&deck, width, height, layout)
        }
        Commands::Replay {
            deck,
            trace,
            height,
        } => {
            init_logging(&config);
            commands::replay::run(&config, &deck, &trace, height)
        }
        Commands::Config { action } => {
            init_logging(&config);
            match action {
                ConfigAction::Show => commands::config::show(&config),
                ConfigAction::Init => commands::config::init(&config_path),
                ConfigAction::Path => commands::config::path(&config_path),
            }
        }
    }
}

fn env_filter(config: &AppConfig) -> EnvFilter {
    EnvFilter::new(std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()))
}

fn init_logging(config: &AppConfig) {
    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn init_file_logging(config: &AppConfig) -> Result<()> {
    let log_path = config.log_path();
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file)),
        )
        .init();
    Ok(())
}
