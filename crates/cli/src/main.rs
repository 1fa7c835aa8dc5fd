//! MINA CLI — the main entry point.
//!
//! Commands:
//! - `chat`    — Interactive terminal chat or single-message mode
//! - `serve`   — Start the web chat gateway
//! - `onboard` — Write the starter configuration
//! - `doctor`  — Diagnose the local setup

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "mina",
    about = "MINA — Il Tuo Assistente Personale",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with MINA in the terminal
    Chat {
        /// Send a single message instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,

        /// Start with this personality (Amichevole, Professionale, ...)
        #[arg(short, long)]
        personality: Option<String>,

        /// Sampling temperature (0.1 = precise, 2.0 = creative)
        #[arg(short, long)]
        temperature: Option<f32>,
    },

    /// Start the web chat gateway
    Serve {
        /// Override the listen host
        #[arg(long)]
        host: Option<String>,

        /// Override the listen port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Write the starter configuration to ~/.mina
    Onboard {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Diagnose the local setup
    Doctor,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Chat {
            message,
            personality,
            temperature,
        } => commands::chat::run(message, personality, temperature).await?,
        Commands::Serve { host, port } => commands::serve::run(host, port).await?,
        Commands::Onboard { force } => commands::onboard::run(force).await?,
        Commands::Doctor => commands::doctor::run().await?,
    }

    Ok(())
}
