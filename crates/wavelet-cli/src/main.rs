mod analyze;
mod youtube;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use wavelet_core::Platform;

use crate::youtube::YoutubeCommands;

#[derive(Debug, Parser)]
#[command(name = "wavelet-cli")]
#[command(about = "wavelet influencer monitoring command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the configured content analyzer over a piece of text
    Analyze {
        /// Text to analyze
        text: String,
        /// Platform the text was published on
        #[arg(long, default_value = "youtube", value_parser = parse_platform)]
        platform: Platform,
    },
    /// Query the configured content source
    Youtube {
        #[command(subcommand)]
        command: YoutubeCommands,
    },
}

fn parse_platform(raw: &str) -> Result<Platform, String> {
    raw.parse().map_err(|e: wavelet_core::CoreError| e.to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("wavelet-cli ready; run with --help for commands");
        return Ok(());
    };

    let config = wavelet_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match command {
        Commands::Analyze { text, platform } => analyze::run_analyze(&config, &text, platform).await,
        Commands::Youtube { command } => youtube::run_youtube(&config, command).await,
    }
}

/// Pretty-print `value` as JSON on stdout.
pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
