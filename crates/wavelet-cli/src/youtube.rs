//! `youtube` commands: direct queries against the content source.

use std::sync::Arc;

use clap::Subcommand;
use wavelet_core::AppConfig;
use wavelet_youtube::{ContentSource, DemoCatalog, YoutubeClient};

/// Sub-commands available under `youtube`.
#[derive(Debug, Subcommand)]
pub enum YoutubeCommands {
    /// Show channel details for a handle
    Channel {
        /// Channel handle, with or without the leading @
        handle: String,
    },
    /// List the latest uploads for a handle
    Videos {
        /// Channel handle, with or without the leading @
        handle: String,
        /// Maximum number of videos to list
        #[arg(long, default_value = "10")]
        limit: u32,
    },
    /// Search channels by keyword
    Search {
        /// Search text
        query: String,
    },
}

fn build_source(config: &AppConfig) -> anyhow::Result<Arc<dyn ContentSource>> {
    match config.youtube_api_key.as_deref() {
        Some(key) => {
            let client = YoutubeClient::new(key, config.http_timeout_secs)
                .map_err(|e| anyhow::anyhow!("failed to build YouTube client: {e}"))?;
            Ok(Arc::new(client))
        }
        None => {
            tracing::info!("YOUTUBE_API_KEY not set; querying the demo catalog");
            Ok(Arc::new(DemoCatalog::new()))
        }
    }
}

/// # Errors
///
/// Returns an error if the source cannot be built, the request fails, or
/// the channel does not exist.
pub(crate) async fn run_youtube(config: &AppConfig, command: YoutubeCommands) -> anyhow::Result<()> {
    let source = build_source(config)?;

    match command {
        YoutubeCommands::Channel { handle } => {
            let channel = source
                .channel_info(&handle)
                .await?
                .ok_or_else(|| anyhow::anyhow!("channel not found: {handle}"))?;
            crate::print_json(&channel)
        }
        YoutubeCommands::Videos { handle, limit } => {
            let videos = source.latest_videos(&handle, limit).await?;
            if videos.is_empty() {
                tracing::warn!(handle = %handle, "no videos found");
            }
            crate::print_json(&videos)
        }
        YoutubeCommands::Search { query } => {
            let channels = source.search_channels(&query).await?;
            crate::print_json(&channels)
        }
    }
}
