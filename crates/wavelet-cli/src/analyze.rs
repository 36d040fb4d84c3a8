//! `analyze` command: one-shot content analysis.

use wavelet_analyzer::{ContentAnalyzer, LexiconAnalyzer, OpenAiAnalyzer};
use wavelet_core::{AppConfig, Platform};

/// Analyze `text` with OpenAI when a key is configured, otherwise with the
/// offline lexicon. Unlike the monitor, a failed analysis is an error here.
///
/// # Errors
///
/// Returns an error if the analyzer cannot be built or the analysis fails.
pub(crate) async fn run_analyze(
    config: &AppConfig,
    text: &str,
    platform: Platform,
) -> anyhow::Result<()> {
    let analysis = match config.openai_api_key.as_deref() {
        Some(key) => {
            let analyzer = OpenAiAnalyzer::new(
                key,
                &config.openai_model,
                &config.openai_base_url,
                config.http_timeout_secs,
            )
            .map_err(|e| anyhow::anyhow!("failed to build OpenAI client: {e}"))?;
            analyzer.analyze(text, platform).await?
        }
        None => {
            tracing::info!("OPENAI_API_KEY not set; using lexicon analyzer");
            LexiconAnalyzer::new().analyze(text, platform).await?
        }
    };

    crate::print_json(&analysis)
}
