mod api;
mod middleware;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use wavelet_analyzer::{ContentAnalyzer, LexiconAnalyzer, OpenAiAnalyzer};
use wavelet_core::AppConfig;
use wavelet_monitor::{ContentPipeline, MonitoringService, TrendBriefGenerator};
use wavelet_store::{MemoryStore, Store};
use wavelet_youtube::{ContentSource, DemoCatalog, YoutubeClient};

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = wavelet_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
    let analyzer = build_analyzer(&config)?;
    let source = build_source(&config)?;

    if config.seed_demo_data {
        match wavelet_monitor::seed_demo_data(store.as_ref(), analyzer.as_ref()).await {
            Ok(report) => tracing::info!(
                influencers = report.influencers,
                posts = report.posts,
                topics = report.topics,
                "demo data seeded"
            ),
            Err(e) => tracing::error!(error = %e, "failed to seed demo data"),
        }
    }

    let pipeline = Arc::new(ContentPipeline::new(
        Arc::clone(&store),
        Arc::clone(&source),
        Arc::clone(&analyzer),
        config.monitor_max_results,
    ));
    let monitor = Arc::new(MonitoringService::new(pipeline, config.monitor_interval_minutes).await?);
    let started = monitor.start_monitoring_all().await?;
    tracing::info!(
        influencers = started,
        interval_minutes = config.monitor_interval_minutes,
        "monitoring started"
    );

    let briefs = Arc::new(TrendBriefGenerator::new(Arc::clone(&store), analyzer));
    let app = build_app(AppState {
        store,
        source,
        monitor: Arc::clone(&monitor),
        briefs,
        monitor_interval_minutes: config.monitor_interval_minutes,
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = ?config.env, "wavelet-server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    monitor.shutdown().await?;
    tracing::info!("monitoring stopped");
    Ok(())
}

fn build_analyzer(config: &AppConfig) -> anyhow::Result<Arc<dyn ContentAnalyzer>> {
    match config.openai_api_key.as_deref() {
        Some(key) => {
            tracing::info!(model = %config.openai_model, "using OpenAI content analyzer");
            Ok(Arc::new(OpenAiAnalyzer::new(
                key,
                &config.openai_model,
                &config.openai_base_url,
                config.http_timeout_secs,
            )?))
        }
        None => {
            tracing::warn!("OPENAI_API_KEY not set; using offline lexicon analyzer");
            Ok(Arc::new(LexiconAnalyzer::new()))
        }
    }
}

fn build_source(config: &AppConfig) -> anyhow::Result<Arc<dyn ContentSource>> {
    match config.youtube_api_key.as_deref() {
        Some(key) => Ok(Arc::new(YoutubeClient::new(key, config.http_timeout_secs)?)),
        None => {
            tracing::warn!("YOUTUBE_API_KEY not set; serving the demo catalog");
            Ok(Arc::new(DemoCatalog::new()))
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
