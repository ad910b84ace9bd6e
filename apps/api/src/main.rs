mod applications;
mod config;
mod db;
mod errors;
mod interview;
mod llm_client;
mod models;
mod repository;
mod routes;
mod sessions;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::interview::{InterviewCoach, InterviewModel};
use crate::llm_client::LlmClient;
use crate::repository::create_repository;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log,
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting tracker API v{}", env!("CARGO_PKG_VERSION"));

    // Storage connects lazily, so a missing or unreachable database only
    // affects the requests that need it.
    let repo = create_repository(&config);
    info!("Storage backend: {}", config.storage_backend.as_str());

    let coach = build_coach(&config);
    if coach.is_ai_enabled() {
        info!("AI coach enabled (model: {})", llm_client::MODEL);
    } else {
        info!("AI coach disabled, using local fallback");
    }

    let state = AppState {
        repo: repo.clone(),
        coach,
    };

    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    repo.close().await;
    info!("Shutdown complete");
    Ok(())
}

fn build_coach(config: &Config) -> InterviewCoach {
    let Some(api_key) = config.anthropic_api_key.clone() else {
        return InterviewCoach::offline();
    };

    match LlmClient::new(api_key, config.ai_timeout) {
        Ok(client) => {
            let model: Arc<dyn InterviewModel> = Arc::new(client);
            InterviewCoach::new(Some(model), config.ai_timeout)
        }
        Err(e) => {
            warn!("Failed to build LLM client, using local fallback: {e}");
            InterviewCoach::offline()
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
