//! # Quillpress API Server
//!
//! REST backend for Quillpress: accounts, articles with categories and
//! tags, and an AI writing assistant.
//!
//! ## Startup
//!
//! 1. Load configuration from the environment (and `.env`)
//! 2. Connect the PostgreSQL pool and apply pending migrations
//! 3. Build the AI client when `AI_API_KEY` is set
//! 4. Serve until Ctrl-C or SIGTERM, then drain and close the pool
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p quillpress-api
//! ```

use anyhow::Context;
use quillpress_api::{
    app::{build_router, AppState},
    config::Config,
};
use quillpress_shared::{
    ai::{openai::OpenAiClient, AiAssistant},
    db::{migrations::run_migrations, pool},
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "quillpress_api=debug,quillpress_shared=info,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Quillpress API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let db = pool::create_pool(pool::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await
    .context("failed to connect to the database")?;

    run_migrations(&db)
        .await
        .context("failed to apply database migrations")?;

    let ai = match config.ai.clone() {
        Some(ai_config) => {
            let client = OpenAiClient::new(ai_config)?;
            tracing::info!(endpoint = client.endpoint(), "AI assistant enabled");
            Some(AiAssistant::new(Arc::new(client)))
        }
        None => {
            tracing::warn!("AI_API_KEY not set; AI endpoints will return errors");
            None
        }
    };

    let address = config.bind_address();
    let mut state = AppState::new(db.clone(), config);
    if let Some(ai) = ai {
        state = state.with_ai(ai);
    }

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {}", address))?;
    tracing::info!("Server listening on http://{}", address);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool::close_pool(db).await;
    tracing::info!("Shutdown complete");

    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on Unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
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

    tracing::info!("Shutdown signal received, draining connections...");
}
