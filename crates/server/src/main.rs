//! Speech Gateway Server Entry Point

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use audiogen_config::{load_settings, Settings};
use audiogen_persistence::{FeedbackStore, InMemoryFeedbackStore, ScyllaConfig};
use audiogen_pipeline::{SarvamClient, SarvamConfig};
use audiogen_server::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; real deployments set the environment directly
    let dotenv = dotenvy::dotenv().ok();

    // Priority: plain deployment vars > AUDIOGEN__* > config/{env} > config/default > defaults
    let env = std::env::var("AUDIOGEN_ENV").ok();
    let config = match load_settings(env.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            // Tracing not yet initialized
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_tracing(&config);

    tracing::info!("Starting speech gateway v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        config_env = env.as_deref().unwrap_or("default"),
        dotenv = ?dotenv,
        "Configuration loaded"
    );

    let feedback = init_feedback_store(&config).await;

    let vendor = SarvamClient::new(SarvamConfig::from(&config.vendor))?;
    tracing::info!(base_url = %vendor.config().base_url, "Vendor client ready");

    let host = config.server.host.clone();
    let port = config.server.port;
    let state = AppState::with_vendor(config, Arc::new(vendor), feedback);
    if state.admin_api_key().is_none() {
        tracing::warn!("No admin key configured; feedback listing will reject every request");
    }

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind((host.as_str(), port)).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Connect the feedback store, or exit if it cannot be reached
async fn init_feedback_store(config: &Settings) -> Arc<dyn FeedbackStore> {
    if !config.persistence.enabled {
        tracing::warn!("Persistence disabled, feedback is kept in memory only");
        return Arc::new(InMemoryFeedbackStore::new());
    }

    let scylla_config = match ScyllaConfig::try_from(&config.persistence) {
        Ok(scylla_config) => scylla_config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid store configuration");
            std::process::exit(1);
        }
    };

    match audiogen_persistence::init(scylla_config).await {
        Ok(store) => {
            tracing::info!("Connected to the feedback store");
            Arc::new(store)
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to connect to the feedback store");
            std::process::exit(1);
        }
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}

fn init_tracing(config: &Settings) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = &config.observability.log_level;
        format!("audiogen={},tower_http=debug", level).into()
    });

    let subscriber = tracing_subscriber::registry().with(env_filter);
    let fmt_layer = if config.observability.log_json {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };
    subscriber.with(fmt_layer).init();
}
