// Framework bootstrap for the arena server runtime.

use crate::frameworks::config;
use crate::interface_adapters::net::{create_match_handler, spawn_match_serializer, ws_handler};
use crate::interface_adapters::state::AppState;
use crate::use_cases::{MatchRegistry, MatchSettings};

use axum::{
    Router,
    routing::{get, post},
};
use std::net::SocketAddr;
use std::{io::Result, sync::Arc, time::Duration};

fn init_runtime() {
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

/// Serves on `listener` with settings taken from the environment.
pub async fn run(listener: tokio::net::TcpListener) -> Result<()> {
    run_with(listener, config::match_settings()).await
}

pub async fn run_with(listener: tokio::net::TcpListener, settings: MatchSettings) -> Result<()> {
    let address = listener.local_addr()?;
    let state = build_state(settings).await?;

    let app = Router::new()
        .route("/ws", get(ws_handler))
        .route("/matches", post(create_match_handler))
        .with_state(state);

    tracing::info!(%address, "listening");

    axum::serve(listener, app).await.inspect_err(|e| {
        tracing::error!(error = %e, "server error");
    })
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    let address = SocketAddr::from(([127, 0, 0, 1], config::http_port()));

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .inspect_err(|e| {
            tracing::error!(%address, error = %e, "failed to bind");
        })?;

    run(listener).await
}

async fn build_state(settings: MatchSettings) -> Result<Arc<AppState>> {
    tracing::debug!(
        tick_ms = settings.tick_interval.as_millis(),
        start_delay_ms = settings.start_delay.as_millis(),
        "match settings"
    );

    // Owns the set of running match world tasks.
    let match_registry = Arc::new(MatchRegistry::new(settings));

    // The default match is open, pinned and has no time limit.
    let default_match = match_registry
        .create_match(
            config::DEFAULT_MATCH_ID.to_string(),
            Vec::new(),
            true,
            Duration::ZERO,
        )
        .await
        .map_err(|e| std::io::Error::other(format!("failed to create default match: {e:?}")))?;
    spawn_match_serializer(&default_match);
    match_registry.clone().spawn_match_end_watcher(
        default_match.match_id.clone(),
        default_match.server_state_tx.subscribe(),
    );

    Ok(Arc::new(AppState {
        match_registry,
        default_match_id: default_match.match_id.clone(),
    }))
}
