// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Vitals-Tracker API Server
//!
//! Records daily health metrics to a remote store and a local mirror, with
//! optional advice from a generative-text service.

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vitals_tracker::{
    config::{Config, RemoteStoreKind},
    db::{FirestoreDb, MemoryStore, RemoteStore},
    mirror::{JsonFileSink, LocalMirror},
    repository::ActivityRepository,
    services::{ActivityTracker, Advisor, NoopObserver, OpenAiAdvisor},
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging()?;

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting Vitals-Tracker API");

    // Remote store
    let store: Arc<dyn RemoteStore> = match config.remote_store {
        RemoteStoreKind::Firestore => Arc::new(FirestoreDb::new(&config.gcp_project_id).await?),
        RemoteStoreKind::Memory => {
            tracing::warn!("Using in-process remote store; data is lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    // Local mirror
    tracing::info!(path = %config.mirror_path.display(), "Loading local mirror");
    let mirror = Arc::new(LocalMirror::load(Arc::new(JsonFileSink::new(
        config.mirror_path.clone(),
    )))?);

    let repository = ActivityRepository::new(store, mirror, config.history_days);
    repository.check_connection().await;

    let advisor = OpenAiAdvisor::from_config(&config).map(|a| Arc::new(a) as Arc<dyn Advisor>);
    if advisor.is_none() {
        tracing::info!("ADVISOR_API_KEY not set; advisor disabled");
    }

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        tracker: ActivityTracker::new(repository, advisor, Arc::new(NoopObserver)),
    });

    // Build router
    let app = vitals_tracker::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("vitals_tracker=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
