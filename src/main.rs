// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Registration Rate Limiter Service
//!
//! Per-IP admission control for account registration with a durable
//! audit trail:
//!
//! - 5 accepted registrations per IP per UTC day (default)
//! - Every accepted registration recorded in SQLite
//! - Daily retention sweep deleting records older than one month
//! - Optional external blocker notified on over-limit rejections
//!
//! ## Usage
//!
//! The host platform calls `POST /check` with the originating address
//! in its registration path and vetoes the registration when the
//! response says so.
//!
//! ## Configuration
//!
//! Configuration is loaded from environment variables:
//!
//! - `BIND_ADDR`: Server bind address (default: 0.0.0.0:8080)
//! - `DATABASE_PATH`: SQLite store path (default: registrations.db)
//! - `REGISTRATION_LIMIT`: Accepted registrations per IP per day (default: 5)
//! - `RETENTION_MONTHS`: Record retention in calendar months (default: 1)
//! - `SWEEP_INTERVAL_SECS`: Seconds between sweeps (default: 86400)
//! - `ENFORCEMENT_ENABLED`: Notify the external blocker on rejection (default: false)
//! - `ENFORCEMENT_ENDPOINT`: Blocker endpoint URL (default: unset)

use axum::{
    routing::{get, post},
    Router,
};
use chrono::Utc;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use registration_rate_limiter::{
    config::{Config, EnforcementConfig, LimitConfig},
    enforcement::{EnforcementHook, HttpEnforcement, NoopEnforcement},
    gate::RegistrationGate,
    handlers::{check, health, AppState},
    store::RecordStore,
    sweeper::RetentionSweeper,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Load configuration
    let config = load_config();
    info!(
        bind_addr = %config.bind_addr,
        database_path = %config.database_path,
        registration_limit = config.limits.registration_limit,
        retention_months = config.limits.retention_months,
        enforcement_enabled = config.enforcement.enabled,
        "Starting registration rate limiter"
    );

    // Open the record store and create the schema if needed
    let store = RecordStore::open(&config.database_path).await?;
    store.setup().await?;

    // Pick the enforcement capability at construction time
    let enforcement: Arc<dyn EnforcementHook> = match &config.enforcement.endpoint {
        Some(endpoint) if config.enforcement.enabled => {
            Arc::new(HttpEnforcement::new(endpoint.clone()))
        }
        _ => Arc::new(NoopEnforcement),
    };

    let gate = RegistrationGate::new(store.clone(), Arc::new(config.clone()), enforcement);

    let state = Arc::new(AppState {
        gate,
        config: config.clone(),
    });

    // Spawn the retention sweep task
    let sweeper = RetentionSweeper::new(store, config.limits.retention_months);
    let sweep_interval = config.limits.sweep_interval();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(sweep_interval);
        loop {
            interval.tick().await;
            if let Err(err) = sweeper.run(Utc::now()).await {
                warn!(error = %err, "retention sweep failed");
            }
        }
    });

    // Build router
    let app = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/check", post(check))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = config.bind_addr.parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Load configuration from environment variables.
fn load_config() -> Config {
    Config {
        bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
        database_path: std::env::var("DATABASE_PATH")
            .unwrap_or_else(|_| "registrations.db".to_string()),
        limits: LimitConfig {
            registration_limit: std::env::var("REGISTRATION_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
            retention_months: std::env::var("RETENTION_MONTHS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1),
            sweep_interval_secs: std::env::var("SWEEP_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(86400),
        },
        enforcement: EnforcementConfig {
            enabled: std::env::var("ENFORCEMENT_ENABLED")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            endpoint: std::env::var("ENFORCEMENT_ENDPOINT").ok(),
        },
    }
}
