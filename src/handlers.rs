// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTTP handlers for the registration rate limiter service.
//!
//! The service operates as an external admission check: the host
//! platform calls `/check` in its registration path and surfaces the
//! returned rejection message to the end user.

use crate::config::Config;
use crate::gate::RegistrationGate;
use crate::limiter::GateOutcome;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Message surfaced to the end user on the registration form.
pub const LIMIT_MESSAGE: &str = "You have reached the registration limit from your IP address.";

/// Shared application state.
pub struct AppState {
    pub gate: RegistrationGate,
    pub config: Config,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Registration admission check request.
#[derive(Debug, Deserialize)]
pub struct CheckRequest {
    /// Originating address of the registration attempt. Treated as an
    /// opaque identifier, not validated for format at this layer.
    pub ip: String,
}

/// Registration admission check response.
#[derive(Debug, Serialize)]
pub struct CheckResponse {
    pub allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining: Option<i64>,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "registration-rate-limiter",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Admission check for a registration attempt.
///
/// Called synchronously by the host platform before it completes a
/// registration; a `false` in `allowed` vetoes the registration.
pub async fn check(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CheckRequest>,
) -> impl IntoResponse {
    debug!(ip = %req.ip, "processing registration admission check");

    match state.gate.handle_registration(&req.ip).await {
        Ok(GateOutcome::Accepted { remaining, .. }) => {
            debug!(ip = %req.ip, remaining, "registration allowed");
            (
                StatusCode::OK,
                Json(CheckResponse {
                    allowed: true,
                    reason: None,
                    remaining: Some(remaining),
                }),
            )
        }
        Ok(GateOutcome::Rejected { reason }) => {
            info!(ip = %req.ip, reason = %reason, "registration vetoed");
            (
                StatusCode::OK, // 200 so the calling platform reads the body
                Json(CheckResponse {
                    allowed: false,
                    reason: Some(LIMIT_MESSAGE.to_string()),
                    remaining: None,
                }),
            )
        }
        Err(err) => {
            // Fail closed: a store failure must never look like "under
            // limit" to the platform.
            error!(ip = %req.ip, error = %err, "registration store failure during admission check");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(CheckResponse {
                    allowed: false,
                    reason: Some("registration service unavailable".to_string()),
                    remaining: None,
                }),
            )
        }
    }
}
