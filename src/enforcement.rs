// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! External enforcement hook invoked on over-limit rejections.
//!
//! The hook is an injected capability: either a concrete blocker client
//! or [`NoopEnforcement`] when the host environment has none. Hook
//! failures are best-effort by contract, the gate logs and swallows
//! them without changing the rejection outcome.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// The enforcement endpoint failed or refused the block request.
#[derive(Debug, Error)]
pub enum HookError {
    /// Transport or HTTP-level failure reaching the blocker
    #[error("enforcement endpoint unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    /// The blocker capability is not available in this environment
    #[error("enforcement capability unavailable")]
    Unavailable,
}

/// External mechanism that can actively block an identifier.
#[async_trait]
pub trait EnforcementHook: Send + Sync {
    /// Ask the external blocker to block `identifier`.
    async fn block(&self, identifier: &str) -> Result<(), HookError>;
}

/// Hook used when no blocker capability is available. Always succeeds
/// without side effects.
pub struct NoopEnforcement;

#[async_trait]
impl EnforcementHook for NoopEnforcement {
    async fn block(&self, identifier: &str) -> Result<(), HookError> {
        debug!(identifier, "no enforcement capability configured, skipping block");
        Ok(())
    }
}

#[derive(Serialize)]
struct BlockRequest<'a> {
    ip: &'a str,
}

/// Hook that POSTs block requests to an HTTP blocker endpoint.
pub struct HttpEnforcement {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpEnforcement {
    /// Create a hook targeting `endpoint`.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl EnforcementHook for HttpEnforcement {
    async fn block(&self, identifier: &str) -> Result<(), HookError> {
        self.client
            .post(&self.endpoint)
            .json(&BlockRequest { ip: identifier })
            .send()
            .await?
            .error_for_status()?;
        debug!(identifier, endpoint = %self.endpoint, "block request delivered");
        Ok(())
    }
}
