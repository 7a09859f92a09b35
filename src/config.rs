// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the registration rate limiter.
//!
//! Every value has a documented default, and a missing or partial
//! configuration falls back to those defaults rather than failing.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the registration rate limiter service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address (default: 0.0.0.0:8080)
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Path to the SQLite registration record store
    /// (default: registrations.db)
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Admission limit configuration
    #[serde(default)]
    pub limits: LimitConfig,

    /// External enforcement hook configuration
    #[serde(default)]
    pub enforcement: EnforcementConfig,
}

/// Admission limit and retention configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitConfig {
    /// Maximum accepted registrations per identifier per UTC calendar day
    /// (default: 5). Zero rejects every attempt; negative values are
    /// treated as zero.
    #[serde(default = "default_registration_limit")]
    pub registration_limit: i64,

    /// Calendar months of record retention (default: 1)
    #[serde(default = "default_retention_months")]
    pub retention_months: u32,

    /// Seconds between retention sweeps (default: 86400, once a day)
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

/// External enforcement hook configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnforcementConfig {
    /// Notify the external blocker on over-limit rejections
    /// (default: false)
    #[serde(default)]
    pub enabled: bool,

    /// Blocker endpoint URL; when unset the hook is a no-op even if
    /// enabled
    #[serde(default)]
    pub endpoint: Option<String>,
}

// Default value functions
fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_database_path() -> String {
    "registrations.db".to_string()
}

fn default_registration_limit() -> i64 {
    5
}

fn default_retention_months() -> u32 {
    1
}

fn default_sweep_interval_secs() -> u64 {
    86400
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            database_path: default_database_path(),
            limits: LimitConfig::default(),
            enforcement: EnforcementConfig::default(),
        }
    }
}

impl Default for LimitConfig {
    fn default() -> Self {
        Self {
            registration_limit: default_registration_limit(),
            retention_months: default_retention_months(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

impl Default for EnforcementConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: None,
        }
    }
}

impl LimitConfig {
    /// Get the sweep interval duration
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

/// Read-only view of the settings the gate consults on each attempt.
///
/// The gate is constructed against this trait so the settings source is
/// injected rather than read from ambient global state.
pub trait SettingsProvider: Send + Sync {
    /// Current daily registration limit.
    fn registration_limit(&self) -> i64;

    /// Whether the external enforcement hook should be invoked on
    /// rejection.
    fn enforcement_enabled(&self) -> bool;
}

impl SettingsProvider for Config {
    fn registration_limit(&self) -> i64 {
        self.limits.registration_limit
    }

    fn enforcement_enabled(&self) -> bool {
        self.enforcement.enabled
    }
}
