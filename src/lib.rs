// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Registration Rate Limiter
//!
//! This crate provides per-IP admission control for account registration,
//! backed by a durable audit trail:
//!
//! - Per-identifier daily registration limit (5/day default)
//! - Durable record of every accepted registration (SQLite)
//! - Scheduled retention sweep (records older than one month)
//! - Optional external enforcement hook invoked on over-limit rejection

pub mod config;
pub mod enforcement;
pub mod gate;
pub mod handlers;
pub mod limiter;
pub mod store;
pub mod sweeper;

pub use config::{Config, SettingsProvider};
pub use enforcement::{EnforcementHook, HookError, HttpEnforcement, NoopEnforcement};
pub use gate::RegistrationGate;
pub use limiter::{GateOutcome, RejectReason};
pub use store::{RecordId, RecordStore, StoreError};
pub use sweeper::RetentionSweeper;
