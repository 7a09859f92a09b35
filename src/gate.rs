// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Registration gate: orchestrates settings, record store, and the
//! admission decision for each registration attempt.
//!
//! Two concurrent attempts for the same identifier can both read a
//! count just under the limit before either inserts, overshooting the
//! limit by one. That race is an accepted tolerance; strict enforcement
//! would need an atomic conditional insert at the store layer.

use crate::config::SettingsProvider;
use crate::enforcement::EnforcementHook;
use crate::limiter::{self, GateOutcome, RejectReason};
use crate::store::{RecordStore, StoreError};
use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Admission gate for registration attempts.
pub struct RegistrationGate {
    store: RecordStore,
    settings: Arc<dyn SettingsProvider>,
    enforcement: Arc<dyn EnforcementHook>,
}

impl RegistrationGate {
    /// Assemble a gate from its injected dependencies.
    pub fn new(
        store: RecordStore,
        settings: Arc<dyn SettingsProvider>,
        enforcement: Arc<dyn EnforcementHook>,
    ) -> Self {
        Self {
            store,
            settings,
            enforcement,
        }
    }

    /// Handle a registration attempt dated today in UTC.
    pub async fn handle_registration(&self, identifier: &str) -> Result<GateOutcome, StoreError> {
        self.handle_registration_on(identifier, Utc::now().date_naive())
            .await
    }

    /// Handle a registration attempt for an explicit event date.
    ///
    /// A store failure on either the count or the insert path is
    /// propagated: the gate fails closed, never reporting an attempt
    /// accepted that was not durably recorded and never defaulting to
    /// "under limit".
    pub async fn handle_registration_on(
        &self,
        identifier: &str,
        today: NaiveDate,
    ) -> Result<GateOutcome, StoreError> {
        let limit = self.settings.registration_limit();
        let count = self.store.count_matching(identifier, today).await?;

        if limiter::is_over_limit(count, limit) {
            info!(identifier, count, limit, "registration rejected");
            if self.settings.enforcement_enabled() {
                if let Err(err) = self.enforcement.block(identifier).await {
                    // Best-effort: the rejection stands regardless.
                    warn!(identifier, error = %err, "enforcement hook failed");
                }
            }
            return Ok(GateOutcome::Rejected {
                reason: RejectReason::DailyLimitReached,
            });
        }

        let recorded = self.store.insert(identifier, today).await?;
        debug!(identifier, %today, recorded, "registration recorded");
        Ok(GateOutcome::Accepted {
            recorded,
            remaining: limiter::remaining_after(count, limit),
        })
    }
}
