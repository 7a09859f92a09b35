// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Retention sweep over the registration record store.
//!
//! Meant to be driven by a periodic scheduler; a missed run only delays
//! cleanup and a double run deletes nothing extra.

use crate::store::{RecordStore, StoreError};
use chrono::{DateTime, Months, Utc};
use tracing::{info, warn};

/// Default record retention in calendar months.
pub const DEFAULT_RETENTION_MONTHS: u32 = 1;

/// Deletes registration records older than the retention window.
pub struct RetentionSweeper {
    store: RecordStore,
    retention_months: u32,
}

impl RetentionSweeper {
    /// Sweeper with the given retention window in calendar months.
    pub fn new(store: RecordStore, retention_months: u32) -> Self {
        Self {
            store,
            retention_months,
        }
    }

    /// Delete all records strictly older than `now` minus the retention
    /// window, using calendar month subtraction rather than a fixed
    /// 30-day duration. Returns the number of records deleted.
    pub async fn run(&self, now: DateTime<Utc>) -> Result<u64, StoreError> {
        let Some(cutoff) = now
            .date_naive()
            .checked_sub_months(Months::new(self.retention_months))
        else {
            warn!(retention_months = self.retention_months, "retention cutoff out of calendar range, skipping sweep");
            return Ok(0);
        };

        let deleted = self.store.delete_older_than(cutoff).await?;
        if deleted > 0 {
            info!(%cutoff, deleted, "swept expired registration records");
        }
        Ok(deleted)
    }
}
