//! Bounded append-then-trim logs.
//!
//! Logs in the snapshot grow by appending and are cut back to their most
//! recent entries. This is a plain sliding window, not an LRU.

use serde::{Deserialize, Serialize};

/// Drop the oldest entries of `log` until at most `cap` remain.
pub fn trim_to_recent<T>(log: &mut Vec<T>, cap: usize) {
    let excess = log.len().saturating_sub(cap);
    if excess > 0 {
        log.drain(..excess);
    }
}

/// Retention counts for every bounded log in the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Retention {
    /// Narrative events kept.
    pub events: usize,
    /// Ledger transactions kept.
    pub transactions: usize,
    /// Price samples kept.
    pub price_history: usize,
    /// Union grievances kept.
    pub grievances: usize,
    /// Completed community projects kept alongside active ones.
    pub completed_projects: usize,
    /// Crime records kept.
    pub crime_records: usize,
    /// Entertainment events kept.
    pub entertainment_events: usize,
    /// Seasonal events kept, active one included.
    pub seasonal_events: usize,
}

impl Default for Retention {
    fn default() -> Self {
        Self {
            events: 200,
            transactions: 500,
            price_history: 288,
            grievances: 100,
            completed_projects: 20,
            crime_records: 100,
            entertainment_events: 50,
            seasonal_events: 20,
        }
    }
}
