//! Per-month dismissal store port
//!
//! Users can wave off a recommendation for the rest of the month. The
//! engine never reads or writes this state; the presentation layer
//! filters the builder's output against it through this port.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{Datelike, NaiveDate};

use crate::allocation::RecoType;
use crate::error::Result;
use crate::recommend::Recommendation;

/// Key-value contract for the dismissal state
pub trait DismissalStore {
    fn get(&self, key: &str) -> Result<Vec<RecoType>>;
    fn set(&self, key: &str, kinds: &[RecoType]) -> Result<()>;
}

/// Storage key for a month's dismissals: `dismissed:<year>-<month>`
pub fn dismissal_key(date: NaiveDate) -> String {
    format!("dismissed:{}-{:02}", date.year(), date.month())
}

/// Drop recommendations the user dismissed this month
pub fn filter_dismissed(
    recommendations: Vec<Recommendation>,
    dismissed: &[RecoType],
) -> Vec<Recommendation> {
    recommendations
        .into_iter()
        .filter(|r| !dismissed.contains(&r.kind))
        .collect()
}

/// In-memory store for tests and previews
#[derive(Debug, Default)]
pub struct MemoryDismissalStore {
    entries: Mutex<HashMap<String, Vec<RecoType>>>,
}

impl MemoryDismissalStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DismissalStore for MemoryDismissalStore {
    fn get(&self, key: &str) -> Result<Vec<RecoType>> {
        let entries = self.entries.lock().expect("dismissal store poisoned");
        Ok(entries.get(key).cloned().unwrap_or_default())
    }

    fn set(&self, key: &str, kinds: &[RecoType]) -> Result<()> {
        let mut entries = self.entries.lock().expect("dismissal store poisoned");
        entries.insert(key.to_string(), kinds.to_vec());
        Ok(())
    }
}
