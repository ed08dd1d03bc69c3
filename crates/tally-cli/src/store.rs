//! File-backed dismissal store
//!
//! Persists the per-month dismissal lists as a small JSON map keyed by
//! `dismissed:<year>-<month>`. A missing file reads as empty.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use tally_core::{DismissalStore, RecoType, Result};

pub struct FileDismissalStore {
    path: PathBuf,
}

impl FileDismissalStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn read_all(&self) -> Result<HashMap<String, Vec<RecoType>>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let data = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&data)?)
    }
}

impl DismissalStore for FileDismissalStore {
    fn get(&self, key: &str) -> Result<Vec<RecoType>> {
        Ok(self.read_all()?.remove(key).unwrap_or_default())
    }

    fn set(&self, key: &str, kinds: &[RecoType]) -> Result<()> {
        let mut entries = self.read_all()?;
        if kinds.is_empty() {
            entries.remove(key);
        } else {
            entries.insert(key.to_string(), kinds.to_vec());
        }
        fs::write(&self.path, serde_json::to_string_pretty(&entries)?)?;
        Ok(())
    }
}
