//! High score persistence
//!
//! One integer under a fixed LocalStorage key. Missing or unreadable values
//! read as 0; a failed write is logged and otherwise ignored.

use std::cell::RefCell;

use crate::platform::storage;
use crate::{Error, Result};

/// LocalStorage key for the high score
pub const HIGH_SCORE_KEY: &str = "lobshot_high_score";

/// Where the high score lives
pub trait ScoreStore {
    fn load(&self) -> Result<Option<String>>;
    fn save(&self, value: &str) -> Result<()>;
}

/// Browser LocalStorage
#[derive(Debug, Clone, Default)]
pub struct LocalStorageStore;

impl ScoreStore for LocalStorageStore {
    fn load(&self) -> Result<Option<String>> {
        storage::get_item(HIGH_SCORE_KEY)
    }

    fn save(&self, value: &str) -> Result<()> {
        storage::set_item(HIGH_SCORE_KEY, value)
    }
}

/// In-memory store for native runs and tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    value: RefCell<Option<String>>,
}

impl MemoryStore {
    pub fn with_value(value: &str) -> Self {
        Self {
            value: RefCell::new(Some(value.to_owned())),
        }
    }
}

impl ScoreStore for MemoryStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.value.borrow().clone())
    }

    fn save(&self, value: &str) -> Result<()> {
        *self.value.borrow_mut() = Some(value.to_owned());
        Ok(())
    }
}

pub fn parse_high_score(raw: &str) -> Result<u32> {
    raw.trim()
        .parse()
        .map_err(|e| Error::PersistenceUnavailable(format!("bad high score {raw:?}: {e}")))
}

/// Stored high score, 0 when absent or unreadable
pub fn load_high_score(store: &impl ScoreStore) -> u32 {
    match store.load().and_then(|raw| raw.as_deref().map(parse_high_score).transpose()) {
        Ok(Some(high)) => {
            log::info!("Loaded high score {high}");
            high
        }
        Ok(None) => 0,
        Err(e) => {
            log::warn!("{e}; high score starts at 0");
            0
        }
    }
}

pub fn save_high_score(store: &impl ScoreStore, high: u32) {
    if let Err(e) = store.save(&high.to_string()) {
        log::warn!("{e}; high score not saved");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_value_is_zero() {
        assert_eq!(load_high_score(&MemoryStore::default()), 0);
    }

    #[test]
    fn test_garbage_value_is_zero() {
        assert_eq!(load_high_score(&MemoryStore::with_value("lots")), 0);
        assert_eq!(load_high_score(&MemoryStore::with_value("-3")), 0);
    }

    #[test]
    fn test_save_then_load() {
        let store = MemoryStore::default();
        save_high_score(&store, 42);
        assert_eq!(store.load().unwrap().as_deref(), Some("42"));
        assert_eq!(load_high_score(&store), 42);
    }

    #[test]
    fn test_parse_trims() {
        assert_eq!(parse_high_score(" 17\n"), Ok(17));
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_local_storage_missing_on_native() {
        let store = LocalStorageStore;
        assert_eq!(load_high_score(&store), 0);
        save_high_score(&store, 5);
    }
}
