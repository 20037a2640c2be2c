//! In-memory storage backend
//!
//! Used by tests and as the fallback when no durable location is available.
//! Nothing written here outlives the process.

use std::cell::RefCell;
use std::collections::HashMap;

use haulbook_domain::repository::{ListStorage, StorageKey};
use haulbook_types::Error;

#[derive(Debug, Default)]
pub struct MemoryStorage {
    lists: RefCell<HashMap<StorageKey, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-load a raw payload, e.g. legacy or corrupt data in tests
    pub fn with_payload(self, key: StorageKey, payload: impl Into<String>) -> Self {
        self.lists.borrow_mut().insert(key, payload.into());
        self
    }

    /// Raw payload currently stored under `key`
    pub fn payload(&self, key: StorageKey) -> Option<String> {
        self.lists.borrow().get(&key).cloned()
    }
}

impl ListStorage for MemoryStorage {
    fn read(&self, key: StorageKey) -> Result<Option<String>, Error> {
        Ok(self.payload(key))
    }

    fn write(&self, key: StorageKey, payload: &str) -> Result<(), Error> {
        self.lists.borrow_mut().insert(key, payload.to_string());
        Ok(())
    }
}
