//! Storage seam for the persistent store
//!
//! Each record list lives under its own key as a JSON array. Backends only
//! move opaque payloads; parsing and normalization happen in the store.

use haulbook_types::Error;

/// Storage key of one persisted list
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StorageKey {
    Jobs,
    Receipts,
    Drivers,
    Trucks,
    Dispatch,
}

impl StorageKey {
    pub const ALL: [StorageKey; 5] = [
        StorageKey::Jobs,
        StorageKey::Receipts,
        StorageKey::Drivers,
        StorageKey::Trucks,
        StorageKey::Dispatch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKey::Jobs => "jobs",
            StorageKey::Receipts => "receipts",
            StorageKey::Drivers => "drivers",
            StorageKey::Trucks => "trucks",
            StorageKey::Dispatch => "dispatch",
        }
    }
}

impl std::fmt::Display for StorageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Durable home of the persisted lists
pub trait ListStorage {
    /// Raw payload stored under `key`, `None` if nothing was ever written
    fn read(&self, key: StorageKey) -> Result<Option<String>, Error>;

    /// Replace the payload under `key`
    fn write(&self, key: StorageKey, payload: &str) -> Result<(), Error>;
}

impl<S: ListStorage + ?Sized> ListStorage for &S {
    fn read(&self, key: StorageKey) -> Result<Option<String>, Error> {
        (**self).read(key)
    }

    fn write(&self, key: StorageKey, payload: &str) -> Result<(), Error> {
        (**self).write(key, payload)
    }
}

impl<S: ListStorage + ?Sized> ListStorage for Box<S> {
    fn read(&self, key: StorageKey) -> Result<Option<String>, Error> {
        (**self).read(key)
    }

    fn write(&self, key: StorageKey, payload: &str) -> Result<(), Error> {
        (**self).write(key, payload)
    }
}
