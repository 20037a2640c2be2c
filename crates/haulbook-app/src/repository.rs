//! Opening the store from configuration

use std::path::PathBuf;

use haulbook_domain::repository::ListStorage;
use haulbook_infra::persistence::FileListStorage;
use haulbook_store::{MemoryStorage, Store};
use haulbook_types::Result;
use tracing::{debug, warn};

use crate::config::Config;

pub type AppStore = Store<Box<dyn ListStorage>>;

/// Open the store in the configured data directory.
///
/// Never fails: if the directory can't be resolved or created the store
/// runs on in-memory storage for this session.
pub fn open_store(config: &Config) -> AppStore {
    let storage: Box<dyn ListStorage> = match config.data_dir().and_then(FileListStorage::open) {
        Ok(storage) => {
            debug!(dir = %storage.dir().display(), "using file storage");
            Box::new(storage)
        }
        Err(e) => {
            warn!(error = %e, "data directory unavailable; changes will not be saved");
            Box::new(MemoryStorage::new())
        }
    };

    let mut store = Store::load_all(storage);
    if config.seed_on_first_run {
        store.seed_if_empty();
    }
    store
}

/// Open file storage at a specific directory without seeding
pub fn open_store_at(dir: PathBuf) -> Result<Store<FileListStorage>> {
    Ok(Store::load_all(FileListStorage::open(dir)?))
}
