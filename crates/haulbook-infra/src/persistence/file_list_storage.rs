//! File-based list storage
//!
//! Each storage key is one pretty-printed JSON file in the data directory
//! (`jobs.json`, `receipts.json`, ...). Writes go to a sibling temp file
//! first and are renamed into place, so a crash mid-write never leaves a
//! half-written list behind.

use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use haulbook_domain::repository::{ListStorage, StorageKey};
use haulbook_types::{Error, Result};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct FileListStorage {
    dir: PathBuf,
}

impl FileListStorage {
    /// Open (and create if needed) a data directory
    pub fn open(dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding the list stored under `key`
    pub fn path_for(&self, key: StorageKey) -> PathBuf {
        self.dir.join(format!("{}.json", key.as_str()))
    }
}

impl ListStorage for FileListStorage {
    fn read(&self, key: StorageKey) -> std::result::Result<Option<String>, Error> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: StorageKey, payload: &str) -> std::result::Result<(), Error> {
        let path = self.path_for(key);
        let tmp_path = path.with_extension("json.tmp");

        let file = File::create(&tmp_path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(payload.as_bytes())?;
        writer.flush()?;
        drop(writer);

        fs::rename(&tmp_path, &path)?;
        debug!(path = %path.display(), bytes = payload.len(), "list written");
        Ok(())
    }
}
