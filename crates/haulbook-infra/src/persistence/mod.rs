//! Persistence implementations

mod file_list_storage;

pub use file_list_storage::FileListStorage;
