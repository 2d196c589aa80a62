pub mod file_storage;
pub mod keys;
pub mod kv;
pub mod memory_storage;

pub use file_storage::FileStorage;
pub use kv::{KeyValueStorage, Result, StorageError};
pub use memory_storage::MemoryStorage;
