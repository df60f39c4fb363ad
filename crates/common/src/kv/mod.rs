mod file;
mod memory;
mod provider;

pub use file::{FileKeyValueStore, FileKeyValueStoreError};
pub use memory::{MemoryKeyValueStore, MemoryKeyValueStoreError};
pub use provider::KeyValueStore;
