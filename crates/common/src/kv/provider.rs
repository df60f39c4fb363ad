use std::fmt::Debug;

// NOTE: this is deliberately sync. Credential mutations persist
//  before returning, and every backend we have is a local one.

/// Durable key-value storage for small serialized documents
pub trait KeyValueStore: Send + Sync + Debug {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read the value stored under `key`
    ///
    /// # Returns
    /// * `Ok(Some(value))` - The stored value
    /// * `Ok(None)` - Nothing has been stored under `key`
    /// * `Err(Self::Error)` - The backend could not be read
    fn get(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Overwrite the value stored under `key` wholesale
    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error>;
}
