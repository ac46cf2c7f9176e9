//! Port for durable key-value storage.
//!
//! The session store only needs `get/set/remove` by key. Keeping that surface
//! this small lets the persistence backend change (a directory of files, an
//! in-memory map, a browser's local storage) without touching session logic.

use super::define_port_error;

define_port_error! {
    /// Errors raised by key-value storage adapters.
    pub enum KeyValueStoreError {
        /// The key cannot be represented by this backend.
        InvalidKey { key: String } => "invalid storage key '{key}'",
        /// Reading the value failed.
        Read { key: String, message: String } => "failed to read '{key}': {message}",
        /// Writing or removing the value failed.
        Write { key: String, message: String } => "failed to write '{key}': {message}",
    }
}

/// Durable storage of string values under string keys.
///
/// Implementations must make `set` replace any previous value in one step and
/// must treat `remove` of an absent key as success.
#[cfg_attr(test, mockall::automock)]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, KeyValueStoreError>;

    /// Store `value` under `key`, overwriting any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), KeyValueStoreError>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), KeyValueStoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_name_the_key() {
        let err = KeyValueStoreError::write("taskforgeUser", "disk full");
        assert_eq!(err.to_string(), "failed to write 'taskforgeUser': disk full");
    }
}
