//! Persistent key-value store abstraction.
//!
//! The travel-time cache persists through this seam; the surrounding
//! application decides what backs it (browser-style local storage, a
//! file per key, or memory). Implementations may fail on capacity
//! exhaustion; callers catch [`StoreError`] and degrade to an
//! in-memory cache rather than propagating.

use std::collections::HashMap;

use thiserror::Error;

/// Errors raised by [`KeyValueStore`] implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend is out of capacity.
    #[error("storage quota exceeded while writing key {key}")]
    QuotaExceeded {
        /// Key whose write failed.
        key: String,
    },
    /// The backend failed at the I/O level.
    #[error("storage backend I/O failure")]
    Io {
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Minimal string key-value store.
pub trait KeyValueStore {
    /// Read the value for `key`, if present.
    ///
    /// # Errors
    /// Returns [`StoreError`] when the backend cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    /// Returns [`StoreError::QuotaExceeded`] when the backend is full.
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove `key` if present.
    ///
    /// # Errors
    /// Returns [`StoreError`] when the backend cannot be written.
    fn remove_item(&mut self, key: &str) -> Result<(), StoreError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StoreError> {
        (**self).remove_item(key)
    }
}

/// In-memory [`KeyValueStore`].
///
/// An optional byte capacity emulates quota exhaustion so degradation
/// paths can be exercised in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: HashMap<String, String>,
    capacity_bytes: Option<usize>,
}

impl MemoryStore {
    /// Create an unbounded store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that rejects writes once the total stored bytes
    /// would exceed `capacity_bytes`.
    #[must_use]
    pub fn with_capacity_bytes(capacity_bytes: usize) -> Self {
        Self {
            items: HashMap::new(),
            capacity_bytes: Some(capacity_bytes),
        }
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the store holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn stored_bytes(&self) -> usize {
        self.items
            .iter()
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if let Some(capacity) = self.capacity_bytes {
            let existing = self.items.get(key).map_or(0, String::len);
            let projected = self.stored_bytes() - existing + key.len() + value.len();
            if projected > capacity {
                return Err(StoreError::QuotaExceeded {
                    key: key.to_owned(),
                });
            }
        }
        self.items.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StoreError> {
        self.items.remove(key);
        Ok(())
    }
}
