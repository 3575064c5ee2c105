//! Durable key-value persistence
//!
//! The portal persists exactly two values: the signed-in session and the
//! cart's lines. Both go through [`KeyValueStore`], so the browser's
//! `localStorage` and the in-memory store used in tests are interchangeable.

use std::sync::{Arc, PoisonError, RwLock};

use rustc_hash::FxHashMap;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

/// Key holding the serialized session.
pub const SESSION_KEY: &str = "pedido-listo.session";

/// Key holding the serialized cart lines.
pub const CART_KEY: &str = "pedido-listo.cart";

/// Errors raised by a [`KeyValueStore`].
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing store refused the operation (quota, privacy mode, poisoned lock).
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// A stored value could not be encoded or decoded.
    #[error("stored value for {key} is invalid")]
    Serialization {
        /// Key being read or written.
        key: String,
        /// Underlying serde error.
        #[source]
        source: serde_json::Error,
    },
}

/// String values keyed by string.
pub trait KeyValueStore: Send + Sync {
    /// Value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] when the store can't be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] when the store can't be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Deletes `key`. Missing keys are not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] when the store can't be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// Reads and decodes the JSON value under `key`.
///
/// # Errors
///
/// Propagates store failures and returns [`StorageError::Serialization`] for
/// values that don't decode as `T`.
pub fn load_json<T, S>(store: &S, key: &str) -> Result<Option<T>, StorageError>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };

    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| StorageError::Serialization {
            key: key.to_string(),
            source,
        })
}

/// Encodes `value` as JSON and stores it under `key`.
///
/// # Errors
///
/// Propagates store failures and encoding errors.
pub fn save_json<T, S>(store: &S, key: &str, value: &T) -> Result<(), StorageError>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let raw = serde_json::to_string(value).map_err(|source| StorageError::Serialization {
        key: key.to_string(),
        source,
    })?;

    store.set(key, &raw)
}

/// Shared in-memory store. Clones see the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<FxHashMap<String, String>>>,
}

impl MemoryStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries
            .read()
            .map(|entries| entries.is_empty())
            .unwrap_or(true)
    }
}

fn poisoned<T>(_: PoisonError<T>) -> StorageError {
    StorageError::Unavailable("memory store lock poisoned".to_string())
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.read().map_err(poisoned)?;

        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write().map_err(poisoned)?;

        entries.insert(key.to_string(), value.to_string());

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write().map_err(poisoned)?;

        entries.remove(key);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use testresult::TestResult;

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        count: u32,
    }

    #[test]
    fn clones_share_entries() -> TestResult {
        let store = MemoryStore::new();
        let other = store.clone();

        store.set("k", "v")?;

        assert_eq!(other.get("k")?, Some("v".to_string()));

        other.remove("k")?;

        assert!(store.is_empty());

        Ok(())
    }

    #[test]
    fn json_helpers_round_trip_values() -> TestResult {
        let store = MemoryStore::new();
        let sample = Sample {
            name: "ceviche".to_string(),
            count: 2,
        };

        save_json(&store, CART_KEY, &sample)?;

        assert_eq!(load_json::<Sample, _>(&store, CART_KEY)?, Some(sample));
        assert_eq!(load_json::<Sample, _>(&store, SESSION_KEY)?, None);

        Ok(())
    }

    #[test]
    fn undecodable_values_report_their_key() -> TestResult {
        let store = MemoryStore::new();

        store.set(CART_KEY, "{not json")?;

        let result = load_json::<Sample, _>(&store, CART_KEY);

        assert!(
            matches!(result, Err(StorageError::Serialization { ref key, .. }) if key == CART_KEY),
            "unexpected result: {result:?}"
        );

        Ok(())
    }
}
