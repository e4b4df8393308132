//! In-process option store.

use crate::{ConfigStore, StoreError, StoreResult};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// A [`ConfigStore`] kept in memory. Contents are lost when dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    options: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with the given options.
    pub fn with_options<I, K, V>(options: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            options: Mutex::new(
                options
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Returns a copy of every stored option.
    pub fn snapshot(&self) -> StoreResult<HashMap<String, String>> {
        Ok(self.lock()?.clone())
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, HashMap<String, String>>> {
        self.options
            .lock()
            .map_err(|_| StoreError::Backend("option map lock poisoned".to_string()))
    }
}

impl ConfigStore for MemoryStore {
    fn get(&self, name: &str) -> StoreResult<Option<String>> {
        Ok(self.lock()?.get(name).cloned())
    }

    fn set(&self, name: &str, value: &str) -> StoreResult<()> {
        self.lock()?.insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, name: &str) -> StoreResult<()> {
        self.lock()?.remove(name);
        Ok(())
    }
}
