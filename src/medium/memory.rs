//! In-memory map medium using DashMap

use super::WebStorage;
use crate::error::Result;
use dashmap::DashMap;

/// In-memory stand-in for `localStorage` / `sessionStorage`
#[derive(Debug, Default)]
pub struct MemoryStorage {
    data: DashMap<String, String>,
}

impl MemoryStorage {
    /// Create an empty medium
    pub fn new() -> Self {
        Self {
            data: DashMap::new(),
        }
    }

    /// Create a medium pre-populated with entries
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let data = DashMap::new();
        for (key, value) in entries {
            data.insert(key.into(), value.into());
        }
        Self { data }
    }
}

impl WebStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.data.get(key).map(|entry| entry.value().clone()))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.data.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.data.remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.data.clear();
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.data.iter().map(|entry| entry.key().clone()).collect())
    }

    fn len(&self) -> Result<usize> {
        Ok(self.data.len())
    }
}
