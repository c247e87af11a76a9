//! Validated, codec-wrapped access to one storage area
//!
//! `StorageManager` is the surface callers use. Every keyed operation runs
//! the key through [`KeyValidator`] first, and values cross the area
//! boundary through [`ValueCodec`]. Cross-cutting operations (rename, copy to
//! the sibling area) are implemented once here for every area variant.

use crate::area::{AreaKind, StorageArea};
use crate::codec::{Storable, ValueCodec};
use crate::error::{Result, UnistoreError};
use crate::key::{Key, KeyInput, KeyValidator};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Result of copying keys into the sibling area
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied {
        copied: usize,
        /// Requested keys absent from the source
        skipped: usize,
    },
    /// The sibling medium is missing from the host; nothing was copied
    SiblingUnavailable,
}

/// Manager over one storage area
pub struct StorageManager {
    name: String,
    area: Arc<dyn StorageArea>,
    sibling: Option<Arc<dyn StorageArea>>,
}

impl StorageManager {
    /// Create a manager with no sibling area
    pub fn new(name: impl Into<String>, area: Arc<dyn StorageArea>) -> Self {
        Self {
            name: name.into(),
            area,
            sibling: None,
        }
    }

    /// Attach the area targeted by `copy_to_other_storage`
    pub fn with_sibling(mut self, sibling: Arc<dyn StorageArea>) -> Self {
        self.sibling = Some(sibling);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> AreaKind {
        self.area.kind()
    }

    /// Whether the underlying medium is available in this host
    pub fn is_supported(&self) -> bool {
        self.area.is_supported()
    }

    /// Store a value. Undefined and callable values are silently skipped.
    pub fn set(&self, key: impl Into<KeyInput>, value: impl Into<Storable>) -> Result<()> {
        let key = KeyValidator::check(key)?;
        let value = value.into();

        match ValueCodec::encode(&value) {
            Some(raw) => self.area.write(&key, &raw),
            None => {
                debug!(manager = %self.name, key = %key, "skipping unpersistable value");
                Ok(())
            }
        }
    }

    /// Store any serializable value
    pub fn set_serialized<T: Serialize + ?Sized>(
        &self,
        key: impl Into<KeyInput>,
        value: &T,
    ) -> Result<()> {
        self.set(key, Storable::from_serialize(value)?)
    }

    /// Read a value, or `None` when the key is absent
    pub fn get(&self, key: impl Into<KeyInput>) -> Result<Option<Value>> {
        let key = KeyValidator::check(key)?;
        Ok(self.area.read(&key)?.map(|raw| ValueCodec::decode(&raw)))
    }

    /// Read a value into a concrete type
    pub fn get_as<T: DeserializeOwned>(&self, key: impl Into<KeyInput>) -> Result<Option<T>> {
        let key = KeyValidator::check(key)?;
        self.area
            .read(&key)?
            .map(|raw| ValueCodec::decode_as(&raw))
            .transpose()
    }

    pub fn exists(&self, key: impl Into<KeyInput>) -> Result<bool> {
        let key = KeyValidator::check(key)?;
        self.area.contains(&key)
    }

    /// Remove one key; unknown keys are ignored
    pub fn remove(&self, key: impl Into<KeyInput>) -> Result<()> {
        let key = KeyValidator::check(key)?;
        self.area.remove(&key)
    }

    /// Remove several keys. Nothing is removed if any key is invalid.
    pub fn remove_many<I>(&self, keys: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: Into<KeyInput>,
    {
        for key in KeyValidator::check_all(keys)? {
            self.area.remove(&key)?;
        }
        Ok(())
    }

    /// Remove every key in the area
    pub fn clear(&self) -> Result<()> {
        self.area.clear()
    }

    /// Remove only the given keys, leaving the rest of the area untouched
    pub fn clear_keys<I>(&self, keys: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: Into<KeyInput>,
    {
        self.remove_many(keys)
    }

    /// Every key currently present, in host order
    pub fn keys(&self) -> Result<Vec<Key>> {
        self.area.keys()
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.area.keys()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Move the value under `key` to `new_key`.
    ///
    /// Renaming a key onto itself or renaming a key that does not exist does
    /// nothing. Fails with `KeyCollision` when `new_key` exists and
    /// `overwrite` is false.
    pub fn rename(
        &self,
        key: impl Into<KeyInput>,
        new_key: impl Into<KeyInput>,
        overwrite: bool,
    ) -> Result<()> {
        let key = KeyValidator::check(key)?;
        let new_key = KeyValidator::check(new_key)?;

        if key == new_key {
            return Ok(());
        }

        if !overwrite && self.area.contains(&new_key)? {
            return Err(UnistoreError::KeyCollision {
                key: new_key.into_string(),
            });
        }

        if let Some(raw) = self.area.read(&key)? {
            debug!(manager = %self.name, from = %key, to = %new_key, "rename");
            self.area.write(&new_key, &raw)?;
            self.area.remove(&key)?;
        }

        Ok(())
    }

    /// Copy the given keys into the sibling area, skipping absent ones.
    ///
    /// An empty list copies nothing; use
    /// [`copy_all_to_other_storage`](Self::copy_all_to_other_storage) to copy
    /// every key.
    pub fn copy_to_other_storage<I>(&self, keys: I) -> Result<CopyOutcome>
    where
        I: IntoIterator,
        I::Item: Into<KeyInput>,
    {
        let keys = KeyValidator::check_all(keys)?;
        let Some(sibling) = self.available_sibling() else {
            return Ok(CopyOutcome::SiblingUnavailable);
        };
        self.copy_into(sibling, keys)
    }

    /// Copy every key of this area into the sibling area
    pub fn copy_all_to_other_storage(&self) -> Result<CopyOutcome> {
        let Some(sibling) = self.available_sibling() else {
            return Ok(CopyOutcome::SiblingUnavailable);
        };
        let keys = self.area.keys()?;
        self.copy_into(sibling, keys)
    }

    fn available_sibling(&self) -> Option<&dyn StorageArea> {
        match self.sibling.as_deref() {
            Some(sibling) if sibling.is_supported() => Some(sibling),
            Some(sibling) => {
                warn!(
                    manager = %self.name,
                    sibling = %sibling.kind(),
                    "{} storage is not supported by this host; nothing copied",
                    sibling.kind()
                );
                None
            }
            None => {
                warn!(manager = %self.name, "no sibling storage configured; nothing copied");
                None
            }
        }
    }

    fn copy_into(&self, sibling: &dyn StorageArea, keys: Vec<Key>) -> Result<CopyOutcome> {
        let mut copied = 0;
        let mut skipped = 0;

        for key in keys {
            match self.area.read(&key)? {
                Some(raw) => {
                    sibling.write(&key, &raw)?;
                    copied += 1;
                }
                None => skipped += 1,
            }
        }

        debug!(
            manager = %self.name,
            sibling = %sibling.kind(),
            copied,
            skipped,
            "copied keys to sibling storage"
        );
        Ok(CopyOutcome::Copied { copied, skipped })
    }
}

impl std::fmt::Debug for StorageManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageManager")
            .field("name", &self.name)
            .field("kind", &self.area.kind())
            .field("supported", &self.area.is_supported())
            .field("sibling", &self.sibling.as_ref().map(|s| s.kind()))
            .finish()
    }
}
