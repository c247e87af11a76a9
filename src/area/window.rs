//! Area over a map-like window medium

use super::{AreaKind, StorageArea};
use crate::error::{Result, UnistoreError};
use crate::key::Key;
use crate::medium::WebStorage;
use std::sync::Arc;
use tracing::debug;

/// `localStorage` or `sessionStorage`, possibly absent from the host
#[derive(Clone)]
pub struct WindowArea {
    kind: AreaKind,
    medium: Option<Arc<dyn WebStorage>>,
}

impl WindowArea {
    /// Durable area; `None` when the host has no `localStorage`
    pub fn local(medium: Option<Arc<dyn WebStorage>>) -> Self {
        Self {
            kind: AreaKind::Local,
            medium,
        }
    }

    /// Session area; `None` when the host has no `sessionStorage`
    pub fn session(medium: Option<Arc<dyn WebStorage>>) -> Self {
        Self {
            kind: AreaKind::Session,
            medium,
        }
    }

    fn medium(&self) -> Result<&dyn WebStorage> {
        self.medium
            .as_deref()
            .ok_or_else(|| UnistoreError::MediumUnavailable {
                area: self.kind.to_string(),
            })
    }
}

impl std::fmt::Debug for WindowArea {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowArea")
            .field("kind", &self.kind)
            .field("supported", &self.medium.is_some())
            .finish()
    }
}

impl StorageArea for WindowArea {
    fn kind(&self) -> AreaKind {
        self.kind
    }

    fn is_supported(&self) -> bool {
        self.medium.is_some()
    }

    fn read(&self, key: &Key) -> Result<Option<String>> {
        self.medium()?.get_item(key.as_str())
    }

    fn write(&self, key: &Key, raw: &str) -> Result<()> {
        debug!(area = %self.kind, key = %key, "write");
        self.medium()?.set_item(key.as_str(), raw)
    }

    fn remove(&self, key: &Key) -> Result<()> {
        debug!(area = %self.kind, key = %key, "remove");
        self.medium()?.remove_item(key.as_str())
    }

    fn clear(&self) -> Result<()> {
        debug!(area = %self.kind, "clear");
        self.medium()?.clear()
    }

    fn keys(&self) -> Result<Vec<Key>> {
        Ok(self
            .medium()?
            .keys()?
            .into_iter()
            .map(Key::from_stored)
            .collect())
    }
}
