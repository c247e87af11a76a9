//! Storage areas
//!
//! A storage area is one medium seen through a uniform surface of raw
//! (already encoded) strings. Two variants exist:
//!
//! - [`WindowArea`] wraps a map-like medium (`localStorage` / `sessionStorage`)
//! - [`CookieArea`] wraps the single cookie string
//!
//! Key validation and value encoding happen one layer up, in
//! [`StorageManager`](crate::manager::StorageManager), so that logic is
//! written once for every area.

pub mod cookie;
pub mod window;

pub use cookie::CookieArea;
pub use window::WindowArea;

use crate::error::Result;
use crate::key::Key;
use std::fmt;

/// Which medium an area sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AreaKind {
    /// Durable across sessions
    Local,
    /// Cleared when the session ends
    Session,
    /// Cookie-backed durable fallback
    Cookie,
}

impl AreaKind {
    pub fn name(&self) -> &'static str {
        match self {
            AreaKind::Local => "local",
            AreaKind::Session => "session",
            AreaKind::Cookie => "cookie",
        }
    }
}

impl fmt::Display for AreaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Operational surface shared by every area variant
pub trait StorageArea {
    fn kind(&self) -> AreaKind;

    /// Whether the backing medium exists in the current host
    fn is_supported(&self) -> bool;

    /// Raw stored string for `key`, or `None` when absent
    fn read(&self, key: &Key) -> Result<Option<String>>;

    /// Store a raw string under `key`, replacing any previous value
    fn write(&self, key: &Key, raw: &str) -> Result<()>;

    fn contains(&self, key: &Key) -> Result<bool> {
        Ok(self.read(key)?.is_some())
    }

    /// Delete `key`; unknown keys are ignored
    fn remove(&self, key: &Key) -> Result<()>;

    /// Delete every key in the area
    fn clear(&self) -> Result<()>;

    /// Every key currently present
    fn keys(&self) -> Result<Vec<Key>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_kind_names() {
        assert_eq!(AreaKind::Local.name(), "local");
        assert_eq!(AreaKind::Session.to_string(), "session");
        assert_eq!(AreaKind::Cookie.to_string(), "cookie");
    }
}
