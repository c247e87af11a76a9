//! Host storage media
//!
//! This module models the storage primitives a host provides: a map-like
//! store (`localStorage` / `sessionStorage`) and the single-string cookie
//! blob. Storage areas are written against these traits so that the host is
//! injected at construction time.

pub mod cookie_jar;
pub mod memory;
#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub mod web;

pub use cookie_jar::MemoryCookieJar;
pub use memory::MemoryStorage;
#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub use web::{BrowserCookies, BrowserStorage};

use crate::error::Result;

/// Map-like key/value medium of plain strings
pub trait WebStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
    /// Removing an unknown key is not an error
    fn remove_item(&self, key: &str) -> Result<()>;
    fn clear(&self) -> Result<()>;
    /// All keys currently present, in host order
    fn keys(&self) -> Result<Vec<String>>;

    fn len(&self) -> Result<usize> {
        Ok(self.keys()?.len())
    }

    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

/// Cookie medium with `document.cookie` semantics
pub trait CookieStore {
    /// The `name=value; name2=value2` blob of every live cookie
    fn cookie_string(&self) -> Result<String>;

    /// Apply one cookie assignment such as `name=value; expires=...; path=/`
    fn set_cookie(&self, assignment: &str) -> Result<()>;
}
