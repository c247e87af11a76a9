//! unistore - unified key-value storage over local, session, and cookie media
//!
//! One validated, JSON-aware interface over the key/value media a browser
//! host provides: `localStorage`, `sessionStorage`, and the cookie string.
//! The host media are injected, so the same managers run over in-memory
//! media natively and over `web-sys` in the browser (`web` feature).
//!
//! ```
//! use unistore::{Config, StorageRegistry};
//! use serde_json::json;
//!
//! let registry = StorageRegistry::in_memory(Config::default())?;
//! let local = registry.local();
//!
//! local.set("profile", json!({"name": "ada"}))?;
//! local.rename("profile", "user", false)?;
//! assert_eq!(local.get("user")?, Some(json!({"name": "ada"})));
//! # Ok::<(), unistore::UnistoreError>(())
//! ```

// Core modules
pub mod config;
pub mod error;
pub mod logging;

// Feature modules
pub mod area;
pub mod codec;
pub mod key;
pub mod manager;
pub mod medium;
pub mod registry;

// Public API exports
pub use config::{Config, LogFormat, LoggingConfig, StorageConfig};
pub use error::{Result, UnistoreError};

// Re-export commonly used types
pub use area::{AreaKind, CookieArea, StorageArea, WindowArea};
pub use codec::{Storable, ValueCodec};
pub use key::{Key, KeyInput, KeyValidator};
pub use manager::{CopyOutcome, StorageManager};
pub use medium::{CookieStore, MemoryCookieJar, MemoryStorage, WebStorage};
pub use registry::{StorageRegistry, StorageRegistryBuilder};
