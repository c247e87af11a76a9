//! Named storage managers
//!
//! The registry is constructed once at startup and handed to whatever needs
//! storage. It always holds a "local" (durable) and a "session" manager,
//! each wired to the other as its sibling for cross-area copies. When the
//! host has no `localStorage`, the durable manager can be backed by cookies
//! instead.

use crate::area::{CookieArea, StorageArea, WindowArea};
use crate::config::Config;
use crate::error::Result;
use crate::manager::StorageManager;
use crate::medium::{CookieStore, MemoryCookieJar, MemoryStorage, WebStorage};
use std::sync::Arc;
use tracing::{info, warn};

pub const LOCAL: &str = "local";
pub const SESSION: &str = "session";

/// The set of storage managers available to callers
#[derive(Debug)]
pub struct StorageRegistry {
    local: StorageManager,
    session: StorageManager,
}

/// Host media handed to the registry at construction
#[derive(Default)]
pub struct StorageRegistryBuilder {
    config: Config,
    local: Option<Arc<dyn WebStorage>>,
    session: Option<Arc<dyn WebStorage>>,
    cookies: Option<Arc<dyn CookieStore>>,
}

impl StorageRegistryBuilder {
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// The host's `localStorage`
    pub fn local(mut self, medium: Arc<dyn WebStorage>) -> Self {
        self.local = Some(medium);
        self
    }

    /// The host's `sessionStorage`
    pub fn session(mut self, medium: Arc<dyn WebStorage>) -> Self {
        self.session = Some(medium);
        self
    }

    /// The host's cookie string, used when `localStorage` is missing
    pub fn cookies(mut self, jar: Arc<dyn CookieStore>) -> Self {
        self.cookies = Some(jar);
        self
    }

    /// Validate the configuration and wire up the managers
    pub fn build(self) -> Result<StorageRegistry> {
        self.config.validate()?;

        let local_area: Arc<dyn StorageArea> = match (self.local, self.cookies) {
            (Some(medium), _) => Arc::new(WindowArea::local(Some(medium))),
            (None, Some(jar)) if self.config.storage.cookie_fallback => {
                info!("localStorage unavailable, falling back to cookie storage");
                Arc::new(CookieArea::new(jar, &self.config.storage))
            }
            (None, _) => {
                warn!("localStorage unavailable and no cookie fallback configured");
                Arc::new(WindowArea::local(None))
            }
        };

        if self.session.is_none() {
            warn!("sessionStorage unavailable");
        }
        let session_area: Arc<dyn StorageArea> = Arc::new(WindowArea::session(self.session));

        let local = StorageManager::new(LOCAL, Arc::clone(&local_area))
            .with_sibling(Arc::clone(&session_area));
        let session = StorageManager::new(SESSION, session_area).with_sibling(local_area);

        info!(
            "Storage registry ready (local: {}, session supported: {})",
            local.kind(),
            session.is_supported()
        );

        Ok(StorageRegistry { local, session })
    }
}

impl StorageRegistry {
    pub fn builder() -> StorageRegistryBuilder {
        StorageRegistryBuilder::default()
    }

    /// Registry over fresh in-memory media, for native hosts and tests
    pub fn in_memory(config: Config) -> Result<Self> {
        Self::builder()
            .config(config)
            .local(Arc::new(MemoryStorage::new()))
            .session(Arc::new(MemoryStorage::new()))
            .cookies(Arc::new(MemoryCookieJar::new()))
            .build()
    }

    /// Registry over the current browser window's media
    #[cfg(all(feature = "web", target_arch = "wasm32"))]
    pub fn browser(config: Config) -> Result<Self> {
        use crate::medium::{BrowserCookies, BrowserStorage};

        let mut builder = Self::builder().config(config);
        if let Some(local) = BrowserStorage::local() {
            builder = builder.local(Arc::new(local));
        }
        if let Some(session) = BrowserStorage::session() {
            builder = builder.session(Arc::new(session));
        }
        if let Some(cookies) = BrowserCookies::current() {
            builder = builder.cookies(Arc::new(cookies));
        }
        builder.build()
    }

    /// Durable manager
    pub fn local(&self) -> &StorageManager {
        &self.local
    }

    /// Session-scoped manager
    pub fn session(&self) -> &StorageManager {
        &self.session
    }

    /// Manager used when callers do not pick one (the durable one)
    pub fn default_manager(&self) -> &StorageManager {
        &self.local
    }

    /// Look a manager up by name
    pub fn get(&self, name: &str) -> Option<&StorageManager> {
        match name {
            LOCAL => Some(&self.local),
            SESSION => Some(&self.session),
            _ => None,
        }
    }

    pub fn names(&self) -> [&'static str; 2] {
        [LOCAL, SESSION]
    }
}
