//! Browser media backed by `web-sys`

use super::{CookieStore, WebStorage};
use crate::error::{Result, UnistoreError};
use wasm_bindgen::{JsCast, JsValue};

fn js_error(area: &str, err: JsValue) -> UnistoreError {
    UnistoreError::medium(area, format!("{err:?}"))
}

/// `window.localStorage` or `window.sessionStorage`
pub struct BrowserStorage {
    storage: web_sys::Storage,
    area: &'static str,
}

impl BrowserStorage {
    /// The window's `localStorage`, if the host exposes one
    pub fn local() -> Option<Self> {
        let storage = web_sys::window()?.local_storage().ok().flatten()?;
        Some(Self {
            storage,
            area: "local",
        })
    }

    /// The window's `sessionStorage`, if the host exposes one
    pub fn session() -> Option<Self> {
        let storage = web_sys::window()?.session_storage().ok().flatten()?;
        Some(Self {
            storage,
            area: "session",
        })
    }
}

impl WebStorage for BrowserStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.storage
            .get_item(key)
            .map_err(|e| js_error(self.area, e))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.storage
            .set_item(key, value)
            .map_err(|e| js_error(self.area, e))
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.storage
            .remove_item(key)
            .map_err(|e| js_error(self.area, e))
    }

    fn clear(&self) -> Result<()> {
        self.storage.clear().map_err(|e| js_error(self.area, e))
    }

    fn keys(&self) -> Result<Vec<String>> {
        let length = self.storage.length().map_err(|e| js_error(self.area, e))?;
        let mut keys = Vec::with_capacity(length as usize);
        for index in 0..length {
            if let Some(key) = self.storage.key(index).map_err(|e| js_error(self.area, e))? {
                keys.push(key);
            }
        }
        Ok(keys)
    }

    fn len(&self) -> Result<usize> {
        let length = self.storage.length().map_err(|e| js_error(self.area, e))?;
        Ok(length as usize)
    }
}

/// `document.cookie` of the current HTML document
pub struct BrowserCookies {
    document: web_sys::HtmlDocument,
}

impl BrowserCookies {
    pub fn current() -> Option<Self> {
        let document = web_sys::window()?
            .document()?
            .dyn_into::<web_sys::HtmlDocument>()
            .ok()?;
        Some(Self { document })
    }
}

impl CookieStore for BrowserCookies {
    fn cookie_string(&self) -> Result<String> {
        self.document.cookie().map_err(|e| js_error("cookie", e))
    }

    fn set_cookie(&self, assignment: &str) -> Result<()> {
        self.document
            .set_cookie(assignment)
            .map_err(|e| js_error("cookie", e))
    }
}
