//! Area over the cookie string
//!
//! Each key is one cookie. Values are percent-escaped on write and unescaped
//! on read. Keys are written verbatim, so a key containing `=` or `;` cannot
//! be read back; callers must avoid such keys.

use super::{AreaKind, StorageArea};
use crate::config::StorageConfig;
use crate::error::{Result, UnistoreError};
use crate::key::Key;
use crate::medium::cookie_jar::COOKIE_DATE_FORMAT;
use crate::medium::CookieStore;
use chrono::{Duration, Utc};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::sync::Arc;
use tracing::debug;

/// Characters left unescaped in cookie values
const COOKIE_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'@')
    .remove(b'*')
    .remove(b'_')
    .remove(b'+')
    .remove(b'-')
    .remove(b'.')
    .remove(b'/');

/// Cookie-backed storage area
#[derive(Clone)]
pub struct CookieArea {
    jar: Arc<dyn CookieStore>,
    lifetime: Duration,
    path: String,
}

impl CookieArea {
    pub fn new(jar: Arc<dyn CookieStore>, config: &StorageConfig) -> Self {
        Self {
            jar,
            lifetime: Duration::days(i64::from(config.cookie_lifetime_days)),
            path: config.cookie_path.clone(),
        }
    }

    /// Write one cookie. Non-persistent writes expire immediately, which is
    /// how a cookie is deleted.
    pub fn write_with(&self, key: &Key, raw: &str, persistent: bool) -> Result<()> {
        let expires_at = if persistent {
            Utc::now()
                .checked_add_signed(self.lifetime)
                .ok_or_else(|| UnistoreError::medium("cookie", "cookie expiry date out of range"))?
        } else {
            Utc::now() - Duration::days(1)
        };

        let assignment = format!(
            "{}={}; expires={}; path={}",
            key,
            escape(raw),
            expires_at.format(COOKIE_DATE_FORMAT),
            self.path
        );
        debug!(area = "cookie", key = %key, persistent, "write");
        self.jar.set_cookie(&assignment)
    }
}

impl std::fmt::Debug for CookieArea {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CookieArea")
            .field("lifetime_days", &self.lifetime.num_days())
            .field("path", &self.path)
            .finish()
    }
}

impl StorageArea for CookieArea {
    fn kind(&self) -> AreaKind {
        AreaKind::Cookie
    }

    fn is_supported(&self) -> bool {
        true
    }

    fn read(&self, key: &Key) -> Result<Option<String>> {
        let blob = self.jar.cookie_string()?;
        let prefix = format!("{key}=");

        Ok(blob
            .split(';')
            .map(str::trim_start)
            .find_map(|segment| segment.strip_prefix(prefix.as_str()))
            .map(unescape))
    }

    fn write(&self, key: &Key, raw: &str) -> Result<()> {
        self.write_with(key, raw, true)
    }

    fn remove(&self, key: &Key) -> Result<()> {
        self.write_with(key, "", false)
    }

    fn clear(&self) -> Result<()> {
        for key in self.keys()? {
            self.remove(&key)?;
        }
        Ok(())
    }

    fn keys(&self) -> Result<Vec<Key>> {
        let blob = self.jar.cookie_string()?;
        let mut keys: Vec<Key> = Vec::new();

        for segment in blob.split(';') {
            let Some((name, _)) = segment.split_once('=') else {
                continue;
            };
            let name = name.trim();
            if name.is_empty() || keys.iter().any(|k| k == name) {
                continue;
            }
            keys.push(Key::from_stored(name.to_string()));
        }

        Ok(keys)
    }
}

fn escape(raw: &str) -> String {
    utf8_percent_encode(raw, COOKIE_VALUE).to_string()
}

fn unescape(escaped: &str) -> String {
    percent_decode_str(escaped.trim_end())
        .decode_utf8_lossy()
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::KeyValidator;
    use crate::medium::MemoryCookieJar;

    fn key(name: &str) -> Key {
        KeyValidator::check(name).unwrap()
    }

    fn area_with_jar() -> (CookieArea, Arc<MemoryCookieJar>) {
        let jar = Arc::new(MemoryCookieJar::new());
        let area = CookieArea::new(jar.clone(), &StorageConfig::default());
        (area, jar)
    }

    #[test]
    fn test_escape_round_trip() {
        let raw = r#"{"name":"a b; c=d","emoji":"é"}"#;
        let escaped = escape(raw);
        assert!(!escaped.contains(';'));
        assert!(!escaped.contains('='));
        assert!(!escaped.contains(' '));
        assert_eq!(unescape(&escaped), raw);
        assert_eq!(escape("a-b_c.d/e@f*g+h"), "a-b_c.d/e@f*g+h");
    }

    #[test]
    fn test_cookie_area_write_read() {
        let (area, jar) = area_with_jar();
        area.write(&key("a"), "1").unwrap();
        assert_eq!(area.read(&key("a")).unwrap().as_deref(), Some("1"));
        assert_eq!(jar.cookie_string().unwrap(), "a=1");

        let records = jar.records();
        let expires = records[0].expires_at.unwrap();
        assert!(expires > Utc::now() + Duration::days(364));
    }

    #[test]
    fn test_cookie_area_finds_key_mid_blob() {
        let (area, jar) = area_with_jar();
        jar.set_cookie("first=x").unwrap();
        jar.set_cookie("target=hit%20me").unwrap();
        jar.set_cookie("last=z").unwrap();

        assert_eq!(area.read(&key("target")).unwrap().as_deref(), Some("hit me"));
        assert_eq!(area.read(&key("last")).unwrap().as_deref(), Some("z"));
        assert!(area.read(&key("targ")).unwrap().is_none());
    }

    #[test]
    fn test_cookie_area_remove_expires_cookie() {
        let (area, jar) = area_with_jar();
        area.write(&key("a"), "1").unwrap();
        area.write(&key("b"), "2").unwrap();

        area.remove(&key("a")).unwrap();
        assert!(!area.contains(&key("a")).unwrap());
        assert_eq!(jar.cookie_string().unwrap(), "b=2");

        // Removing an unknown key leaves the jar alone
        area.remove(&key("ghost")).unwrap();
        assert_eq!(jar.len(), 1);
    }

    #[test]
    fn test_cookie_area_keys_and_clear() {
        let (area, _jar) = area_with_jar();
        area.write(&key("a"), "1").unwrap();
        area.write(&key("b"), "2").unwrap();

        let keys: Vec<String> = area.keys().unwrap().into_iter().map(Key::into_string).collect();
        assert_eq!(keys, vec!["a", "b"]);

        area.clear().unwrap();
        assert!(area.keys().unwrap().is_empty());
    }

    #[test]
    fn test_cookie_area_uses_configured_path() {
        let jar = Arc::new(MemoryCookieJar::new());
        let config = StorageConfig {
            cookie_path: "/app".to_string(),
            cookie_lifetime_days: 7,
            ..StorageConfig::default()
        };
        let area = CookieArea::new(jar.clone(), &config);

        area.write(&key("a"), "1").unwrap();
        let records = jar.records();
        assert_eq!(records[0].path, "/app");
        assert!(records[0].expires_at.unwrap() < Utc::now() + Duration::days(8));
    }

    #[test]
    fn test_cookie_area_unrepresentable_expiry_is_an_error() {
        let jar = Arc::new(MemoryCookieJar::new());
        let config = StorageConfig {
            cookie_lifetime_days: u32::MAX,
            ..StorageConfig::default()
        };
        let area = CookieArea::new(jar.clone(), &config);

        let err = area.write(&key("a"), "1").unwrap_err();
        assert!(matches!(err, UnistoreError::MediumError { ref area, .. } if area == "cookie"));
        assert!(jar.is_empty());

        // Deleting does not depend on the lifetime
        area.remove(&key("a")).unwrap();
    }

    #[test]
    fn test_keys_skip_nameless_segments() {
        let (area, jar) = area_with_jar();
        jar.set_cookie("bare").unwrap();
        jar.set_cookie("named=1").unwrap();

        let keys: Vec<String> = area.keys().unwrap().into_iter().map(Key::into_string).collect();
        assert_eq!(keys, vec!["named"]);
    }
}
