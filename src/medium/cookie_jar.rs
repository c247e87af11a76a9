//! In-memory cookie jar with browser assignment semantics

use super::CookieStore;
use crate::error::Result;
use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use tracing::trace;

/// Format used for the `expires` cookie attribute
pub const COOKIE_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// One cookie held by the jar
#[derive(Debug, Clone, PartialEq)]
pub struct CookieRecord {
    pub name: String,
    pub value: String,
    pub path: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl CookieRecord {
    /// Check if the cookie has expired
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|expires| expires <= Utc::now())
    }

    fn render(&self) -> String {
        if self.name.is_empty() {
            self.value.clone()
        } else {
            format!("{}={}", self.name, self.value)
        }
    }
}

/// In-memory stand-in for `document.cookie`.
///
/// Assignments replace any cookie with the same name and path, an expiry in
/// the past deletes, and expired cookies are never reported.
#[derive(Debug, Default)]
pub struct MemoryCookieJar {
    cookies: Mutex<Vec<CookieRecord>>,
}

impl MemoryCookieJar {
    pub fn new() -> Self {
        Self {
            cookies: Mutex::new(Vec::new()),
        }
    }

    /// Number of live cookies
    pub fn len(&self) -> usize {
        self.cookies.lock().iter().filter(|c| !c.is_expired()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the live cookies, in insertion order
    pub fn records(&self) -> Vec<CookieRecord> {
        self.cookies
            .lock()
            .iter()
            .filter(|c| !c.is_expired())
            .cloned()
            .collect()
    }

    /// Drop expired cookies, returning how many were removed
    pub fn cleanup_expired(&self) -> usize {
        let mut cookies = self.cookies.lock();
        let before = cookies.len();
        cookies.retain(|c| !c.is_expired());
        before - cookies.len()
    }
}

impl CookieStore for MemoryCookieJar {
    fn cookie_string(&self) -> Result<String> {
        let rendered: Vec<String> = self
            .cookies
            .lock()
            .iter()
            .filter(|c| !c.is_expired())
            .map(CookieRecord::render)
            .collect();
        Ok(rendered.join("; "))
    }

    fn set_cookie(&self, assignment: &str) -> Result<()> {
        let record = parse_assignment(assignment);
        let mut cookies = self.cookies.lock();

        let existing = cookies
            .iter()
            .position(|c| c.name == record.name && c.path == record.path);

        match (existing, record.is_expired()) {
            (Some(index), true) => {
                trace!("Cookie '{}' expired by assignment", record.name);
                cookies.remove(index);
            }
            (Some(index), false) => cookies[index] = record,
            (None, true) => {}
            (None, false) => cookies.push(record),
        }

        Ok(())
    }
}

/// Parse a `name=value; attr=...` assignment the way a browser does
fn parse_assignment(assignment: &str) -> CookieRecord {
    let mut parts = assignment.split(';');
    let pair = parts.next().unwrap_or_default();

    let (name, value) = match pair.split_once('=') {
        Some((name, value)) => (name.trim().to_string(), value.trim().to_string()),
        None => (String::new(), pair.trim().to_string()),
    };

    let mut path = "/".to_string();
    let mut expires_at = None;
    let mut max_age = None;

    for attribute in parts {
        let (attr_name, attr_value) = match attribute.split_once('=') {
            Some((n, v)) => (n.trim(), v.trim()),
            None => (attribute.trim(), ""),
        };

        match attr_name.to_ascii_lowercase().as_str() {
            "expires" => {
                // Unparseable dates are ignored, leaving a session cookie
                expires_at = DateTime::parse_from_rfc2822(attr_value)
                    .ok()
                    .map(|dt| dt.with_timezone(&Utc));
            }
            "max-age" => max_age = attr_value.parse::<i64>().ok(),
            "path" if attr_value.starts_with('/') => path = attr_value.to_string(),
            _ => {}
        }
    }

    // Max-Age wins over Expires
    if let Some(seconds) = max_age {
        expires_at = Some(if seconds <= 0 {
            Utc::now() - Duration::seconds(1)
        } else {
            Utc::now() + Duration::seconds(seconds)
        });
    }

    CookieRecord {
        name,
        value,
        path,
        expires_at,
    }
}
