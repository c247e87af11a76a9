//! Storage keys and their validation

use crate::error::{Result, UnistoreError};
use std::fmt;

/// A key as supplied by a caller, before validation
#[derive(Debug, Clone, PartialEq)]
pub enum KeyInput {
    Text(String),
    Number(f64),
    /// No key at all, e.g. `None` passed where a key was expected
    Absent,
}

impl KeyInput {
    /// Describe the input for error messages
    fn describe(&self) -> String {
        match self {
            KeyInput::Text(s) => format!("{s:?}"),
            KeyInput::Number(n) => format_number(*n),
            KeyInput::Absent => "undefined".to_string(),
        }
    }
}

impl From<&str> for KeyInput {
    fn from(s: &str) -> Self {
        KeyInput::Text(s.to_string())
    }
}

impl From<String> for KeyInput {
    fn from(s: String) -> Self {
        KeyInput::Text(s)
    }
}

impl From<&String> for KeyInput {
    fn from(s: &String) -> Self {
        KeyInput::Text(s.clone())
    }
}

impl From<f64> for KeyInput {
    fn from(n: f64) -> Self {
        KeyInput::Number(n)
    }
}

impl From<i32> for KeyInput {
    fn from(n: i32) -> Self {
        KeyInput::Number(n as f64)
    }
}

impl From<i64> for KeyInput {
    fn from(n: i64) -> Self {
        KeyInput::Number(n as f64)
    }
}

impl From<u32> for KeyInput {
    fn from(n: u32) -> Self {
        KeyInput::Number(n as f64)
    }
}

impl From<u64> for KeyInput {
    fn from(n: u64) -> Self {
        KeyInput::Number(n as f64)
    }
}

impl From<usize> for KeyInput {
    fn from(n: usize) -> Self {
        KeyInput::Number(n as f64)
    }
}

impl From<Key> for KeyInput {
    fn from(key: Key) -> Self {
        KeyInput::Text(key.0)
    }
}

impl From<&Key> for KeyInput {
    fn from(key: &Key) -> Self {
        KeyInput::Text(key.0.clone())
    }
}

impl<T: Into<KeyInput>> From<Option<T>> for KeyInput {
    fn from(value: Option<T>) -> Self {
        value.map_or(KeyInput::Absent, Into::into)
    }
}

/// A validated, stringified storage key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key(String);

impl Key {
    /// Wrap a key name read back from a medium
    pub(crate) fn from_stored(name: String) -> Self {
        Key(name)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for Key {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for Key {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Key {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Guards every keyed operation
pub struct KeyValidator;

impl KeyValidator {
    /// Validate a candidate key and return its stringified form.
    ///
    /// Text keys must be non-empty. Numbers are always accepted and render the
    /// way a browser stringifies them (`42`, `1.5`, `-3`, `1e+21`).
    pub fn check(input: impl Into<KeyInput>) -> Result<Key> {
        let input = input.into();
        match input {
            KeyInput::Text(ref s) if !s.is_empty() => Ok(Key(s.clone())),
            KeyInput::Number(n) => Ok(Key(format_number(n))),
            other => Err(UnistoreError::InvalidKey {
                key: other.describe(),
            }),
        }
    }

    /// Validate every key in a batch before any of them is used
    pub fn check_all<I>(inputs: I) -> Result<Vec<Key>>
    where
        I: IntoIterator,
        I::Item: Into<KeyInput>,
    {
        inputs.into_iter().map(Self::check).collect()
    }
}

fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let sign = if n > 0.0 { "" } else { "-" };
        format!("{sign}Infinity")
    } else if n == 0.0 {
        // Negative zero stringifies as "0"
        "0".to_string()
    } else if n.abs() >= 1e21 || n.abs() < 1e-6 {
        // Exponent form with an explicit sign, e.g. "1e+21" and "1.5e-7"
        let formatted = format!("{n:e}");
        match formatted.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{mantissa}e+{exponent}")
            }
            _ => formatted,
        }
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_accepts_text_and_numbers() {
        assert_eq!(KeyValidator::check("k").unwrap(), "k");
        assert_eq!(KeyValidator::check(42).unwrap(), "42");
        assert_eq!(KeyValidator::check(1.5).unwrap(), "1.5");
        assert_eq!(KeyValidator::check(-3i64).unwrap(), "-3");
        assert_eq!(KeyValidator::check(0usize).unwrap(), "0");
        assert_eq!(KeyValidator::check(-0.0).unwrap(), "0");
    }

    #[test]
    fn test_check_rejects_empty_and_absent() {
        let empty = KeyValidator::check("").unwrap_err();
        assert!(matches!(empty, UnistoreError::InvalidKey { .. }));

        let absent = KeyValidator::check(None::<&str>).unwrap_err();
        match absent {
            UnistoreError::InvalidKey { key } => assert_eq!(key, "undefined"),
            other => panic!("Expected InvalidKey, got {other:?}"),
        }

        assert!(KeyValidator::check(KeyInput::Absent).is_err());
    }

    #[test]
    fn test_check_option_some_is_unwrapped() {
        assert_eq!(KeyValidator::check(Some("theme")).unwrap(), "theme");
        assert_eq!(KeyValidator::check(Some(7)).unwrap(), "7");
    }

    #[test]
    fn test_check_all_fails_on_any_invalid() {
        let keys = KeyValidator::check_all(["a", "b"]).unwrap();
        assert_eq!(keys.len(), 2);

        assert!(KeyValidator::check_all(["a", "", "c"]).is_err());
    }

    #[test]
    fn test_special_numbers() {
        assert_eq!(KeyValidator::check(f64::NAN).unwrap(), "NaN");
        assert_eq!(KeyValidator::check(f64::INFINITY).unwrap(), "Infinity");
        assert_eq!(KeyValidator::check(f64::NEG_INFINITY).unwrap(), "-Infinity");
    }

    #[test]
    fn test_exponent_range_numbers() {
        assert_eq!(KeyValidator::check(1e21).unwrap(), "1e+21");
        assert_eq!(KeyValidator::check(-2.5e30).unwrap(), "-2.5e+30");
        assert_eq!(KeyValidator::check(1e-7).unwrap(), "1e-7");
        assert_eq!(KeyValidator::check(1.5e-7).unwrap(), "1.5e-7");

        // Just inside the plain range
        assert_eq!(KeyValidator::check(1e20).unwrap(), "100000000000000000000");
        assert_eq!(KeyValidator::check(0.000001).unwrap(), "0.000001");
    }

    #[test]
    fn test_key_round_trips_as_input() {
        let key = KeyValidator::check("session-id").unwrap();
        assert_eq!(KeyValidator::check(&key).unwrap(), key);
        assert_eq!(key.to_string(), "session-id");
        assert_eq!(key.clone().into_string(), "session-id");
    }
}
