//! Value encoding at the storage boundary
//!
//! Every medium stores plain strings. Composite values are JSON-encoded,
//! primitives are stored in their natural string form, and reads attempt a
//! JSON decode before falling back to the raw string.

use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// A value handed to `set`
#[derive(Debug, Clone, PartialEq)]
pub enum Storable {
    Value(Value),
    /// No value; never persisted
    Undefined,
    /// A host callable; never persisted
    Callable,
}

impl Storable {
    /// Build a storable from any serializable value
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        Ok(Storable::Value(serde_json::to_value(value)?))
    }

    /// Whether the codec will persist this value
    pub fn is_persistable(&self) -> bool {
        matches!(self, Storable::Value(_))
    }
}

impl From<Value> for Storable {
    fn from(v: Value) -> Self {
        Storable::Value(v)
    }
}

impl From<&str> for Storable {
    fn from(s: &str) -> Self {
        Storable::Value(Value::String(s.to_string()))
    }
}

impl From<String> for Storable {
    fn from(s: String) -> Self {
        Storable::Value(Value::String(s))
    }
}

impl From<bool> for Storable {
    fn from(b: bool) -> Self {
        Storable::Value(Value::Bool(b))
    }
}

impl From<i32> for Storable {
    fn from(n: i32) -> Self {
        Storable::Value(Value::from(n))
    }
}

impl From<i64> for Storable {
    fn from(n: i64) -> Self {
        Storable::Value(Value::from(n))
    }
}

impl From<u64> for Storable {
    fn from(n: u64) -> Self {
        Storable::Value(Value::from(n))
    }
}

impl From<f64> for Storable {
    fn from(n: f64) -> Self {
        // Non-finite numbers have no JSON form and serialize as null
        Storable::Value(Value::from(n))
    }
}

impl From<Vec<Value>> for Storable {
    fn from(items: Vec<Value>) -> Self {
        Storable::Value(Value::Array(items))
    }
}

impl<T: Into<Storable>> From<Option<T>> for Storable {
    fn from(value: Option<T>) -> Self {
        value.map_or(Storable::Undefined, Into::into)
    }
}

/// String codec shared by every storage area
pub struct ValueCodec;

impl ValueCodec {
    /// Encode a value for storage, or `None` when it must not be persisted
    pub fn encode(value: &Storable) -> Option<String> {
        match value {
            Storable::Undefined | Storable::Callable => None,
            Storable::Value(Value::String(s)) => Some(s.clone()),
            Storable::Value(Value::Bool(b)) => Some(b.to_string()),
            Storable::Value(Value::Number(n)) => Some(n.to_string()),
            // null, arrays and objects go through JSON
            Storable::Value(v) => Some(v.to_string()),
        }
    }

    /// Decode a stored string, treating anything that is not JSON as a plain string
    pub fn decode(raw: &str) -> Value {
        serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
    }

    /// Decode a stored string into a concrete type
    pub fn decode_as<T: DeserializeOwned>(raw: &str) -> Result<T> {
        Ok(serde_json::from_value(Self::decode(raw))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_encode_primitives_use_natural_form() {
        assert_eq!(ValueCodec::encode(&"hello".into()), Some("hello".to_string()));
        assert_eq!(ValueCodec::encode(&42.into()), Some("42".to_string()));
        assert_eq!(ValueCodec::encode(&1.5.into()), Some("1.5".to_string()));
        assert_eq!(ValueCodec::encode(&true.into()), Some("true".to_string()));
    }

    #[test]
    fn test_encode_composites_as_json() {
        let obj = Storable::from(json!({"name": "ada", "tags": [1, 2]}));
        let encoded = ValueCodec::encode(&obj).unwrap();
        let reparsed: Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(reparsed, json!({"name": "ada", "tags": [1, 2]}));

        assert_eq!(
            ValueCodec::encode(&Storable::from(vec![json!(1), json!("a")])),
            Some(r#"[1,"a"]"#.to_string())
        );
        assert_eq!(ValueCodec::encode(&Value::Null.into()), Some("null".to_string()));
    }

    #[test]
    fn test_encode_skips_unpersistable() {
        assert_eq!(ValueCodec::encode(&Storable::Undefined), None);
        assert_eq!(ValueCodec::encode(&Storable::Callable), None);
        assert_eq!(ValueCodec::encode(&None::<&str>.into()), None);
        assert!(!Storable::Callable.is_persistable());
    }

    #[test]
    fn test_decode_falls_back_to_raw_string() {
        assert_eq!(ValueCodec::decode("plain text"), json!("plain text"));
        assert_eq!(ValueCodec::decode("{broken"), json!("{broken"));
        assert_eq!(ValueCodec::decode(""), json!(""));
    }

    #[test]
    fn test_decode_parses_json() {
        assert_eq!(ValueCodec::decode("42"), json!(42));
        assert_eq!(ValueCodec::decode("true"), json!(true));
        assert_eq!(ValueCodec::decode("null"), Value::Null);
        assert_eq!(ValueCodec::decode(r#"{"a":[1,2]}"#), json!({"a": [1, 2]}));
    }

    #[test]
    fn test_numeric_looking_strings_decode_as_numbers() {
        // Strings are stored unquoted, so "1" comes back as the number 1
        let encoded = ValueCodec::encode(&"1".into()).unwrap();
        assert_eq!(ValueCodec::decode(&encoded), json!(1));
    }

    #[test]
    fn test_decode_as_typed() {
        #[derive(serde::Deserialize, Debug, PartialEq)]
        struct Prefs {
            theme: String,
            size: u32,
        }

        let prefs: Prefs = ValueCodec::decode_as(r#"{"theme":"dark","size":12}"#).unwrap();
        assert_eq!(
            prefs,
            Prefs {
                theme: "dark".to_string(),
                size: 12
            }
        );
        assert!(ValueCodec::decode_as::<u32>("not a number").is_err());
    }

    #[test]
    fn test_from_serialize() {
        let storable = Storable::from_serialize(&vec!["a", "b"]).unwrap();
        assert_eq!(storable, Storable::Value(json!(["a", "b"])));
    }
}
