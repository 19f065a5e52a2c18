//! Column values and rows.
//!
//! JSON integers become arbitrary-precision [`ColumnValue::Integer`] and are
//! the only values that feed the order indices. Everything else is an opaque
//! comparable used for equality only.

use num_bigint::BigInt;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;
use std::str::FromStr;

/// A single cell of a directory row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColumnValue {
    Integer(BigInt),
    Text(String),
    Bool(bool),
    Null,
    /// Floats, arrays and objects, kept as canonical JSON text.
    Other(String),
}

impl ColumnValue {
    pub fn as_integer(&self) -> Option<&BigInt> {
        match self {
            ColumnValue::Integer(i) => Some(i),
            _ => None,
        }
    }

    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => ColumnValue::Null,
            Value::Bool(b) => ColumnValue::Bool(*b),
            Value::String(s) => ColumnValue::Text(s.clone()),
            Value::Number(n) => {
                let literal = n.to_string();
                match BigInt::from_str(&literal) {
                    Ok(i) => ColumnValue::Integer(i),
                    Err(_) => ColumnValue::Other(literal),
                }
            }
            other => ColumnValue::Other(other.to_string()),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            ColumnValue::Null => Value::Null,
            ColumnValue::Bool(b) => Value::Bool(*b),
            ColumnValue::Text(s) => Value::String(s.clone()),
            ColumnValue::Integer(i) => Number::from_str(&i.to_string())
                .map(Value::Number)
                .unwrap_or_else(|_| Value::String(i.to_string())),
            ColumnValue::Other(raw) => {
                serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.clone()))
            }
        }
    }
}

impl From<i32> for ColumnValue {
    fn from(v: i32) -> Self {
        ColumnValue::Integer(BigInt::from(v))
    }
}

impl From<i64> for ColumnValue {
    fn from(v: i64) -> Self {
        ColumnValue::Integer(BigInt::from(v))
    }
}

impl From<BigInt> for ColumnValue {
    fn from(v: BigInt) -> Self {
        ColumnValue::Integer(v)
    }
}

impl From<&str> for ColumnValue {
    fn from(v: &str) -> Self {
        ColumnValue::Text(v.to_string())
    }
}

impl From<bool> for ColumnValue {
    fn from(v: bool) -> Self {
        ColumnValue::Bool(v)
    }
}

impl Serialize for ColumnValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ColumnValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(ColumnValue::from_json(&value))
    }
}

/// A directory record: column name to value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row(BTreeMap<String, ColumnValue>);

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly for tests and fixtures.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ColumnValue>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&ColumnValue> {
        self.0.get(key)
    }

    pub fn integer(&self, key: &str) -> Option<&BigInt> {
        self.0.get(key).and_then(ColumnValue::as_integer)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ColumnValue)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn from_json_object(object: &Map<String, Value>) -> Self {
        Self(
            object
                .iter()
                .map(|(k, v)| (k.clone(), ColumnValue::from_json(v)))
                .collect(),
        )
    }

    pub fn to_json(&self) -> Value {
        Value::Object(self.0.iter().map(|(k, v)| (k.clone(), v.to_json())).collect())
    }
}

impl FromIterator<(String, ColumnValue)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, ColumnValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Serialize for Row {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Row {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Object(object) => Ok(Row::from_json_object(&object)),
            _ => Err(de::Error::custom("row must be an object")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_integers_become_integers() {
        assert_eq!(ColumnValue::from_json(&json!(42)), ColumnValue::from(42));
        assert_eq!(ColumnValue::from_json(&json!(-7)), ColumnValue::from(-7));
        assert_eq!(
            ColumnValue::from_json(&json!(u64::MAX)),
            ColumnValue::Integer(BigInt::from(u64::MAX))
        );
    }

    #[test]
    fn test_non_integers_are_opaque() {
        assert_eq!(ColumnValue::from_json(&json!("x")), ColumnValue::from("x"));
        assert_eq!(ColumnValue::from_json(&json!(true)), ColumnValue::Bool(true));
        assert_eq!(ColumnValue::from_json(&json!(null)), ColumnValue::Null);
        assert!(matches!(
            ColumnValue::from_json(&json!(1.5)),
            ColumnValue::Other(_)
        ));
        assert_eq!(
            ColumnValue::from_json(&json!(["eip155:1"])),
            ColumnValue::from_json(&json!(["eip155:1"]))
        );
    }

    #[test]
    fn test_row_json_round_trip() {
        let value = json!({"name": "John", "age": 30, "tags": ["a"]});
        let row: Row = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(row.integer("age"), Some(&BigInt::from(30)));
        assert_eq!(serde_json::to_value(&row).unwrap(), value);
    }

    #[test]
    fn test_row_rejects_non_object() {
        assert!(serde_json::from_value::<Row>(json!([1, 2])).is_err());
        assert!(serde_json::from_value::<Row>(json!("row")).is_err());
    }

    #[test]
    fn test_wide_integers_keep_their_literal() {
        let value: Value = serde_json::from_str("18446744073709551616").unwrap();
        let expected: BigInt = BigInt::from(u64::MAX) + 1;
        assert_eq!(
            ColumnValue::from_json(&value),
            ColumnValue::Integer(expected.clone())
        );

        let negative: Value =
            serde_json::from_str("-340282366920938463463374607431768211456").unwrap();
        assert_eq!(
            ColumnValue::from_json(&negative),
            ColumnValue::Integer(-(BigInt::from(1) << 128u32))
        );

        let row: Row = serde_json::from_str(r#"{"stake": 18446744073709551616}"#).unwrap();
        assert_eq!(row.integer("stake"), Some(&expected));
        assert_eq!(
            serde_json::to_string(&row).unwrap(),
            r#"{"stake":18446744073709551616}"#
        );
    }
}
