//! Parameter values
//!
//! The value domain carried by messages and read back from the device layer.
//! Numeric variants compare across types; lists compare lexicographically.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A parameter value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    Impulse,
    Bool(bool),
    Int(i32),
    Float(f64),
    Char(char),
    String(String),
    List(Vec<Value>),
}

impl Value {
    /// Numeric view of the value, if it has one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Compare two values.
    ///
    /// Returns `None` when the values are not comparable (e.g. a string
    /// against a float).
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Impulse, Value::Impulse) => Some(Ordering::Equal),
            (Value::Char(a), Value::Char(b)) => Some(a.cmp(b)),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::Char(a), Value::String(b)) => Some(a.to_string().as_str().cmp(b.as_str())),
            (Value::String(a), Value::Char(b)) => Some(a.as_str().cmp(b.to_string().as_str())),
            (Value::List(a), Value::List(b)) => {
                for (x, y) in a.iter().zip(b.iter()) {
                    match x.compare(y)? {
                        Ordering::Equal => continue,
                        ord => return Some(ord),
                    }
                }
                Some(a.len().cmp(&b.len()))
            }
            _ => {
                let a = self.as_f64()?;
                let b = other.as_f64()?;
                a.partial_cmp(&b)
            }
        }
    }

    /// Combine `incoming` into `self` following the value's merge rule.
    ///
    /// Lists concatenate; every other value is replaced.
    pub fn merge(&mut self, incoming: Value) {
        match (self, incoming) {
            (Value::List(existing), Value::List(mut more)) => existing.append(&mut more),
            (slot, incoming) => *slot = incoming,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<char> for Value {
    fn from(v: char) -> Self {
        Value::Char(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::List(v)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Impulse => write!(f, "impulse"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(v) => write!(f, "{}", v),
            Value::Char(c) => write!(f, "'{}'", c),
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_cross_type_compare() {
        assert_eq!(Value::Int(2).compare(&Value::Float(2.0)), Some(Ordering::Equal));
        assert_eq!(Value::Float(0.5).compare(&Value::Int(1)), Some(Ordering::Less));
        assert_eq!(Value::Bool(true).compare(&Value::Int(1)), Some(Ordering::Equal));
    }

    #[test]
    fn test_incomparable_types() {
        assert_eq!(Value::from("a").compare(&Value::Float(1.0)), None);
        assert_eq!(Value::Impulse.compare(&Value::Int(0)), None);
    }

    #[test]
    fn test_list_compare_is_lexicographic() {
        let a = Value::List(vec![Value::Int(1), Value::Int(2)]);
        let b = Value::List(vec![Value::Int(1), Value::Int(3)]);
        let c = Value::List(vec![Value::Int(1)]);
        assert_eq!(a.compare(&b), Some(Ordering::Less));
        assert_eq!(a.compare(&c), Some(Ordering::Greater));
    }

    #[test]
    fn test_merge_concatenates_lists() {
        let mut v = Value::List(vec![Value::Int(1)]);
        v.merge(Value::List(vec![Value::Int(2), Value::Int(3)]));
        assert_eq!(v, Value::List(vec![Value::Int(1), Value::Int(2), Value::Int(3)]));
    }

    #[test]
    fn test_merge_replaces_scalars() {
        let mut v = Value::Float(1.0);
        v.merge(Value::Float(2.0));
        assert_eq!(v, Value::Float(2.0));

        let mut list = Value::List(vec![]);
        list.merge(Value::Int(4));
        assert_eq!(list, Value::Int(4));
    }

    #[test]
    fn test_value_serialization() {
        let v = Value::List(vec![Value::Float(0.5), Value::from("x")]);
        let json = serde_json::to_string(&v).unwrap();
        let back: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v);
    }
}
