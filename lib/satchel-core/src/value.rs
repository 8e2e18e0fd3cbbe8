//! Parameter trees.
//!
//! A request body starts as a [`Value`]: a scalar, a file, a list or an
//! insertion-ordered map of further values.
//!
//! # Example
//!
//! ```
//! use satchel_core::{FileValue, Params, Value};
//!
//! let params = Params::new()
//!     .with("name", "Alice")
//!     .with("tags", vec!["a", "b"])
//!     .with("avatar", FileValue::memory("me.png", vec![0x89, b'P', b'N', b'G']));
//!
//! assert!(Value::from(params).is_map());
//! ```

use std::fmt;

use bytes::Bytes;
use indexmap::IndexMap;

use crate::{FileValue, Result};

/// A leaf value with a string form.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// Absent value; renders as the empty string.
    Null,
    /// Boolean.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Unsigned integer too large for [`Scalar::Int`].
    UInt(u64),
    /// Floating point number.
    Float(f64),
    /// UTF-8 text.
    Text(String),
    /// Raw bytes, typically an already-serialized body.
    Binary(Bytes),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::UInt(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
            Self::Binary(value) => f.write_str(&String::from_utf8_lossy(value)),
        }
    }
}

impl Scalar {
    /// Bytes of the string form. Binary scalars are returned untouched.
    #[must_use]
    pub fn to_bytes(&self) -> Bytes {
        match self {
            Self::Binary(bytes) => bytes.clone(),
            Self::Text(text) => Bytes::copy_from_slice(text.as_bytes()),
            other => Bytes::from(other.to_string()),
        }
    }
}

/// Insertion-ordered map of parameter values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params(IndexMap<String, Value>);

impl Params {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, replacing any previous value under the same key.
    ///
    /// A replaced key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Builder-style [`Params::insert`].
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the map has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }
}

impl<'a> IntoIterator for &'a Params {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

/// A node of a parameter tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Leaf with a string form.
    Scalar(Scalar),
    /// File-like leaf.
    File(FileValue),
    /// Ordered sequence.
    List(Vec<Value>),
    /// Keyed mapping.
    Map(Params),
}

impl Value {
    /// Convert any serializable value into a parameter tree.
    ///
    /// Objects keep their field order.
    ///
    /// # Example
    ///
    /// ```
    /// use satchel_core::Value;
    /// use serde::Serialize;
    ///
    /// #[derive(Serialize)]
    /// struct Search { q: String, page: u32 }
    ///
    /// let value = Value::from_serialize(&Search { q: "rust".into(), page: 2 }).expect("value");
    /// assert!(value.is_map());
    /// ```
    pub fn from_serialize<T: serde::Serialize + ?Sized>(value: &T) -> Result<Self> {
        let json = serde_json::to_value(value)?;
        Ok(Self::from(json))
    }

    /// Returns `true` for map values, the only shape that gets encoded.
    #[must_use]
    pub const fn is_map(&self) -> bool {
        matches!(self, Self::Map(_))
    }

    /// Returns `true` for file values.
    #[must_use]
    pub const fn is_file(&self) -> bool {
        matches!(self, Self::File(_))
    }

    /// The map, if this is one.
    #[must_use]
    pub const fn as_map(&self) -> Option<&Params> {
        match self {
            Self::Map(params) => Some(params),
            _ => None,
        }
    }

    /// The file, if this is one.
    #[must_use]
    pub const fn as_file(&self) -> Option<&FileValue> {
        match self {
            Self::File(file) => Some(file),
            _ => None,
        }
    }
}

impl From<Scalar> for Value {
    fn from(value: Scalar) -> Self {
        Self::Scalar(value)
    }
}

impl From<FileValue> for Value {
    fn from(value: FileValue) -> Self {
        Self::File(value)
    }
}

impl From<Params> for Value {
    fn from(value: Params) -> Self {
        Self::Map(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Scalar(Scalar::Null), Into::into)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Scalar(Scalar::Text(value.to_string()))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Scalar(Scalar::Text(value))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Scalar(Scalar::Bool(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Scalar(Scalar::Float(value))
    }
}

impl From<Bytes> for Value {
    fn from(value: Bytes) -> Self {
        Self::Scalar(Scalar::Binary(value))
    }
}

macro_rules! impl_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Self::Scalar(Scalar::Int(i64::from(value)))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        i64::try_from(value).map_or(Self::Scalar(Scalar::UInt(value)), |int| {
            Self::Scalar(Scalar::Int(int))
        })
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        u64::try_from(value).map_or_else(
            |_| Self::Scalar(Scalar::Text(value.to_string())),
            Self::from,
        )
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Scalar(Scalar::Null),
            serde_json::Value::Bool(value) => Self::Scalar(Scalar::Bool(value)),
            serde_json::Value::Number(number) => {
                if let Some(int) = number.as_i64() {
                    Self::Scalar(Scalar::Int(int))
                } else if let Some(uint) = number.as_u64() {
                    Self::Scalar(Scalar::UInt(uint))
                } else if let Some(float) = number.as_f64() {
                    Self::Scalar(Scalar::Float(float))
                } else {
                    Self::Scalar(Scalar::Text(number.to_string()))
                }
            }
            serde_json::Value::String(text) => Self::Scalar(Scalar::Text(text)),
            serde_json::Value::Array(values) => {
                Self::List(values.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(object) => Self::Map(object.into_iter().collect()),
        }
    }
}
