//! Dynamic JSON value tree.
//!
//! This module defines the [`Value`] enum produced by the parser, together
//! with the [`Map`] and [`Array`] aliases and conversion helpers.

use indexmap::IndexMap;
use rust_decimal::Decimal;

/// An object map preserving insertion order of keys.
pub type Map = IndexMap<String, Value>;
/// An array of values.
pub type Array = Vec<Value>;

/// A dynamic JSON value.
///
/// Numbers come in three kinds, matching how literals are decoded: integer
/// literals become [`Int`], float literals with fewer than 17 significant
/// digits become [`Double`], longer float literals become [`Decimal`].
///
/// # Examples
///
/// ```
/// use jsonlax::{Map, Value};
///
/// let mut map = Map::new();
/// map.insert("key".to_string(), Value::String("value".into()));
/// let v = Value::Object(map);
/// assert_eq!(v.to_string(), r#"{ "key": "value" }"#);
/// ```
///
/// [`Int`]: Value::Int
/// [`Double`]: Value::Double
/// [`Decimal`]: Value::Decimal
// Enable serde support for tests and when the optional `serde` feature is
// activated by downstream crates. The `cfg_attr` conditional keeps the core
// crate free of a serde dependency in normal builds.
#[cfg_attr(any(test, feature = "serde"), derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// The JSON null.
    Null,
    /// A boolean.
    Bool(bool),
    /// An integer literal.
    Int(i32),
    /// A float literal with fewer than 17 significant digits.
    Double(f64),
    /// A float literal with 17 or more significant digits.
    Decimal(Decimal),
    /// A string.
    String(String),
    /// An array of values.
    Array(Array),
    /// An object with insertion-ordered keys.
    Object(Map),
}

impl Default for Value {
    fn default() -> Self {
        Self::Null
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<Decimal> for Value {
    fn from(v: Decimal) -> Self {
        Self::Decimal(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.into())
    }
}

impl From<Array> for Value {
    fn from(v: Array) -> Self {
        Self::Array(v)
    }
}

impl From<Map> for Value {
    fn from(v: Map) -> Self {
        Self::Object(v)
    }
}

impl Value {
    /// Returns `true` if the value is [`Null`].
    ///
    /// [`Null`]: Value::Null
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` if the value is [`Bool`].
    ///
    /// [`Bool`]: Value::Bool
    #[must_use]
    pub fn is_bool(&self) -> bool {
        matches!(self, Self::Bool(..))
    }

    /// Returns `true` if the value is any of the numeric kinds.
    ///
    /// # Examples
    ///
    /// ```
    /// use jsonlax::Value;
    ///
    /// assert!(Value::Int(42).is_number());
    /// assert!(Value::Double(4.2).is_number());
    /// assert!(!Value::Null.is_number());
    /// ```
    #[must_use]
    pub fn is_number(&self) -> bool {
        matches!(self, Self::Int(..) | Self::Double(..) | Self::Decimal(..))
    }

    /// Returns `true` if the value is [`String`].
    ///
    /// [`String`]: Value::String
    #[must_use]
    pub fn is_string(&self) -> bool {
        matches!(self, Self::String(..))
    }

    /// Returns `true` if the value is [`Array`].
    ///
    /// [`Array`]: Value::Array
    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(..))
    }

    /// Returns `true` if the value is [`Object`].
    ///
    /// [`Object`]: Value::Object
    #[must_use]
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(..))
    }

    /// Returns the boolean if the value is [`Bool`].
    ///
    /// [`Bool`]: Value::Bool
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer if the value is [`Int`].
    ///
    /// [`Int`]: Value::Int
    #[must_use]
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the value as an `f64` if it is [`Int`] or [`Double`].
    ///
    /// [`Int`]: Value::Int
    /// [`Double`]: Value::Double
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(n) => Some(f64::from(*n)),
            Self::Double(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the string slice if the value is [`String`].
    ///
    /// [`String`]: Value::String
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the array if the value is [`Array`].
    ///
    /// [`Array`]: Value::Array
    #[must_use]
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Returns the object map if the value is [`Object`].
    ///
    /// [`Object`]: Value::Object
    #[must_use]
    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Self::Object(m) => Some(m),
            _ => None,
        }
    }
}

impl core::fmt::Display for Value {
    /// Formats the value as JSON text using the default writer configuration
    /// (single line, `", "` separators).
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&crate::writer::write(self))
    }
}
