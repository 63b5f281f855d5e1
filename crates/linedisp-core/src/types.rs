/*!
 * Core data types for linedisp.
 *
 * This module defines option values and the free-form option map handed to
 * display drivers when they are opened.
 */
use std::collections::hash_map;
use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A loosely typed option value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Boolean value
    Bool(bool),
    /// Integer value
    Integer(i64),
    /// String value
    String(String),
    /// Single byte value
    Byte(u8),
}

impl Value {
    /// Name of the value's type, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Integer(_) => "integer",
            Value::String(_) => "string",
            Value::Byte(_) => "byte",
        }
    }

    /// Try to get a boolean value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get an integer value. Bytes widen to integers.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            Value::Byte(b) => Some(i64::from(*b)),
            _ => None,
        }
    }

    /// Try to get a byte value. Integers in `0..=255` narrow to bytes.
    pub fn as_byte(&self) -> Option<u8> {
        match self {
            Value::Byte(b) => Some(*b),
            Value::Integer(i) => u8::try_from(*i).ok(),
            _ => None,
        }
    }

    /// Try to get a string value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Byte(b) => write!(f, "0x{:02X}", b),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i64::from(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Integer(i64::from(i))
    }
}

impl From<u8> for Value {
    fn from(b: u8) -> Self {
        Value::Byte(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

/// An option held the wrong kind of value
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("option {name:?} must be {expected}, got {found}")]
pub struct OptionError {
    /// The option name
    pub name: String,
    /// What the option should have held
    pub expected: &'static str,
    /// What the option held instead
    pub found: String,
}

impl OptionError {
    fn new(name: &str, expected: &'static str, found: &Value) -> Self {
        Self {
            name: name.to_string(),
            expected,
            found: format!("{} {}", found.type_name(), found),
        }
    }
}

/// Driver options keyed by name.
///
/// Every option is independently optional; drivers pick their own defaults.
/// The typed getters return `Ok(None)` for an absent option and an
/// [`OptionError`] when the option is present with an incompatible type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DriverConfig {
    options: HashMap<String, Value>,
}

impl DriverConfig {
    /// Creates an empty option map
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an option
    pub fn with_option<K: Into<String>, V: Into<Value>>(mut self, key: K, value: V) -> Self {
        self.set(key, value);
        self
    }

    /// Sets an option, returning the previous value
    pub fn set<K: Into<String>, V: Into<Value>>(&mut self, key: K, value: V) -> Option<Value> {
        self.options.insert(key.into(), value.into())
    }

    /// Gets a raw option value
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    /// Whether an option is present
    pub fn contains(&self, key: &str) -> bool {
        self.options.contains_key(key)
    }

    /// Number of options
    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// Whether no options are set
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Iterates over all options in arbitrary order
    pub fn iter(&self) -> hash_map::Iter<'_, String, Value> {
        self.options.iter()
    }

    /// Gets a string option
    pub fn get_string(&self, key: &str) -> Result<Option<String>, OptionError> {
        self.typed(key, "a string", |v| v.as_str().map(str::to_string))
    }

    /// Gets an integer option
    pub fn get_integer(&self, key: &str) -> Result<Option<i64>, OptionError> {
        self.typed(key, "an integer", Value::as_integer)
    }

    /// Gets a byte option
    pub fn get_byte(&self, key: &str) -> Result<Option<u8>, OptionError> {
        self.typed(key, "a byte (0-255)", Value::as_byte)
    }

    fn typed<T>(
        &self,
        key: &str,
        expected: &'static str,
        convert: impl FnOnce(&Value) -> Option<T>,
    ) -> Result<Option<T>, OptionError> {
        match self.options.get(key) {
            None => Ok(None),
            Some(value) => convert(value)
                .map(Some)
                .ok_or_else(|| OptionError::new(key, expected, value)),
        }
    }
}

impl From<HashMap<String, Value>> for DriverConfig {
    fn from(options: HashMap<String, Value>) -> Self {
        Self { options }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for DriverConfig {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            options: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a DriverConfig {
    type Item = (&'a String, &'a Value);
    type IntoIter = hash_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_conversions() {
        let v: Value = true.into();
        assert_eq!(v.as_bool(), Some(true));

        let v: Value = 9600i32.into();
        assert_eq!(v.as_integer(), Some(9600));
        assert_eq!(v.as_byte(), None);

        let v: Value = 8u8.into();
        assert_eq!(v.as_byte(), Some(8));
        assert_eq!(v.as_integer(), Some(8));

        let v: Value = 2i64.into();
        assert_eq!(v.as_byte(), Some(2));

        let v: Value = "/dev/ttyUSB0".into();
        assert_eq!(v.as_str(), Some("/dev/ttyUSB0"));
        assert_eq!(v.as_integer(), None);
    }

    #[test]
    fn test_driver_config_getters() {
        let config = DriverConfig::new()
            .with_option("port", "/dev/ttyS0")
            .with_option("baud", 19200)
            .with_option("size", 7u8);

        assert_eq!(config.len(), 3);
        assert_eq!(
            config.get_string("port").unwrap().as_deref(),
            Some("/dev/ttyS0")
        );
        assert_eq!(config.get_integer("baud").unwrap(), Some(19200));
        assert_eq!(config.get_byte("size").unwrap(), Some(7));
        assert_eq!(config.get_integer("missing").unwrap(), None);
    }

    #[test]
    fn test_driver_config_type_mismatch() {
        let config = DriverConfig::new().with_option("baud", "fast");

        let err = config.get_integer("baud").unwrap_err();
        assert_eq!(err.name, "baud");
        assert_eq!(err.expected, "an integer");
        assert_eq!(
            err.to_string(),
            "option \"baud\" must be an integer, got string \"fast\""
        );

        let config = DriverConfig::new().with_option("size", 300);
        assert!(config.get_byte("size").is_err());
    }

    #[test]
    fn test_driver_config_from_iter() {
        let config: DriverConfig = vec![("port", "COM3"), ("parity", "even")]
            .into_iter()
            .collect();
        assert!(config.contains("port"));
        assert_eq!(config.get("parity"), Some(&Value::from("even")));
    }
}
