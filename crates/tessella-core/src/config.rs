//! Hierarchical configuration nodes.
//!
//! A [`Config`] is a view onto a YAML tree: maps of maps with typed
//! leaves. Every component of the framework receives the node it owns
//! (`space`, `cell_manager`, `grid`, `neighborhood`, ...) and reads its
//! parameters from there. Child nodes remember their dotted path so that
//! errors can name where a key was looked up.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_yaml::{Mapping, Value};

use crate::error::ConfigError;
use crate::id::{MultiIndex, SpaceVec};

/// A node of a hierarchical configuration tree.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    value: Value,
    path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::empty()
    }
}

impl Config {
    /// Parse a configuration from YAML text.
    ///
    /// An empty document yields an empty mapping.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let value: Value = serde_yaml::from_str(text).map_err(|e| ConfigError::Parse {
            reason: e.to_string(),
        })?;
        let value = match value {
            Value::Null => Value::Mapping(Mapping::new()),
            other => other,
        };
        Ok(Self::from_value(value))
    }

    /// An empty mapping node.
    pub fn empty() -> Self {
        Self::from_value(Value::Mapping(Mapping::new()))
    }

    /// Wrap an existing YAML value as the root node.
    pub fn from_value(value: Value) -> Self {
        Self {
            value,
            path: String::new(),
        }
    }

    /// The underlying YAML value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Dotted path of this node from the root; empty for the root.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Whether this node is null or an empty mapping.
    pub fn is_empty(&self) -> bool {
        match &self.value {
            Value::Null => true,
            Value::Mapping(m) => m.is_empty(),
            _ => false,
        }
    }

    /// Whether this node is a mapping containing `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    /// The child node at `key`, if present.
    pub fn get(&self, key: &str) -> Option<Config> {
        self.lookup(key).map(|v| Config {
            value: v.clone(),
            path: self.child_path(key),
        })
    }

    /// The child node at `key`, or a [`ConfigError::MissingKey`].
    pub fn require(&self, key: &str) -> Result<Config, ConfigError> {
        self.get(key).ok_or_else(|| self.missing(key, "config entry"))
    }

    /// Deserialize the value at `key` into `T`.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<T, ConfigError> {
        let value = self
            .lookup(key)
            .ok_or_else(|| self.missing(key, "config entry"))?;
        self.decode(key, value)
    }

    /// Deserialize the value at `key` into `T`, or return `default` if the
    /// key is absent. A present but malformed value is still an error.
    pub fn get_as_or<T: DeserializeOwned>(&self, key: &str, default: T) -> Result<T, ConfigError> {
        match self.lookup(key) {
            Some(value) => self.decode(key, value),
            None => Ok(default),
        }
    }

    /// Deserialize this whole node into `T`.
    pub fn as_<T: DeserializeOwned>(&self) -> Result<T, ConfigError> {
        let key = if self.path.is_empty() { "<root>" } else { &self.path };
        self.decode(key, &self.value)
    }

    /// Read a sequence of floats (a position, extent or resolution vector).
    pub fn get_as_space_vec(&self, key: &str) -> Result<SpaceVec, ConfigError> {
        let v: Vec<f64> = self.get_as(key)?;
        Ok(SpaceVec::from_vec(v))
    }

    /// Read a sequence of non-negative integers (a grid multi-index or shape).
    pub fn get_as_multi_index(&self, key: &str) -> Result<MultiIndex, ConfigError> {
        let v: Vec<usize> = self.get_as(key)?;
        Ok(MultiIndex::from_vec(v))
    }

    /// The string keys of this mapping node, in document order.
    pub fn keys(&self) -> Vec<String> {
        match &self.value {
            Value::Mapping(m) => m
                .keys()
                .filter_map(|k| k.as_str().map(str::to_owned))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Set `key` to `value`, turning this node into a mapping if needed.
    pub fn set<T: Serialize>(&mut self, key: &str, value: T) -> Result<(), ConfigError> {
        let value = serde_yaml::to_value(value).map_err(|e| ConfigError::InvalidType {
            key: self.child_path(key),
            expected: "a serializable value",
            reason: e.to_string(),
        })?;
        if !matches!(self.value, Value::Mapping(_)) {
            self.value = Value::Mapping(Mapping::new());
        }
        if let Value::Mapping(m) = &mut self.value {
            m.insert(Value::String(key.to_owned()), value);
        }
        Ok(())
    }

    /// Build a [`ConfigError::MissingKey`] located at this node.
    pub fn missing(&self, key: &str, what: &str) -> ConfigError {
        ConfigError::MissingKey {
            key: key.to_owned(),
            what: what.to_owned(),
            node: self.path.clone(),
        }
    }

    fn lookup(&self, key: &str) -> Option<&Value> {
        match &self.value {
            Value::Mapping(m) => m.get(key),
            _ => None,
        }
    }

    fn child_path(&self, key: &str) -> String {
        if self.path.is_empty() {
            key.to_owned()
        } else {
            format!("{}.{key}", self.path)
        }
    }

    fn decode<T: DeserializeOwned>(&self, key: &str, value: &Value) -> Result<T, ConfigError> {
        serde_yaml::from_value(value.clone()).map_err(|e| ConfigError::InvalidType {
            key: if key == self.path { key.to_owned() } else { self.child_path(key) },
            expected: std::any::type_name::<T>(),
            reason: e.to_string(),
        })
    }
}
