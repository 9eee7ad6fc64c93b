use serde::{Deserialize, Serialize};

/// Single environment override entry for the build container.
///
/// Serialized as `{"name": ..., "value": ...}`, the shape orchestrators expect
/// inside a container override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    /// Variable name.
    name: String,
    /// Variable value.
    value: String,
}

impl KeyValue {
    /// Create a new entry.
    pub fn new<K, V>(name: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Get the variable name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the value.
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl From<(&str, &str)> for KeyValue {
    fn from((name, value): (&str, &str)) -> Self {
        Self::new(name, value)
    }
}
