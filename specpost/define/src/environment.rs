//! Named-variable environment template emitted next to the collection.

use serde::{Deserialize, Serialize};

/// One environment entry. Values start empty and are filled in by the
/// operator or by the collection's own test scripts at run time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentValue {
    pub key: String,
    pub value: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub enabled: bool,
}

impl EnvironmentValue {
    /// An enabled, empty `default`-typed entry.
    pub fn empty(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: String::new(),
            kind: "default".to_string(),
            enabled: true,
        }
    }

    /// An empty entry the runner ignores until the operator enables it, so a
    /// collection-level value of the same key stays in effect.
    pub fn disabled(key: impl Into<String>) -> Self {
        Self {
            enabled: false,
            ..Self::empty(key)
        }
    }
}

/// A flat environment document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    pub name: String,
    pub values: Vec<EnvironmentValue>,
}

impl Environment {
    pub fn contains(&self, key: &str) -> bool {
        self.values.iter().any(|v| v.key == key)
    }
}
