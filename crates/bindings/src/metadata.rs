use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Binding specific properties supplied at initialization.
///
/// The property bag is unordered and holds everything the binding and its
/// underlying client need: broker addresses, topic names, credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Component name, as declared by the host
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub properties: HashMap<String, String>,
}

impl Metadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: HashMap::new(),
        }
    }

    /// Builder-style property setter.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Look up a property, treating an empty value the same as a missing one.
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }
}
