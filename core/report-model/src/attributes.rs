//! FILENAME: core/report-model/src/attributes.rs
//! PURPOSE: Design-time attribute side table keyed by (namespace, name).

use serde::{Deserialize, Serialize};

/// Namespace of the attributes the export pipeline understands.
pub const CORE_NAMESPACE: &str = "core";

/// Hides an element's value while it repeats the previous row's value.
pub const ONLY_SHOW_CHANGING_VALUES: &str = "only-show-changing-values";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AttributeKey {
    pub namespace: String,
    pub name: String,
}

impl AttributeKey {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        AttributeKey {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

/// Opaque attribute payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    Bool(bool),
    Text(String),
    Number(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct AttributeEntry {
    key: AttributeKey,
    value: AttributeValue,
}

/// Small ordered attribute table. Elements carry a handful of attributes at
/// most, so lookups scan.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Attributes {
    #[serde(default)]
    entries: Vec<AttributeEntry>,
}

impl Attributes {
    pub fn new() -> Self {
        Attributes::default()
    }

    pub fn get(&self, namespace: &str, name: &str) -> Option<&AttributeValue> {
        self.entries
            .iter()
            .find(|e| e.key.namespace == namespace && e.key.name == name)
            .map(|e| &e.value)
    }

    /// Replaces an existing value or appends a new entry.
    pub fn set(&mut self, key: AttributeKey, value: AttributeValue) {
        match self.entries.iter_mut().find(|e| e.key == key) {
            Some(entry) => entry.value = value,
            None => self.entries.push(AttributeEntry { key, value }),
        }
    }

    /// True when the attribute is present and set to `Bool(true)`.
    pub fn is_true(&self, namespace: &str, name: &str) -> bool {
        matches!(self.get(namespace, name), Some(AttributeValue::Bool(true)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_replaces_existing_entry() {
        let mut attrs = Attributes::new();
        let key = AttributeKey::new(CORE_NAMESPACE, ONLY_SHOW_CHANGING_VALUES);
        attrs.set(key.clone(), AttributeValue::Bool(false));
        attrs.set(key, AttributeValue::Bool(true));

        assert_eq!(attrs.len(), 1);
        assert!(attrs.is_true(CORE_NAMESPACE, ONLY_SHOW_CHANGING_VALUES));
        assert!(!attrs.is_true("other", ONLY_SHOW_CHANGING_VALUES));
    }
}
