//! Incrementally populated attribute storage.

use std::collections::BTreeMap;

/// Name → value map for an entity's cached attributes.
///
/// Generic over the value type so the objectified value tree can live in the models
/// crate. Iteration order is by attribute name.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeStore<V> {
    values: BTreeMap<String, V>,
}

impl<V> AttributeStore<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&V> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Insert or overwrite one attribute, returning the previous value.
    pub fn set(&mut self, name: impl Into<String>, value: V) -> Option<V> {
        self.values.insert(name.into(), value)
    }

    pub fn remove(&mut self, name: &str) -> Option<V> {
        self.values.remove(name)
    }

    /// Merge `other` into `self`; values in `other` win.
    pub fn merge(&mut self, other: AttributeStore<V>) {
        self.values.extend(other.values);
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<V> Default for AttributeStore<V> {
    fn default() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }
}

impl<V> FromIterator<(String, V)> for AttributeStore<V> {
    fn from_iter<T: IntoIterator<Item = (String, V)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl<V> IntoIterator for AttributeStore<V> {
    type Item = (String, V);
    type IntoIter = std::collections::btree_map::IntoIter<String, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}
