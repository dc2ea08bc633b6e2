//! Insertion-ordered storage keyed by entity name.

use serde::ser::{Serialize, Serializer};
use std::collections::HashMap;

/// An entity identified by its name inside a [`Conf`](crate::Conf).
pub trait Named {
    /// The key the entity is stored under.
    fn name(&self) -> &str;
}

/// Name-keyed map that iterates in insertion order.
///
/// Replacing an existing key keeps the entry at its original position.
#[derive(Debug, Clone)]
pub struct NamedMap<V> {
    entries: Vec<V>,
    index: HashMap<String, usize>,
}

impl<V> Default for NamedMap<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<V: Named> NamedMap<V> {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value under its name, returning the value it replaced.
    pub fn insert(&mut self, value: V) -> Option<V> {
        match self.index.get(value.name()) {
            Some(&pos) => Some(std::mem::replace(&mut self.entries[pos], value)),
            None => {
                self.index.insert(value.name().to_string(), self.entries.len());
                self.entries.push(value);
                None
            }
        }
    }

    /// Remove the value stored under `name`.
    pub fn remove(&mut self, name: &str) -> Option<V> {
        let pos = self.index.remove(name)?;
        let value = self.entries.remove(pos);
        for slot in self.index.values_mut() {
            if *slot > pos {
                *slot -= 1;
            }
        }
        Some(value)
    }

    /// Get the value stored under `name`.
    pub fn get(&self, name: &str) -> Option<&V> {
        self.index.get(name).map(|&pos| &self.entries[pos])
    }

    /// Get a mutable reference to the value stored under `name`.
    ///
    /// Callers must not change the value's name through this reference.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut V> {
        self.index.get(name).map(|&pos| &mut self.entries[pos])
    }

    /// Check if `name` is present.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Iterate values in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, V> {
        self.entries.iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the map is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> IntoIterator for NamedMap<V> {
    type Item = V;
    type IntoIter = std::vec::IntoIter<V>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<V: Named + PartialEq> PartialEq for NamedMap<V> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<V: Named + Eq> Eq for NamedMap<V> {}

impl<V: Serialize> Serialize for NamedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.entries)
    }
}
