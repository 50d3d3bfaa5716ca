//! Insertion-ordered, name-unique containers used by every property node.
//!
//! Two direct children of one container never share a name. A plain
//! [`NamedContainer::insert`] rejects a duplicate with
//! [`MessageKey::DuplicateName`](crate::core::MessageKey::DuplicateName);
//! the only ways to overwrite are the explicit [`NamedContainer::replace`]
//! (used by object-group merges) and the idempotent
//! [`NamedContainer::insert_if_absent`] (used for scoped LOV registration).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::{FormError, FormResult};

/// Anything stored in a [`NamedContainer`].
pub trait Named {
    /// Human readable entity kind, used in duplicate-name errors.
    const KIND: &'static str;

    fn name(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NamedContainer<T> {
    entries: IndexMap<String, T>,
}

impl<T> Default for NamedContainer<T> {
    fn default() -> Self {
        Self { entries: IndexMap::new() }
    }
}

impl<T: Named> NamedContainer<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `value`; a second child with the same name is rejected.
    /// Returns the insertion index.
    pub fn insert(&mut self, value: T, owner: &str) -> FormResult<usize> {
        if self.entries.contains_key(value.name()) {
            return Err(FormError::duplicate(T::KIND, value.name(), owner));
        }
        let (index, _) = self.entries.insert_full(value.name().to_string(), value);
        Ok(index)
    }

    /// Appends `value` unless the name is already present. Returns whether
    /// the value was inserted.
    pub fn insert_if_absent(&mut self, value: T) -> bool {
        if self.entries.contains_key(value.name()) {
            return false;
        }
        self.entries.insert(value.name().to_string(), value);
        true
    }

    /// Overwrites a same-named entry in place (keeping its position) or
    /// appends. Returns the previous value.
    pub fn replace(&mut self, value: T) -> Option<T> {
        self.entries.insert(value.name().to_string(), value)
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.entries.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut T> {
        self.entries.get_mut(name)
    }

    pub fn get_index(&self, index: usize) -> Option<&T> {
        self.entries.get_index(index).map(|(_, v)| v)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.entries.get_index_of(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.values()
    }

    /// Mutable access for post-hoc patches. Names must not be changed
    /// through this iterator; rename by rebuilding the container.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.entries.values_mut()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Keeps only the entries `keep` accepts, preserving order.
    pub fn retain(&mut self, mut keep: impl FnMut(&T) -> bool) {
        self.entries.retain(|_, value| keep(value));
    }

    pub fn into_values(self) -> impl Iterator<Item = T> {
        self.entries.into_values()
    }
}

impl<T: Named> FromIterator<T> for NamedContainer<T> {
    /// Later duplicates overwrite earlier ones; use `insert` when duplicates
    /// must be reported.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut container = Self::new();
        for value in iter {
            container.replace(value);
        }
        container
    }
}
