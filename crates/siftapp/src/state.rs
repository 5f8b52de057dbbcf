//! Filter state store.
//!
//! Holds the current value of every registered filter key. Writes are
//! unconditional overwrites: the store never validates a value against the
//! options a control declares.

use serde::Serialize;
use std::collections::BTreeMap;

/// A defensive copy of the filter state, handed to callbacks and callers.
pub type FilterSnapshot = BTreeMap<String, String>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FilterState {
    values: BTreeMap<String, String>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites the value for `key`, registering the key if it is new.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns an owned copy of the current mapping.
    pub fn snapshot(&self) -> FilterSnapshot {
        self.values.clone()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FilterState {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut state = Self::new();
        for (k, v) in iter {
            state.set(k, v);
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_overwrites_without_validation() {
        let mut state = FilterState::new();
        state.set("season", "spring");
        state.set("season", "not-an-option");
        assert_eq!(state.get("season"), Some("not-an-option"));
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn missing_key_reads_as_none() {
        let state = FilterState::new();
        assert_eq!(state.get("season"), None);
        assert!(!state.contains_key("season"));
        assert!(state.is_empty());
    }

    #[test]
    fn snapshot_is_detached_from_store() {
        let mut state = FilterState::new();
        state.set("season", "spring");

        let mut snapshot = state.snapshot();
        snapshot.insert("season".into(), "winter".into());
        snapshot.insert("tag".into(), "forest".into());

        assert_eq!(state.get("season"), Some("spring"));
        assert!(!state.contains_key("tag"));
    }
}
