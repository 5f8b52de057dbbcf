//! # Data Model
//!
//! Plain value types shared by every layer of the engine:
//!
//! - [`NodeId`]: an opaque handle the host hands out for a node in its tree
//! - [`Attributes`]: the explicit filter-key → declared-value mapping of one element
//! - [`ElementSet`]: the tracked elements of one engine, in discovery order
//! - [`PassSummary`]: the counts produced by a single pass
//!
//! None of these types hold live references into the host. The matching
//! layer only ever sees [`Attributes`], never a node handle.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Opaque handle for a node owned by a [`crate::host::Host`].
pub type NodeId = usize;

/// The attribute declarations of one content element, keyed by filter key.
///
/// A key that is absent means the element does not take part in that
/// filter dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(BTreeMap<String, String>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the filter-key map from raw host attributes.
    ///
    /// Only attributes whose name starts with `prefix` take part; the prefix is
    /// stripped to obtain the filter key. An empty prefix keeps every attribute.
    pub fn from_raw<I, K, V>(raw: I, prefix: &str) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut attrs = Self::new();
        for (name, value) in raw {
            if let Some(key) = name.as_ref().strip_prefix(prefix) {
                if !key.is_empty() {
                    attrs.insert(key, value);
                }
            }
        }
        attrs
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// The declared value for `key`, or `None` when the element does not declare it.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut attrs = Self::new();
        for (k, v) in iter {
            attrs.insert(k, v);
        }
        attrs
    }
}

/// One element subject to filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedElement {
    pub node: NodeId,
    pub attributes: Attributes,
}

/// The tracked element set of an engine.
///
/// Membership is exactly the result of the last discovery scan. The set is
/// replaced wholesale on refresh and never patched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementSet {
    elements: Vec<TrackedElement>,
    nodes: Vec<NodeId>,
}

impl ElementSet {
    pub fn new(elements: Vec<TrackedElement>) -> Self {
        let nodes = elements.iter().map(|e| e.node).collect();
        Self { elements, nodes }
    }

    /// Read-only view of the element handles in discovery order.
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TrackedElement> {
        self.elements.iter()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// Counts produced by one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PassSummary {
    pub visible: usize,
    pub total: usize,
}

impl PassSummary {
    pub fn hidden(&self) -> usize {
        self.total - self.visible
    }

    pub fn is_empty(&self) -> bool {
        self.visible == 0
    }
}

/// Transition name for the element at `index` in discovery order.
pub fn transition_name(index: usize) -> String {
    format!("sift-item-{}", index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_strips_prefix_and_skips_others() {
        let raw = vec![
            ("data-season", "spring"),
            ("class", "card"),
            ("data-", "ignored"),
            ("data-tag", "forest meadow"),
        ];
        let attrs = Attributes::from_raw(raw, "data-");

        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs.get("season"), Some("spring"));
        assert_eq!(attrs.get("tag"), Some("forest meadow"));
        assert_eq!(attrs.get("class"), None);
    }

    #[test]
    fn from_raw_with_empty_prefix_keeps_everything() {
        let attrs = Attributes::from_raw(vec![("season", "spring"), ("id", "e1")], "");
        assert_eq!(attrs.get("season"), Some("spring"));
        assert_eq!(attrs.get("id"), Some("e1"));
    }

    #[test]
    fn element_set_preserves_discovery_order() {
        let set = ElementSet::new(vec![
            TrackedElement {
                node: 7,
                attributes: Attributes::new(),
            },
            TrackedElement {
                node: 3,
                attributes: Attributes::new(),
            },
        ]);
        assert_eq!(set.nodes(), &[7, 3]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn summary_hidden_count() {
        let summary = PassSummary {
            visible: 2,
            total: 5,
        };
        assert_eq!(summary.hidden(), 3);
        assert!(!summary.is_empty());
        assert!(PassSummary::default().is_empty());
    }

    #[test]
    fn transition_names_follow_index() {
        assert_eq!(transition_name(0), "sift-item-0");
        assert_eq!(transition_name(12), "sift-item-12");
    }
}
