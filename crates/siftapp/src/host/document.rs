//! In-memory document host.
//!
//! A small node tree that implements [`Host`] without any rendering
//! environment. Nodes live in an arena indexed by [`NodeId`]; removing a node
//! detaches it from its parent so it is no longer reachable by selectors,
//! but its handle stays valid.
//!
//! Documents can be built programmatically or loaded from JSON:
//!
//! ```json
//! {
//!   "tag": "main",
//!   "children": [
//!     { "tag": "select", "attrs": { "name": "season", "data-filter-control": "" },
//!       "control": { "kind": "select", "options": ["all", "spring"], "selected": 0 } },
//!     { "tag": "article", "attrs": { "class": "card", "data-season": "spring" } }
//!   ]
//! }
//! ```

use super::selector::{SelectorList, SelectorTarget};
use super::Host;
use crate::controls::ControlKind;
use crate::error::{Result, SiftError};
use crate::model::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::path::Path;

/// Attribute that marks a node as hidden (excluded from layout).
pub const HIDDEN_ATTR: &str = "hidden";

/// Serializable description of a node and its subtree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub tag: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control: Option<ControlKind>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSpec>,
}

impl NodeSpec {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn control(mut self, kind: ControlKind) -> Self {
        self.control = Some(kind);
        self
    }

    pub fn child(mut self, child: NodeSpec) -> Self {
        self.children.push(child);
        self
    }
}

#[derive(Debug, Clone)]
struct Node {
    tag: String,
    attrs: BTreeMap<String, String>,
    text: String,
    control: Option<ControlKind>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// In-memory document implementing [`Host`].
///
/// Single-threaded: shared between engines through `Rc<RefCell<_>>`.
#[derive(Debug, Clone)]
pub struct MemDocument {
    nodes: Vec<Node>,
    observed: BTreeSet<NodeId>,
    pending: VecDeque<NodeId>,
    stylesheets: Vec<String>,
    transitions: bool,
    in_transition: bool,
    transition_count: usize,
}

impl Default for MemDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemDocument {
    /// The root node handle.
    pub const ROOT: NodeId = 0;

    /// An empty document whose root is a `<body>` element.
    pub fn new() -> Self {
        Self::from_spec(NodeSpec::new("body"))
    }

    pub fn from_spec(spec: NodeSpec) -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            observed: BTreeSet::new(),
            pending: VecDeque::new(),
            stylesheets: Vec::new(),
            transitions: false,
            in_transition: false,
            transition_count: 0,
        };
        doc.insert_subtree(None, spec);
        doc
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let spec: NodeSpec = serde_json::from_str(json)?;
        Ok(Self::from_spec(spec))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Enables or disables animated transition support.
    pub fn with_transitions(mut self, enabled: bool) -> Self {
        self.transitions = enabled;
        self
    }

    pub fn root(&self) -> NodeId {
        Self::ROOT
    }

    /// Appends `spec` (and its subtree) as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, spec: NodeSpec) -> Result<NodeId> {
        self.node(parent)?;
        Ok(self.insert_subtree(Some(parent), spec))
    }

    /// Detaches `node` from its parent. The root cannot be removed.
    pub fn remove(&mut self, node: NodeId) -> Result<()> {
        if node == Self::ROOT {
            return Err(SiftError::Document("cannot remove the root node".to_string()));
        }
        let parent = self.node(node)?.parent;
        if let Some(parent) = parent {
            self.nodes[parent].children.retain(|&c| c != node);
        }
        self.nodes[node].parent = None;
        Ok(())
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(node).map(|n| n.tag.as_str())
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.nodes.get(node)?.attrs.get(name).map(String::as_str)
    }

    pub fn text(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(node).map(|n| n.text.as_str())
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes.get(node).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Whether `node` is shown. Unknown nodes are reported hidden.
    pub fn is_visible(&self, node: NodeId) -> bool {
        self.nodes
            .get(node)
            .is_some_and(|n| !n.attrs.contains_key(HIDDEN_ATTR))
    }

    /// First match of `selector` anywhere in the document.
    pub fn find(&self, selector: &str) -> Result<Option<NodeId>> {
        self.select_one(None, selector)
    }

    /// Applies `update` to the control at `node`, as a user interaction would,
    /// and queues a change notification if the control is observed.
    pub fn update_control<F>(&mut self, node: NodeId, update: F) -> Result<()>
    where
        F: FnOnce(&mut ControlKind),
    {
        let control = self
            .nodes
            .get_mut(node)
            .and_then(|n| n.control.as_mut())
            .ok_or_else(|| SiftError::Document(format!("node {} is not a control", node)))?;
        update(control);
        if self.observed.contains(&node) {
            self.pending.push_back(node);
        }
        Ok(())
    }

    /// Sets the control at `node` to report `value`.
    ///
    /// Returns `Ok(false)` without queuing a change when the control cannot
    /// represent `value`.
    pub fn set_control_value(&mut self, node: NodeId, value: &str, all_value: &str) -> Result<bool> {
        let mut accepted = false;
        let mut kind = self
            .control(node)
            .ok_or_else(|| SiftError::Document(format!("node {} is not a control", node)))?;
        if kind.set_value(value, all_value) {
            accepted = true;
            self.update_control(node, |c| *c = kind)?;
        }
        Ok(accepted)
    }

    pub fn is_observed(&self, node: NodeId) -> bool {
        self.observed.contains(&node)
    }

    pub fn pending_changes(&self) -> usize {
        self.pending.len()
    }

    pub fn stylesheets(&self) -> &[String] {
        &self.stylesheets
    }

    /// Number of passes that ran inside a transition wrapper.
    pub fn transition_count(&self) -> usize {
        self.transition_count
    }

    pub fn in_transition(&self) -> bool {
        self.in_transition
    }

    /// Serializes the current tree back into a [`NodeSpec`].
    pub fn to_spec(&self) -> NodeSpec {
        self.spec_of(Self::ROOT)
    }

    fn spec_of(&self, id: NodeId) -> NodeSpec {
        let node = &self.nodes[id];
        NodeSpec {
            tag: node.tag.clone(),
            attrs: node.attrs.clone(),
            text: node.text.clone(),
            control: node.control.clone(),
            children: node.children.iter().map(|&c| self.spec_of(c)).collect(),
        }
    }

    fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes
            .get(id)
            .ok_or_else(|| SiftError::Document(format!("unknown node {}", id)))
    }

    fn insert_subtree(&mut self, parent: Option<NodeId>, spec: NodeSpec) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node {
            tag: spec.tag.to_ascii_lowercase(),
            attrs: spec.attrs,
            text: spec.text,
            control: spec.control,
            parent,
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            self.nodes[parent].children.push(id);
        }
        for child in spec.children {
            self.insert_subtree(Some(id), child);
        }
        id
    }

    /// Descendants of `node` in document (pre-)order.
    fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev());
        }
        out
    }
}

impl SelectorTarget for MemDocument {
    fn tag(&self, node: NodeId) -> Option<&str> {
        MemDocument::tag(self, node)
    }

    fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        MemDocument::attr(self, node, name)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node)?.parent
    }
}

impl Host for MemDocument {
    fn select_all(&self, scope: Option<NodeId>, selector: &str) -> Result<Vec<NodeId>> {
        let list = SelectorList::parse(selector)?;
        let candidates = match scope {
            Some(scope) => {
                self.node(scope)?;
                self.descendants(scope)
            }
            None => {
                let mut all = vec![Self::ROOT];
                all.extend(self.descendants(Self::ROOT));
                all
            }
        };
        Ok(candidates
            .into_iter()
            .filter(|&id| list.matches(self, id))
            .collect())
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.attr(node, name).map(str::to_string)
    }

    fn attributes(&self, node: NodeId) -> Vec<(String, String)> {
        self.nodes
            .get(node)
            .map(|n| n.attrs.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default()
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.attrs.insert(name.to_string(), value.to_string());
        }
    }

    fn remove_attribute(&mut self, node: NodeId, name: &str) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.attrs.remove(name);
        }
    }

    fn set_visible(&mut self, node: NodeId, visible: bool) {
        if visible {
            self.remove_attribute(node, HIDDEN_ATTR);
        } else {
            self.set_attribute(node, HIDDEN_ATTR, "");
        }
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.text = text.to_string();
        }
    }

    fn control(&self, node: NodeId) -> Option<ControlKind> {
        self.nodes.get(node)?.control.clone()
    }

    fn set_control(&mut self, node: NodeId, kind: &ControlKind) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.control = Some(kind.clone());
        }
    }

    fn observe(&mut self, node: NodeId) {
        self.observed.insert(node);
    }

    fn take_changes(&mut self, nodes: &[NodeId]) -> Vec<NodeId> {
        let (taken, rest): (VecDeque<NodeId>, VecDeque<NodeId>) =
            self.pending.drain(..).partition(|n| nodes.contains(n));
        self.pending = rest;
        taken.into()
    }

    fn transitions_supported(&self) -> bool {
        self.transitions
    }

    fn begin_transition(&mut self) {
        self.in_transition = true;
        self.transition_count += 1;
    }

    fn finish_transition(&mut self) {
        self.in_transition = false;
    }

    fn install_stylesheet(&mut self, css: &str) {
        self.stylesheets.push(css.to_string());
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;

    /// Builds a document with a filter panel, a grid of items, a status line
    /// and a no-results marker:
    ///
    /// ```text
    /// body
    /// ├── form#filters        (controls)
    /// ├── div#grid            (items, class "card")
    /// ├── p#status
    /// └── p[data-filter-no-results]
    /// ```
    pub struct DocumentFixture {
        pub doc: MemDocument,
        pub filters: NodeId,
        pub grid: NodeId,
        pub status: NodeId,
        pub no_results: NodeId,
        pub controls: Vec<NodeId>,
        pub items: Vec<NodeId>,
    }

    impl Default for DocumentFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl DocumentFixture {
        pub fn new() -> Self {
            let mut doc = MemDocument::new();
            let root = doc.root();
            let filters = doc.append(root, NodeSpec::new("form").attr("id", "filters")).unwrap();
            let grid = doc.append(root, NodeSpec::new("div").attr("id", "grid")).unwrap();
            let status = doc.append(root, NodeSpec::new("p").attr("id", "status")).unwrap();
            let no_results = doc
                .append(root, NodeSpec::new("p").attr("data-filter-no-results", ""))
                .unwrap();
            Self {
                doc,
                filters,
                grid,
                status,
                no_results,
                controls: Vec::new(),
                items: Vec::new(),
            }
        }

        pub fn with_control(mut self, name: &str, kind: ControlKind) -> Self {
            let tag = match &kind {
                ControlKind::Select { .. } => "select",
                _ => "input",
            };
            let id = self
                .doc
                .append(
                    self.filters,
                    NodeSpec::new(tag)
                        .attr("name", name)
                        .attr("data-filter-control", "")
                        .control(kind),
                )
                .unwrap();
            self.controls.push(id);
            self
        }

        pub fn with_select(self, name: &str, options: &[&str], selected: Option<usize>) -> Self {
            self.with_control(name, ControlKind::select(options.iter().copied(), selected))
        }

        pub fn with_item(mut self, attrs: &[(&str, &str)]) -> Self {
            let mut spec = NodeSpec::new("article").attr("class", "card");
            for (key, value) in attrs {
                spec = spec.attr(format!("data-{}", key), *value);
            }
            let id = self.doc.append(self.grid, spec).unwrap();
            self.items.push(id);
            self
        }

        pub fn visible_items(&self) -> Vec<NodeId> {
            self.items
                .iter()
                .copied()
                .filter(|&id| self.doc.is_visible(id))
                .collect()
        }
    }
}
