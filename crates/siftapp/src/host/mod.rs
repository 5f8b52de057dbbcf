//! # Host Layer
//!
//! The engine never touches a rendering environment directly. Everything it
//! needs from one goes through the [`Host`] trait: resolving selectors,
//! reading attributes, toggling visibility, reading and writing controls, and
//! the optional transition wrapper.
//!
//! ## Implementations
//!
//! - [`document::MemDocument`]: an in-memory node tree with a small selector
//!   engine. Used by the CLI and by tests.
//! - `Rc<RefCell<H>>` for any `H: Host`: lets several engines share one
//!   document on a single thread (see [`crate::binding`]).
//!
//! ## Threading
//!
//! Hosts use `&mut self` for every mutation and are never shared across
//! threads. Engines over the same document share it through `Rc<RefCell<_>>`;
//! borrows are held only for the duration of one host call.

use crate::controls::ControlKind;
use crate::error::Result;
use crate::model::NodeId;
use std::cell::RefCell;
use std::rc::Rc;

pub mod document;
pub mod selector;

pub use document::{MemDocument, NodeSpec};
pub use selector::SelectorList;

/// Abstract interface to the hosting environment.
pub trait Host {
    // --- Discovery ---

    /// Resolve `selector` against the subtree below `scope` (the whole
    /// document when `None`), in document order. The scope node itself is
    /// not a candidate.
    fn select_all(&self, scope: Option<NodeId>, selector: &str) -> Result<Vec<NodeId>>;

    /// First match of `selector` below `scope`, if any.
    fn select_one(&self, scope: Option<NodeId>, selector: &str) -> Result<Option<NodeId>> {
        Ok(self.select_all(scope, selector)?.into_iter().next())
    }

    // --- Attributes ---

    /// The value of attribute `name` on `node`, or `None` if absent.
    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;

    /// Every attribute declared on `node`.
    fn attributes(&self, node: NodeId) -> Vec<(String, String)>;

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str);

    fn remove_attribute(&mut self, node: NodeId, name: &str);

    // --- Presentation ---

    /// Show or hide `node`. Hidden nodes must be excluded from layout.
    fn set_visible(&mut self, node: NodeId, visible: bool);

    fn set_text(&mut self, node: NodeId, text: &str);

    // --- Controls ---

    /// The control payload of `node`, or `None` if it is not a control.
    fn control(&self, node: NodeId) -> Option<ControlKind>;

    /// Programmatically overwrite a control's state. Does not queue a change
    /// notification.
    fn set_control(&mut self, node: NodeId, kind: &ControlKind);

    /// Subscribe to value changes of `node`.
    fn observe(&mut self, node: NodeId);

    /// Drain pending change notifications for the given controls, oldest
    /// first. Notifications for other nodes stay queued.
    fn take_changes(&mut self, nodes: &[NodeId]) -> Vec<NodeId>;

    // --- Environment ---

    /// Whether passes can be wrapped in an animated transition.
    fn transitions_supported(&self) -> bool {
        false
    }

    fn begin_transition(&mut self) {}

    fn finish_transition(&mut self) {}

    fn install_stylesheet(&mut self, _css: &str) {}
}

impl<H: Host> Host for Rc<RefCell<H>> {
    fn select_all(&self, scope: Option<NodeId>, selector: &str) -> Result<Vec<NodeId>> {
        self.borrow().select_all(scope, selector)
    }

    fn select_one(&self, scope: Option<NodeId>, selector: &str) -> Result<Option<NodeId>> {
        self.borrow().select_one(scope, selector)
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.borrow().attribute(node, name)
    }

    fn attributes(&self, node: NodeId) -> Vec<(String, String)> {
        self.borrow().attributes(node)
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        self.borrow_mut().set_attribute(node, name, value)
    }

    fn remove_attribute(&mut self, node: NodeId, name: &str) {
        self.borrow_mut().remove_attribute(node, name)
    }

    fn set_visible(&mut self, node: NodeId, visible: bool) {
        self.borrow_mut().set_visible(node, visible)
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        self.borrow_mut().set_text(node, text)
    }

    fn control(&self, node: NodeId) -> Option<ControlKind> {
        self.borrow().control(node)
    }

    fn set_control(&mut self, node: NodeId, kind: &ControlKind) {
        self.borrow_mut().set_control(node, kind)
    }

    fn observe(&mut self, node: NodeId) {
        self.borrow_mut().observe(node)
    }

    fn take_changes(&mut self, nodes: &[NodeId]) -> Vec<NodeId> {
        self.borrow_mut().take_changes(nodes)
    }

    fn transitions_supported(&self) -> bool {
        self.borrow().transitions_supported()
    }

    fn begin_transition(&mut self) {
        self.borrow_mut().begin_transition()
    }

    fn finish_transition(&mut self) {
        self.borrow_mut().finish_transition()
    }

    fn install_stylesheet(&mut self, css: &str) {
        self.borrow_mut().install_stylesheet(css)
    }
}
