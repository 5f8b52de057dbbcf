//! Declarative auto-binding.
//!
//! Containers opt in with `data-filter-target`; everything else an engine
//! needs can be declared next to it:
//!
//! ```text
//! <section data-filter-target=".card"
//!          data-filter-status="#count"
//!          data-filter-all="any"
//!          data-filter-mode="contains">
//! ```
//!
//! Each container gets one engine scoped to its own subtree. Bound containers
//! are marked so a second scan leaves them alone. A scan that fails marks
//! nothing.

use crate::config::SiftConfig;
use crate::engine::FilterEngine;
use crate::error::Result;
use crate::host::Host;
use crate::matching::MatchMode;
use crate::model::NodeId;
use crate::options::FilterOptions;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, warn};

pub const TARGET_ATTR: &str = "data-filter-target";
pub const STATUS_ATTR: &str = "data-filter-status";
pub const EMPTY_ATTR: &str = "data-filter-empty";
pub const ALL_ATTR: &str = "data-filter-all";
pub const MODE_ATTR: &str = "data-filter-mode";
pub const BOUND_ATTR: &str = "data-filter-bound";

/// A host shared by every engine bound on it.
pub type SharedHost<H> = Rc<RefCell<H>>;

/// Bind an engine to every unbound container in the document.
///
/// `base` supplies whatever a container does not declare.
pub fn bind_all<H: Host>(
    host: &SharedHost<H>,
    base: &SiftConfig,
) -> Result<Vec<FilterEngine<SharedHost<H>>>> {
    let containers = host.select_all(None, &format!("[{}]", TARGET_ATTR))?;
    let mut engines = Vec::new();

    for container in containers {
        if host.attribute(container, BOUND_ATTR).is_some() {
            debug!(container, "container already bound");
            continue;
        }
        let Some(options) = container_options(host, container, base) else {
            warn!(container, "container has an empty {} attribute; skipped", TARGET_ATTR);
            continue;
        };

        engines.push(FilterEngine::with_root(Rc::clone(host), container, options)?);
    }

    // A failed scan marks nothing.
    for engine in &engines {
        if let Some(container) = engine.root() {
            host.borrow_mut().set_attribute(container, BOUND_ATTR, "true");
        }
    }

    debug!(bound = engines.len(), "auto-binding complete");
    Ok(engines)
}

/// Options declared on `container`, or `None` when it names no target.
fn container_options<H: Host>(
    host: &SharedHost<H>,
    container: NodeId,
    base: &SiftConfig,
) -> Option<FilterOptions> {
    let host = host.borrow();
    let declared = |name: &str| host.attribute(container, name).filter(|v| !v.trim().is_empty());

    let items = declared(TARGET_ATTR)?;
    let mut config = SiftConfig {
        items: Some(items),
        root: None,
        ..base.clone()
    };
    if let Some(status) = declared(STATUS_ATTR) {
        config.status = Some(status);
    }
    if let Some(empty) = declared(EMPTY_ATTR) {
        config.no_results = empty;
    }
    if let Some(all) = declared(ALL_ATTR) {
        config.all_value = all;
    }
    if let Some(mode) = declared(MODE_ATTR) {
        match mode.parse::<MatchMode>() {
            Ok(mode) => config.match_mode = mode,
            Err(err) => warn!(container, %err, "ignoring {}", MODE_ATTR),
        }
    }
    Some(FilterOptions::from_config(&config))
}
