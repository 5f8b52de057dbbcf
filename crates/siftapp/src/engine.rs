//! # Filter Engine
//!
//! The lifecycle controller. A [`FilterEngine`] owns one discovery scope of a
//! host: its tracked elements, its controls and the filter state they feed.
//!
//! ## Lifecycle
//!
//! ```text
//! new() ──discover, register, first pass──▶ Ready ◀──┐
//!                                             │      │
//!              update_filter / pump / refresh_elements / reset
//! ```
//!
//! Every transition back into `Ready` ends with a settled pass. There is no
//! terminal state; the owner drops the engine when done.
//!
//! ## Change handling
//!
//! Controls are observed at construction. The owner drives change delivery by
//! calling [`FilterEngine::pump`] (or [`FilterEngine::handle_change`] for a
//! single control). Each change runs one pass, in the order the changes were
//! queued. When the host supports transitions the pass runs inside one; the
//! result is the same either way.
//!
//! One engine per scope: two engines over the same elements would fight over
//! their visibility. [`crate::binding`] guards this with a marker attribute.

use crate::controls::Control;
use crate::error::{Result, SiftError};
use crate::host::Host;
use crate::matching::Matcher;
use crate::model::{transition_name, Attributes, ElementSet, NodeId, PassSummary, TrackedElement};
use crate::options::FilterOptions;
use crate::pass::{self, SideEffects};
use crate::state::{FilterSnapshot, FilterState};
use tracing::{debug, info, warn};

/// Attribute carrying an element's transition name.
pub const TRANSITION_ATTR: &str = "data-transition-name";

pub struct FilterEngine<H: Host> {
    host: H,
    root: Option<NodeId>,
    items: String,
    attribute_prefix: String,
    transitions: bool,
    matcher: Matcher,
    elements: ElementSet,
    controls: Vec<Control>,
    state: FilterState,
    effects: SideEffects,
    last: PassSummary,
}

impl<H: Host> FilterEngine<H> {
    /// Construct an engine, scoped to the options' root selector (or the
    /// whole document), and run the first pass.
    pub fn new(host: H, options: FilterOptions) -> Result<Self> {
        validate(&options)?;
        let root = resolve_target(&host, None, options.root.as_deref(), "root");
        Self::build(host, root, options)
    }

    /// Construct an engine scoped to the subtree below `root`.
    pub fn with_root(host: H, root: NodeId, options: FilterOptions) -> Result<Self> {
        validate(&options)?;
        Self::build(host, Some(root), options)
    }

    fn build(mut host: H, root: Option<NodeId>, options: FilterOptions) -> Result<Self> {
        let FilterOptions {
            items,
            controls: controls_selector,
            status,
            no_results,
            root: _,
            all_value,
            match_mode,
            attribute_prefix,
            transitions,
            formatter,
            before,
            after,
        } = options;

        let elements = discover(&mut host, root, &items, &attribute_prefix, transitions)?;
        let controls = discover_controls(&host, root, &controls_selector);

        let mut effects = SideEffects::new(formatter);
        effects.status = resolve_target(&host, root, status.as_deref(), "status");
        effects.no_results = resolve_target(&host, root, no_results.as_deref(), "no-results");
        effects.before = before;
        effects.after = after;

        let mut state = FilterState::new();
        for control in &controls {
            state.set(control.key.as_str(), control.kind.current_value(&all_value));
            host.observe(control.node);
        }
        wire_accessibility(&mut host, &controls, effects.status, effects.no_results);

        let mut engine = Self {
            host,
            root,
            items,
            attribute_prefix,
            transitions,
            matcher: Matcher::new(match_mode, all_value),
            elements,
            controls,
            state,
            effects,
            last: PassSummary::default(),
        };
        engine.last = engine.run_pass()?;
        info!(
            items = %engine.items,
            elements = engine.elements.len(),
            controls = engine.controls.len(),
            visible = engine.last.visible,
            "filter engine ready"
        );
        Ok(engine)
    }

    /// Set `key` to `value` and run a pass.
    ///
    /// Keys need not belong to a control; an unknown key is registered.
    pub fn update_filter(&mut self, key: &str, value: &str) -> Result<PassSummary> {
        debug!(key, value, "filter updated");
        self.state.set(key, value);
        self.schedule_pass()
    }

    /// React to a value change of the control at `node`.
    ///
    /// Returns `Ok(None)` when `node` is not one of this engine's controls.
    pub fn handle_change(&mut self, node: NodeId) -> Result<Option<PassSummary>> {
        let Some(index) = self.controls.iter().position(|c| c.node == node) else {
            return Ok(None);
        };
        let Some(kind) = self.host.control(node) else {
            warn!(node, "observed control lost its payload; change ignored");
            return Ok(None);
        };
        let value = kind.current_value(self.matcher.all_value());
        let key = self.controls[index].key.clone();
        self.controls[index].kind = kind;
        self.update_filter(&key, &value).map(Some)
    }

    /// Deliver every pending change notification for this engine's controls.
    ///
    /// Returns the number of passes that ran.
    pub fn pump(&mut self) -> Result<usize> {
        let nodes: Vec<NodeId> = self.controls.iter().map(|c| c.node).collect();
        let mut passes = 0;
        for node in self.host.take_changes(&nodes) {
            if self.handle_change(node)?.is_some() {
                passes += 1;
            }
        }
        Ok(passes)
    }

    /// Rebuild the tracked element set from scratch and run a pass.
    pub fn refresh_elements(&mut self) -> Result<PassSummary> {
        self.elements = discover(
            &mut self.host,
            self.root,
            &self.items,
            &self.attribute_prefix,
            self.transitions,
        )?;
        debug!(elements = self.elements.len(), "elements rediscovered");
        self.last = self.run_pass()?;
        Ok(self.last)
    }

    /// Restore every control to its neutral selection, then run one pass.
    ///
    /// Keys no control owns fall back to the match-all sentinel.
    pub fn reset(&mut self) -> Result<PassSummary> {
        let all_value = self.matcher.all_value().to_string();
        let mut values: Vec<(String, String)> = self
            .state
            .iter()
            .map(|(key, _)| (key.to_string(), all_value.clone()))
            .collect();
        for control in &mut self.controls {
            // The host may have replaced the options without notifying us.
            if let Some(live) = self.host.control(control.node) {
                control.kind = live;
            }
            let value = control.kind.reset_to_neutral(&all_value);
            self.host.set_control(control.node, &control.kind);
            values.push((control.key.clone(), value));
        }
        for (key, value) in values {
            self.state.set(key, value);
        }
        debug!(controls = self.controls.len(), "controls reset");
        self.schedule_pass()
    }

    pub fn state(&self) -> FilterSnapshot {
        self.state.snapshot()
    }

    pub fn elements(&self) -> &[NodeId] {
        self.elements.nodes()
    }

    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    pub fn status_target(&self) -> Option<NodeId> {
        self.effects.status
    }

    pub fn no_results_target(&self) -> Option<NodeId> {
        self.effects.no_results
    }

    /// Counts from the most recent completed pass.
    pub fn last_summary(&self) -> PassSummary {
        self.last
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    /// Run a pass, inside a transition when the host offers one.
    fn schedule_pass(&mut self) -> Result<PassSummary> {
        let wrapped = self.transitions && self.host.transitions_supported();
        if wrapped {
            self.host.begin_transition();
        }
        let outcome = self.run_pass();
        if wrapped {
            self.host.finish_transition();
        }
        self.last = outcome?;
        Ok(self.last)
    }

    fn run_pass(&mut self) -> Result<PassSummary> {
        pass::run(
            &mut self.host,
            &self.elements,
            &self.state,
            &self.matcher,
            &mut self.effects,
        )
    }
}

impl<H: Host + std::fmt::Debug> std::fmt::Debug for FilterEngine<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterEngine")
            .field("root", &self.root)
            .field("items", &self.items)
            .field("elements", &self.elements.len())
            .field("controls", &self.controls)
            .field("state", &self.state)
            .field("last", &self.last)
            .finish_non_exhaustive()
    }
}

fn validate(options: &FilterOptions) -> Result<()> {
    if options.items.trim().is_empty() {
        return Err(SiftError::MissingItemsSelector);
    }
    Ok(())
}

/// Resolve the element selector into a fresh tracked set.
fn discover<H: Host>(
    host: &mut H,
    root: Option<NodeId>,
    selector: &str,
    prefix: &str,
    transitions: bool,
) -> Result<ElementSet> {
    let nodes = host.select_all(root, selector)?;
    let name_transitions = transitions && host.transitions_supported();

    let mut elements = Vec::with_capacity(nodes.len());
    for (index, node) in nodes.into_iter().enumerate() {
        let attributes = Attributes::from_raw(host.attributes(node), prefix);
        if name_transitions {
            host.set_attribute(node, TRANSITION_ATTR, &transition_name(index));
        }
        elements.push(TrackedElement { node, attributes });
    }
    Ok(ElementSet::new(elements))
}

fn discover_controls<H: Host>(host: &H, root: Option<NodeId>, selector: &str) -> Vec<Control> {
    let nodes = match host.select_all(root, selector) {
        Ok(nodes) => nodes,
        Err(err) => {
            warn!(selector, error = %err, "controls selector unusable; no controls registered");
            return Vec::new();
        }
    };

    nodes
        .into_iter()
        .filter_map(|node| {
            let kind = host.control(node)?;
            match host.attribute(node, "name").filter(|n| !n.is_empty()) {
                Some(key) => Some(Control { node, key, kind }),
                None => {
                    debug!(node, "control without a name skipped");
                    None
                }
            }
        })
        .collect()
}

/// Resolve an auxiliary selector. A miss disables the feature it serves.
fn resolve_target<H: Host>(
    host: &H,
    scope: Option<NodeId>,
    selector: Option<&str>,
    target: &str,
) -> Option<NodeId> {
    let selector = selector.map(str::trim).filter(|s| !s.is_empty())?;
    match host.select_one(scope, selector) {
        Ok(Some(node)) => Some(node),
        Ok(None) => {
            debug!(selector, target, "selector matched nothing; feature disabled");
            None
        }
        Err(err) => {
            warn!(selector, target, error = %err, "selector unusable; feature disabled");
            None
        }
    }
}

fn wire_accessibility<H: Host>(
    host: &mut H,
    controls: &[Control],
    status: Option<NodeId>,
    no_results: Option<NodeId>,
) {
    for target in [status, no_results].into_iter().flatten() {
        host.set_attribute(target, "aria-live", "polite");
    }
    let Some(status) = status else {
        return;
    };
    host.set_attribute(status, "role", "status");
    if let Some(id) = host.attribute(status, "id").filter(|id| !id.is_empty()) {
        for control in controls {
            host.set_attribute(control.node, "aria-controls", &id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::ControlKind;
    use crate::error::HookStage;
    use crate::host::document::fixtures::DocumentFixture;
    use crate::host::{MemDocument, NodeSpec};
    use crate::matching::MatchMode;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn seasons() -> DocumentFixture {
        DocumentFixture::new()
            .with_select("season", &["all", "spring", "summer"], Some(0))
            .with_item(&[("season", "spring")])
            .with_item(&[("season", "summer")])
    }

    fn options() -> FilterOptions {
        FilterOptions::new(".card").with_status("#status")
    }

    fn visible(engine: &FilterEngine<MemDocument>) -> Vec<NodeId> {
        engine
            .elements()
            .iter()
            .copied()
            .filter(|&id| engine.host().is_visible(id))
            .collect()
    }

    #[test]
    fn missing_items_selector_is_fatal() {
        let fx = seasons();
        let err = FilterEngine::new(fx.doc, FilterOptions::new("   ")).unwrap_err();
        assert!(matches!(err, SiftError::MissingItemsSelector));
    }

    #[test]
    fn invalid_items_selector_is_fatal() {
        let fx = seasons();
        let err = FilterEngine::new(fx.doc, FilterOptions::new(".card[")).unwrap_err();
        assert!(matches!(err, SiftError::InvalidSelector { .. }));
    }

    #[test]
    fn construction_registers_controls_and_runs_first_pass() {
        let fx = seasons();
        let (status, control) = (fx.status, fx.controls[0]);
        let engine = FilterEngine::new(fx.doc, options()).unwrap();

        assert_eq!(engine.state().get("season").map(String::as_str), Some("all"));
        assert_eq!(engine.last_summary(), PassSummary { visible: 2, total: 2 });
        assert_eq!(engine.host().text(status), Some("2 results found"));
        assert!(engine.host().is_observed(control));
    }

    #[test]
    fn indeterminate_control_registers_sentinel() {
        let fx = DocumentFixture::new()
            .with_select("season", &["spring", "summer"], None)
            .with_item(&[("season", "spring")]);
        let engine = FilterEngine::new(fx.doc, options().with_all_value("any")).unwrap();
        assert_eq!(engine.state().get("season").map(String::as_str), Some("any"));
        assert_eq!(engine.last_summary().visible, 1);
    }

    #[test]
    fn initial_control_value_filters_first_pass() {
        let fx = DocumentFixture::new()
            .with_select("season", &["all", "spring", "summer"], Some(2))
            .with_item(&[("season", "spring")])
            .with_item(&[("season", "summer")]);
        let summer = fx.items[1];
        let engine = FilterEngine::new(fx.doc, options()).unwrap();
        assert_eq!(visible(&engine), vec![summer]);
    }

    #[test]
    fn update_filter_scenario() {
        let fx = seasons();
        let (spring, summer) = (fx.items[0], fx.items[1]);
        let mut engine = FilterEngine::new(fx.doc, options()).unwrap();

        let summary = engine.update_filter("season", "spring").unwrap();
        assert_eq!(summary.visible, 1);
        assert_eq!(visible(&engine), vec![spring]);

        let summary = engine.update_filter("season", "all").unwrap();
        assert_eq!(summary.visible, 2);
        assert_eq!(visible(&engine), vec![spring, summer]);
    }

    #[test]
    fn update_filter_registers_unknown_key() {
        let fx = seasons().with_item(&[("tag", "forest")]);
        let mut engine = FilterEngine::new(fx.doc, options()).unwrap();

        let summary = engine.update_filter("tag", "water").unwrap();
        // Both season cards lack a tag and stay visible.
        assert_eq!(summary, PassSummary { visible: 2, total: 3 });
        assert!(engine.state().contains_key("tag"));
    }

    #[test]
    fn pump_delivers_control_changes_in_order() {
        let fx = seasons();
        let control = fx.controls[0];
        let spring = fx.items[0];
        let mut engine = FilterEngine::new(fx.doc, options()).unwrap();

        engine.host_mut().set_control_value(control, "summer", "all").unwrap();
        engine.host_mut().set_control_value(control, "spring", "all").unwrap();
        assert_eq!(engine.pump().unwrap(), 2);

        assert_eq!(visible(&engine), vec![spring]);
        assert_eq!(engine.controls()[0].kind.current_value("all"), "spring");
        assert_eq!(engine.pump().unwrap(), 0);
    }

    #[test]
    fn handle_change_ignores_foreign_nodes() {
        let fx = seasons();
        let grid = fx.grid;
        let mut engine = FilterEngine::new(fx.doc, options()).unwrap();
        assert_eq!(engine.handle_change(grid).unwrap(), None);
    }

    #[test]
    fn changes_run_inside_transitions_when_supported() {
        let mut fx = seasons();
        fx.doc = fx.doc.with_transitions(true);
        let control = fx.controls[0];
        let items = fx.items.clone();
        let mut engine = FilterEngine::new(fx.doc, options()).unwrap();

        assert_eq!(engine.host().transition_count(), 0);
        assert_eq!(engine.host().attr(items[1], TRANSITION_ATTR), Some("sift-item-1"));

        engine.host_mut().set_control_value(control, "spring", "all").unwrap();
        engine.pump().unwrap();
        assert_eq!(engine.host().transition_count(), 1);
        assert!(!engine.host().in_transition());
    }

    #[test]
    fn transitions_can_be_disabled() {
        let mut fx = seasons();
        fx.doc = fx.doc.with_transitions(true);
        let item = fx.items[0];
        let mut engine = FilterEngine::new(fx.doc, options().with_transitions(false)).unwrap();

        engine.update_filter("season", "spring").unwrap();
        assert_eq!(engine.host().transition_count(), 0);
        assert_eq!(engine.host().attr(item, TRANSITION_ATTR), None);
    }

    #[test]
    fn refresh_picks_up_added_and_removed_elements() {
        let fx = seasons();
        let (grid, spring) = (fx.grid, fx.items[0]);
        let mut engine = FilterEngine::new(fx.doc, options()).unwrap();
        engine.update_filter("season", "spring").unwrap();

        let added = engine
            .host_mut()
            .append(grid, NodeSpec::new("article").attr("class", "card").attr("data-season", "spring"))
            .unwrap();
        engine.host_mut().remove(spring).unwrap();

        let summary = engine.refresh_elements().unwrap();
        assert_eq!(summary, PassSummary { visible: 1, total: 2 });
        assert_eq!(visible(&engine), vec![added]);
        assert!(!engine.elements().contains(&spring));
    }

    #[test]
    fn reset_restores_neutral_controls_with_one_pass() {
        let fx = DocumentFixture::new()
            .with_select("season", &["all", "spring", "summer"], Some(1))
            .with_control("region", ControlKind::radio(["north", "south"], Some(1)))
            .with_control("featured", ControlKind::toggle("yes", true))
            .with_control("q", ControlKind::text("meadow"))
            .with_item(&[("season", "spring"), ("region", "north")])
            .with_item(&[("season", "summer"), ("region", "south")]);
        let controls = fx.controls.clone();

        let passes = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&passes);
        let opts = options().on_after(move |_| {
            *counter.borrow_mut() += 1;
            Ok(())
        });
        let mut engine = FilterEngine::new(fx.doc, opts).unwrap();
        *passes.borrow_mut() = 0;

        engine.reset().unwrap();

        assert_eq!(*passes.borrow(), 1);
        let state = engine.state();
        assert_eq!(state["season"], "all");
        assert_eq!(state["region"], "north");
        assert_eq!(state["featured"], "all");
        assert_eq!(state["q"], "all");
        assert_eq!(state.len(), 4);

        let host = engine.host();
        assert_eq!(host.control(controls[0]), Some(ControlKind::select(["all", "spring", "summer"], Some(0))));
        assert_eq!(host.control(controls[2]), Some(ControlKind::toggle("yes", false)));
        assert_eq!(host.control(controls[3]), Some(ControlKind::text("")));
        // Reset writes controls programmatically; no change notifications queue up.
        assert_eq!(host.pending_changes(), 0);
    }

    #[test]
    fn reset_uses_the_live_control_options() {
        let fx = DocumentFixture::new()
            .with_select("season", &["spring", "summer"], Some(1))
            .with_item(&[("season", "spring")])
            .with_item(&[("season", "summer")]);
        let select = fx.controls[0];
        let mut engine = FilterEngine::new(fx.doc, options()).unwrap();
        assert_eq!(engine.state()["season"], "summer");

        let widened = ControlKind::select(["all", "spring", "summer"], Some(2));
        engine.host_mut().set_control(select, &widened);
        let summary = engine.reset().unwrap();

        assert_eq!(engine.state()["season"], "all");
        assert_eq!(summary.visible, 2);
        assert_eq!(
            engine.host().control(select),
            Some(ControlKind::select(["all", "spring", "summer"], Some(0)))
        );
    }

    #[test]
    fn reset_matches_fresh_unfiltered_engine() {
        let build = || {
            DocumentFixture::new()
                .with_select("season", &["all", "spring", "summer"], Some(0))
                .with_item(&[("season", "spring")])
                .with_item(&[("season", "summer")])
                .with_item(&[])
        };

        let fresh = FilterEngine::new(build().doc, options()).unwrap();
        let mut used = FilterEngine::new(build().doc, options()).unwrap();
        used.update_filter("season", "summer").unwrap();
        used.update_filter("tag", "forest").unwrap();
        let summary = used.reset().unwrap();

        assert_eq!(used.state().get("tag").map(String::as_str), Some("all"));
        assert_eq!(summary, fresh.last_summary());
        assert_eq!(visible(&used), visible(&fresh));
    }

    #[test]
    fn custom_selectors_and_attribute_prefix() {
        let doc = MemDocument::from_spec(
            NodeSpec::new("body")
                .child(
                    NodeSpec::new("select")
                        .attr("name", "season")
                        .attr("data-facet", "")
                        .control(ControlKind::select(["all", "spring", "summer"], Some(2))),
                )
                .child(
                    NodeSpec::new("select")
                        .attr("name", "mood")
                        .attr("data-filter-control", "")
                        .control(ControlKind::select(["calm"], Some(0))),
                )
                .child(NodeSpec::new("li").attr("class", "entry").attr("x-season", "spring"))
                .child(
                    NodeSpec::new("li")
                        .attr("class", "entry")
                        .attr("x-season", "summer")
                        .attr("data-season", "spring"),
                )
                .child(NodeSpec::new("li").attr("class", "card").attr("x-season", "summer")),
        );
        let opts = FilterOptions::new(".card")
            .with_items("li.entry")
            .with_controls("[data-facet]")
            .with_attribute_prefix("x-");
        let engine = FilterEngine::new(doc, opts).unwrap();

        assert_eq!(engine.elements().len(), 2);
        assert_eq!(engine.controls().len(), 1);
        assert!(engine.state().get("mood").is_none());
        assert_eq!(visible(&engine), vec![engine.elements()[1]]);
    }

    #[test]
    fn missing_auxiliary_targets_disable_features() {
        let fx = seasons();
        let engine = FilterEngine::new(
            fx.doc,
            FilterOptions::new(".card")
                .with_status("#nope")
                .with_no_results("[[broken")
                .with_root("#missing-root"),
        )
        .unwrap();

        assert_eq!(engine.status_target(), None);
        assert_eq!(engine.no_results_target(), None);
        assert_eq!(engine.root(), None);
        assert_eq!(engine.last_summary().total, 2);
    }

    #[test]
    fn root_selector_scopes_discovery() {
        let mut fx = seasons();
        let outside = fx
            .doc
            .append(MemDocument::ROOT, NodeSpec::new("article").attr("class", "card"))
            .unwrap();
        let engine = FilterEngine::new(fx.doc, options().with_root("#grid")).unwrap();

        assert_eq!(engine.root(), Some(fx.grid));
        assert_eq!(engine.elements(), fx.items.as_slice());
        assert!(!engine.elements().contains(&outside));
        // Controls live outside #grid, so none are registered.
        assert!(engine.controls().is_empty());
    }

    #[test]
    fn accessibility_wiring() {
        let fx = seasons();
        let (status, no_results, control) = (fx.status, fx.no_results, fx.controls[0]);
        let engine = FilterEngine::new(fx.doc, options()).unwrap();
        let host = engine.host();

        assert_eq!(host.attr(status, "aria-live"), Some("polite"));
        assert_eq!(host.attr(status, "role"), Some("status"));
        assert_eq!(host.attr(no_results, "aria-live"), Some("polite"));
        assert_eq!(host.attr(control, "aria-controls"), Some("status"));
    }

    #[test]
    fn unnamed_controls_are_skipped() {
        let mut fx = seasons();
        let filters = fx.filters;
        fx.doc
            .append(
                filters,
                NodeSpec::new("input")
                    .attr("data-filter-control", "")
                    .control(ControlKind::text("x")),
            )
            .unwrap();
        let engine = FilterEngine::new(fx.doc, options()).unwrap();
        assert_eq!(engine.controls().len(), 1);
    }

    #[test]
    fn contains_mode_scenario() {
        let fx = DocumentFixture::new()
            .with_control("tag", ControlKind::text(""))
            .with_item(&[("tag", "forest meadow")]);
        let item = fx.items[0];
        let mut engine = FilterEngine::new(fx.doc, options().with_match_mode(MatchMode::Contains)).unwrap();

        engine.update_filter("tag", "meadow").unwrap();
        assert!(engine.host().is_visible(item));

        engine.update_filter("tag", "water").unwrap();
        assert!(!engine.host().is_visible(item));
    }

    #[test]
    fn before_hook_failure_surfaces_from_update() {
        let fx = seasons();
        let fail = Rc::new(RefCell::new(false));
        let flag = Rc::clone(&fail);
        let opts = options().on_before(move |_| {
            if *flag.borrow() {
                Err("boom".into())
            } else {
                Ok(())
            }
        });
        let mut engine = FilterEngine::new(fx.doc, opts).unwrap();

        *fail.borrow_mut() = true;
        let err = engine.update_filter("season", "spring").unwrap_err();
        assert!(matches!(err, SiftError::Hook { stage: HookStage::Before, .. }));
        // The failed pass does not replace the last settled summary.
        assert_eq!(engine.last_summary().visible, 2);
    }
}
