//! # Pass Orchestration
//!
//! A pass evaluates every tracked element against the current filter state
//! and settles the page in a fixed order:
//!
//! 1. the `before` callback sees a snapshot of the state and the element list
//! 2. every element's visibility is set, in discovery order
//! 3. the no-results marker is shown iff nothing is visible
//! 4. the status line gets the formatted visible count
//! 5. the `after` callback sees the snapshot, the counts and the element list
//!
//! Callbacks only ever receive snapshots. A failing callback aborts the pass
//! with [`SiftError::Hook`]; visibility that was already applied stays applied.

use crate::error::{HookError, HookStage, Result, SiftError};
use crate::host::Host;
use crate::matching::Matcher;
use crate::model::{ElementSet, NodeId, PassSummary};
use crate::state::{FilterSnapshot, FilterState};
use tracing::{debug, trace};

/// What the `before` callback receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeforePass<'a> {
    pub state: FilterSnapshot,
    pub elements: &'a [NodeId],
}

/// What the `after` callback receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AfterPass<'a> {
    pub state: FilterSnapshot,
    pub visible: usize,
    pub total: usize,
    pub elements: &'a [NodeId],
}

pub type BeforeHook = Box<dyn FnMut(BeforePass<'_>) -> std::result::Result<(), HookError>>;
pub type AfterHook = Box<dyn FnMut(AfterPass<'_>) -> std::result::Result<(), HookError>>;
pub type StatusFormatter = Box<dyn Fn(usize) -> String>;

/// Box a closure as a [`BeforeHook`].
pub fn before_hook<F>(hook: F) -> BeforeHook
where
    F: FnMut(BeforePass<'_>) -> std::result::Result<(), HookError> + 'static,
{
    Box::new(hook)
}

/// Box a closure as an [`AfterHook`].
pub fn after_hook<F>(hook: F) -> AfterHook
where
    F: FnMut(AfterPass<'_>) -> std::result::Result<(), HookError> + 'static,
{
    Box::new(hook)
}

/// Everything a pass touches besides the elements themselves.
pub struct SideEffects {
    pub status: Option<NodeId>,
    pub no_results: Option<NodeId>,
    pub formatter: StatusFormatter,
    pub before: Option<BeforeHook>,
    pub after: Option<AfterHook>,
}

impl SideEffects {
    pub fn new(formatter: StatusFormatter) -> Self {
        Self {
            status: None,
            no_results: None,
            formatter,
            before: None,
            after: None,
        }
    }
}

impl std::fmt::Debug for SideEffects {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SideEffects")
            .field("status", &self.status)
            .field("no_results", &self.no_results)
            .field("before", &self.before.is_some())
            .field("after", &self.after.is_some())
            .finish()
    }
}

/// Run one full pass.
pub fn run<H: Host>(
    host: &mut H,
    elements: &ElementSet,
    state: &FilterState,
    matcher: &Matcher,
    effects: &mut SideEffects,
) -> Result<PassSummary> {
    if let Some(before) = effects.before.as_mut() {
        before(BeforePass {
            state: state.snapshot(),
            elements: elements.nodes(),
        })
        .map_err(|source| SiftError::Hook {
            stage: HookStage::Before,
            source,
        })?;
    }

    let mut visible = 0;
    for element in elements.iter() {
        let shown = matcher.matches(&element.attributes, state);
        trace!(node = element.node, shown, "element evaluated");
        host.set_visible(element.node, shown);
        if shown {
            visible += 1;
        }
    }
    let summary = PassSummary {
        visible,
        total: elements.len(),
    };

    if let Some(marker) = effects.no_results {
        host.set_visible(marker, summary.is_empty());
    }
    if let Some(status) = effects.status {
        host.set_text(status, &(effects.formatter)(visible));
    }
    debug!(visible = summary.visible, total = summary.total, "pass settled");

    if let Some(after) = effects.after.as_mut() {
        after(AfterPass {
            state: state.snapshot(),
            visible: summary.visible,
            total: summary.total,
            elements: elements.nodes(),
        })
        .map_err(|source| SiftError::Hook {
            stage: HookStage::After,
            source,
        })?;
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::format_status;
    use crate::host::document::fixtures::DocumentFixture;
    use crate::matching::MatchMode;
    use crate::model::{Attributes, TrackedElement};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn tracked(fx: &DocumentFixture) -> ElementSet {
        ElementSet::new(
            fx.items
                .iter()
                .map(|&node| TrackedElement {
                    node,
                    attributes: Attributes::from_raw(fx.doc.attributes(node), "data-"),
                })
                .collect(),
        )
    }

    fn effects(fx: &DocumentFixture) -> SideEffects {
        let mut effects = SideEffects::new(Box::new(|n: usize| format_status("{count} results found", n)));
        effects.status = Some(fx.status);
        effects.no_results = Some(fx.no_results);
        effects
    }

    fn seasons() -> DocumentFixture {
        DocumentFixture::new()
            .with_item(&[("season", "spring")])
            .with_item(&[("season", "summer")])
    }

    #[test]
    fn filters_and_counts() {
        let mut fx = seasons();
        let elements = tracked(&fx);
        let matcher = Matcher::new(MatchMode::Equals, "all");
        let mut fx_effects = effects(&fx);

        let state: FilterState = [("season", "spring")].into_iter().collect();
        let summary = run(&mut fx.doc, &elements, &state, &matcher, &mut fx_effects).unwrap();

        assert_eq!(summary, PassSummary { visible: 1, total: 2 });
        assert_eq!(fx.visible_items(), vec![fx.items[0]]);
        assert_eq!(fx.doc.text(fx.status), Some("1 results found"));
        assert!(!fx.doc.is_visible(fx.no_results));
    }

    #[test]
    fn zero_matches_show_no_results() {
        let mut fx = seasons();
        let elements = tracked(&fx);
        let matcher = Matcher::new(MatchMode::Equals, "all");
        let mut fx_effects = effects(&fx);

        let state: FilterState = [("season", "winter")].into_iter().collect();
        let summary = run(&mut fx.doc, &elements, &state, &matcher, &mut fx_effects).unwrap();

        assert_eq!(summary.visible, 0);
        assert!(fx.doc.is_visible(fx.no_results));
        assert_eq!(fx.doc.text(fx.status), Some("0 results found"));
    }

    #[test]
    fn pass_is_idempotent() {
        let mut fx = seasons();
        let elements = tracked(&fx);
        let matcher = Matcher::new(MatchMode::Equals, "all");
        let mut fx_effects = effects(&fx);
        let state: FilterState = [("season", "summer")].into_iter().collect();

        let first = run(&mut fx.doc, &elements, &state, &matcher, &mut fx_effects).unwrap();
        let visible_first = fx.visible_items();
        let second = run(&mut fx.doc, &elements, &state, &matcher, &mut fx_effects).unwrap();

        assert_eq!(first, second);
        assert_eq!(visible_first, fx.visible_items());
    }

    #[test]
    fn missing_targets_are_skipped() {
        let mut fx = seasons();
        let elements = tracked(&fx);
        let matcher = Matcher::new(MatchMode::Equals, "all");
        let mut bare = SideEffects::new(Box::new(|n: usize| n.to_string()));

        let state: FilterState = [("season", "winter")].into_iter().collect();
        run(&mut fx.doc, &elements, &state, &matcher, &mut bare).unwrap();

        assert_eq!(fx.doc.text(fx.status), Some(""));
        assert!(fx.doc.is_visible(fx.no_results));
    }

    #[test]
    fn callbacks_see_settled_state_in_order() {
        let mut fx = seasons();
        let elements = tracked(&fx);
        let matcher = Matcher::new(MatchMode::Equals, "all");
        let log: Rc<RefCell<Vec<String>>> = Rc::default();

        let mut fx_effects = effects(&fx);
        let before_log = Rc::clone(&log);
        fx_effects.before = Some(before_hook(move |pass| {
            before_log
                .borrow_mut()
                .push(format!("before {:?} {}", pass.state.get("season"), pass.elements.len()));
            Ok(())
        }));
        let after_log = Rc::clone(&log);
        fx_effects.after = Some(after_hook(move |pass| {
            after_log
                .borrow_mut()
                .push(format!("after {}/{}", pass.visible, pass.total));
            Ok(())
        }));

        let state: FilterState = [("season", "spring")].into_iter().collect();
        run(&mut fx.doc, &elements, &state, &matcher, &mut fx_effects).unwrap();

        assert_eq!(
            *log.borrow(),
            vec![
                "before Some(\"spring\") 2".to_string(),
                "after 1/2".to_string()
            ]
        );
    }

    #[test]
    fn callback_cannot_mutate_engine_state() {
        let mut fx = seasons();
        let elements = tracked(&fx);
        let matcher = Matcher::new(MatchMode::Equals, "all");
        let mut fx_effects = effects(&fx);
        fx_effects.before = Some(before_hook(|mut pass| {
            pass.state.insert("season".into(), "summer".into());
            Ok(())
        }));

        let state: FilterState = [("season", "spring")].into_iter().collect();
        let summary = run(&mut fx.doc, &elements, &state, &matcher, &mut fx_effects).unwrap();

        assert_eq!(state.get("season"), Some("spring"));
        assert_eq!(fx.visible_items(), vec![fx.items[0]]);
        assert_eq!(summary.visible, 1);
    }

    #[test]
    fn failing_after_keeps_visibility() {
        let mut fx = seasons();
        let elements = tracked(&fx);
        let matcher = Matcher::new(MatchMode::Equals, "all");
        let mut fx_effects = effects(&fx);
        fx_effects.after = Some(after_hook(|_| Err("after exploded".into())));

        let state: FilterState = [("season", "summer")].into_iter().collect();
        let err = run(&mut fx.doc, &elements, &state, &matcher, &mut fx_effects).unwrap_err();

        match err {
            SiftError::Hook { stage, source } => {
                assert_eq!(stage, HookStage::After);
                assert_eq!(source.to_string(), "after exploded");
            }
            other => panic!("Expected Hook error, got {:?}", other),
        }
        assert_eq!(fx.visible_items(), vec![fx.items[1]]);
        assert_eq!(fx.doc.text(fx.status), Some("1 results found"));
    }

    #[test]
    fn failing_before_aborts_pass() {
        let mut fx = seasons();
        let elements = tracked(&fx);
        let matcher = Matcher::new(MatchMode::Equals, "all");
        let mut fx_effects = effects(&fx);
        fx_effects.before = Some(before_hook(|_| Err("before exploded".into())));

        let state: FilterState = [("season", "summer")].into_iter().collect();
        let err = run(&mut fx.doc, &elements, &state, &matcher, &mut fx_effects).unwrap_err();

        assert!(matches!(err, SiftError::Hook { stage: HookStage::Before, .. }));
        assert_eq!(fx.visible_items(), fx.items);
    }
}
