//! # Rendering Module
//!
//! Turns settled engines into terminal output. Reports are plain serializable
//! structs so `--json` and the styled text view print the same data.
//!
//! Layout calculations (column widths) stay Unicode-aware through
//! `unicode-width`; styling goes through `console`, which drops colors when
//! stdout is not a terminal.

use console::Style;
use serde::Serialize;
use siftapp::binding::SharedHost;
use siftapp::model::NodeId;
use siftapp::state::FilterSnapshot;
use siftapp::{FilterEngine, MemDocument};
use std::collections::BTreeMap;
use unicode_width::UnicodeWidthStr;

pub const VISIBLE_MARKER: &str = "✓";
pub const HIDDEN_MARKER: &str = "✗";
const LABEL_MAX_WIDTH: usize = 40;

#[derive(Debug, Clone, Serialize)]
pub struct EngineReport {
    pub scope: String,
    pub visible: usize,
    pub total: usize,
    pub state: FilterSnapshot,
    pub status: Option<String>,
    pub no_results_shown: Option<bool>,
    pub elements: Vec<ElementReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ElementReport {
    pub node: NodeId,
    pub label: String,
    pub visible: bool,
    pub attributes: BTreeMap<String, String>,
}

impl EngineReport {
    pub fn collect(engine: &FilterEngine<SharedHost<MemDocument>>, prefix: &str) -> Self {
        let doc = engine.host().borrow();
        let summary = engine.last_summary();

        let elements = engine
            .elements()
            .iter()
            .map(|&node| ElementReport {
                node,
                label: describe(&doc, node),
                visible: doc.is_visible(node),
                attributes: declared_attributes(&doc, node, prefix),
            })
            .collect();

        Self {
            scope: engine
                .root()
                .map(|root| describe(&doc, root))
                .unwrap_or_else(|| "document".to_string()),
            visible: summary.visible,
            total: summary.total,
            state: engine.state(),
            status: engine
                .status_target()
                .and_then(|node| doc.text(node))
                .map(str::to_string),
            no_results_shown: engine.no_results_target().map(|node| doc.is_visible(node)),
            elements,
        }
    }
}

/// `tag#id.class`, followed by the node's text when it has any.
fn describe(doc: &MemDocument, node: NodeId) -> String {
    let mut label = doc.tag(node).unwrap_or("?").to_string();
    if let Some(id) = doc.attr(node, "id").filter(|id| !id.is_empty()) {
        label.push('#');
        label.push_str(id);
    }
    if let Some(class) = doc.attr(node, "class") {
        for name in class.split_whitespace() {
            label.push('.');
            label.push_str(name);
        }
    }
    match doc.text(node).map(str::trim).filter(|t| !t.is_empty()) {
        Some(text) => format!("{} \"{}\"", label, text),
        None => label,
    }
}

fn declared_attributes(doc: &MemDocument, node: NodeId, prefix: &str) -> BTreeMap<String, String> {
    siftapp::model::Attributes::from_raw(siftapp::Host::attributes(doc, node), prefix)
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

pub fn render_reports(reports: &[EngineReport]) -> String {
    let heading = Style::new().bold();
    let muted = Style::new().dim();
    let shown = Style::new().green();
    let hidden = Style::new().red().dim();

    let mut out = String::new();
    for (i, report) in reports.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&format!(
            "{}  {}\n",
            heading.apply_to(&report.scope),
            muted.apply_to(format!(
                "{} of {} visible  ({})",
                report.visible,
                report.total,
                format_state(&report.state)
            ))
        ));

        let width = report
            .elements
            .iter()
            .map(|e| truncate(&e.label, LABEL_MAX_WIDTH).width())
            .max()
            .unwrap_or(0);
        for element in &report.elements {
            let label = truncate(&element.label, LABEL_MAX_WIDTH);
            let padding = " ".repeat(width.saturating_sub(label.width()));
            let marker = if element.visible {
                shown.apply_to(VISIBLE_MARKER)
            } else {
                hidden.apply_to(HIDDEN_MARKER)
            };
            out.push_str(&format!(
                "  {} {}{}  {}\n",
                marker,
                label,
                padding,
                muted.apply_to(format_state(&element.attributes))
            ));
        }

        if let Some(status) = &report.status {
            out.push_str(&format!("  status: {}\n", status));
        }
        if report.no_results_shown == Some(true) {
            out.push_str(&format!("  {}\n", hidden.apply_to("no results")));
        }
    }
    out
}

pub fn render_json(reports: &[EngineReport]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(reports)
}

fn format_state(pairs: &BTreeMap<String, String>) -> String {
    if pairs.is_empty() {
        return "-".to_string();
    }
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Cuts `text` to at most `max` display columns, marking the cut with `…`.
fn truncate(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push('…');
    out
}
