//! # Input Controls
//!
//! Controls are the inputs whose values drive the filter state. They form a
//! closed set of variants:
//!
//! | Kind | Logical value | Neutral state |
//! |------|---------------|---------------|
//! | `Select` | selected option | sentinel option, else first option |
//! | `Radio` | checked option | sentinel option, else first option |
//! | `Toggle` | `value` when checked, sentinel otherwise | unchecked |
//! | `Text` | trimmed text, sentinel when blank | empty text |
//!
//! Every variant answers [`ControlKind::current_value`] and
//! [`ControlKind::reset_to_neutral`]; callers dispatch on the variant tag.

use crate::model::NodeId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ControlKind {
    /// A drop-down with discrete options.
    Select {
        options: Vec<String>,
        #[serde(default)]
        selected: Option<usize>,
    },
    /// A radio group with discrete options.
    Radio {
        options: Vec<String>,
        #[serde(default)]
        checked: Option<usize>,
    },
    /// A checkbox that contributes `value` while checked.
    Toggle {
        value: String,
        #[serde(default)]
        checked: bool,
    },
    /// A free-text input.
    Text {
        #[serde(default)]
        text: String,
    },
}

impl ControlKind {
    pub fn select<I: IntoIterator<Item = S>, S: Into<String>>(options: I, selected: Option<usize>) -> Self {
        ControlKind::Select {
            options: options.into_iter().map(Into::into).collect(),
            selected,
        }
    }

    pub fn radio<I: IntoIterator<Item = S>, S: Into<String>>(options: I, checked: Option<usize>) -> Self {
        ControlKind::Radio {
            options: options.into_iter().map(Into::into).collect(),
            checked,
        }
    }

    pub fn toggle(value: impl Into<String>, checked: bool) -> Self {
        ControlKind::Toggle {
            value: value.into(),
            checked,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        ControlKind::Text { text: text.into() }
    }

    /// The logical filter value of this control.
    ///
    /// Indeterminate states (nothing selected, unchecked toggle, blank text,
    /// a selection index past the option list) resolve to `all_value`.
    pub fn current_value(&self, all_value: &str) -> String {
        match self {
            ControlKind::Select { options, selected }
            | ControlKind::Radio {
                options,
                checked: selected,
            } => selected
                .and_then(|i| options.get(i))
                .cloned()
                .unwrap_or_else(|| all_value.to_string()),
            ControlKind::Toggle { value, checked } => {
                if *checked {
                    value.clone()
                } else {
                    all_value.to_string()
                }
            }
            ControlKind::Text { text } => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    all_value.to_string()
                } else {
                    trimmed.to_string()
                }
            }
        }
    }

    /// Restores the neutral selection and returns the resulting logical value.
    pub fn reset_to_neutral(&mut self, all_value: &str) -> String {
        match self {
            ControlKind::Select { options, selected }
            | ControlKind::Radio {
                options,
                checked: selected,
            } => {
                *selected = neutral_index(options, all_value);
            }
            ControlKind::Toggle { checked, .. } => *checked = false,
            ControlKind::Text { text } => text.clear(),
        }
        self.current_value(all_value)
    }

    /// Programmatically sets the control so that it reports `value`.
    ///
    /// Returns `false` when the control cannot represent `value` (an option
    /// that does not exist, or a toggle value other than its own or the
    /// sentinel); the control is left untouched in that case.
    pub fn set_value(&mut self, value: &str, all_value: &str) -> bool {
        match self {
            ControlKind::Select { options, selected }
            | ControlKind::Radio {
                options,
                checked: selected,
            } => match options.iter().position(|o| o == value) {
                Some(i) => {
                    *selected = Some(i);
                    true
                }
                None => false,
            },
            ControlKind::Toggle {
                value: on_value,
                checked,
            } => {
                if value == on_value {
                    *checked = true;
                    true
                } else if value == all_value {
                    *checked = false;
                    true
                } else {
                    false
                }
            }
            ControlKind::Text { text } => {
                *text = value.to_string();
                true
            }
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            ControlKind::Select { .. } => "select",
            ControlKind::Radio { .. } => "radio",
            ControlKind::Toggle { .. } => "toggle",
            ControlKind::Text { .. } => "text",
        }
    }
}

fn neutral_index(options: &[String], all_value: &str) -> Option<usize> {
    options
        .iter()
        .position(|o| o == all_value)
        .or(if options.is_empty() { None } else { Some(0) })
}

/// A registered control: its host node, its filter key and its last known state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Control {
    pub node: NodeId,
    pub key: String,
    pub kind: ControlKind,
}
