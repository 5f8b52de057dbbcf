//! Attribute matching.
//!
//! Decides whether one element is visible under the full filter state. The
//! decision is a conjunction over every key in the state:
//!
//! 1. A key whose value is the match-all sentinel imposes no constraint.
//! 2. A key the element does not declare is ignored for that element.
//! 3. Otherwise the declared value is compared per [`MatchMode`].
//!
//! Rule 2 means an element that declares none of the active keys is always
//! visible. Heterogeneous content relies on this: cards that have no `season`
//! stay on screen while the season filter is active.

use crate::model::Attributes;
use crate::state::FilterState;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How a declared attribute value is compared against a filter value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Exact string equality.
    #[default]
    Equals,
    /// Token membership after splitting the declared value.
    Contains,
}

/// A match mode name other than `equals` or `contains`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown match mode '{0}' (expected 'equals' or 'contains')")]
pub struct UnknownMatchMode(pub String);

impl FromStr for MatchMode {
    type Err = UnknownMatchMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "equals" => Ok(MatchMode::Equals),
            "contains" => Ok(MatchMode::Contains),
            other => Err(UnknownMatchMode(other.to_string())),
        }
    }
}

impl std::fmt::Display for MatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchMode::Equals => write!(f, "equals"),
            MatchMode::Contains => write!(f, "contains"),
        }
    }
}

/// Splits a declared value into tokens for `contains` matching.
///
/// Splits on commas when the value holds any comma, else on whitespace runs.
/// Tokens are trimmed and empty ones dropped.
pub fn tokenize(declared: &str) -> Vec<&str> {
    if declared.contains(',') {
        declared
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect()
    } else {
        declared.split_whitespace().collect()
    }
}

/// The matching engine, configured with a mode and a match-all sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matcher {
    mode: MatchMode,
    all_value: String,
}

impl Matcher {
    pub fn new(mode: MatchMode, all_value: impl Into<String>) -> Self {
        Self {
            mode,
            all_value: all_value.into(),
        }
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    pub fn all_value(&self) -> &str {
        &self.all_value
    }

    /// Check whether an element with `attrs` is visible under `state`.
    pub fn matches(&self, attrs: &Attributes, state: &FilterState) -> bool {
        state
            .iter()
            .all(|(key, value)| self.key_matches(attrs, key, value))
    }

    fn key_matches(&self, attrs: &Attributes, key: &str, value: &str) -> bool {
        if value == self.all_value {
            return true;
        }
        let Some(declared) = attrs.get(key) else {
            return true;
        };
        self.value_matches(declared, value)
    }

    fn value_matches(&self, declared: &str, value: &str) -> bool {
        match self.mode {
            MatchMode::Equals => declared == value,
            MatchMode::Contains => tokenize(declared).into_iter().any(|t| t == value),
        }
    }
}

/// Free-standing form of [`Matcher::matches`].
pub fn matches(attrs: &Attributes, state: &FilterState, mode: MatchMode, all_value: &str) -> bool {
    Matcher::new(mode, all_value).matches(attrs, state)
}
