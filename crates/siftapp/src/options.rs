//! Engine options.
//!
//! [`FilterOptions`] is the record an engine is constructed from. It combines
//! the serializable settings of [`SiftConfig`] with the parts that cannot
//! live in a config file: the status formatter and the before/after
//! callbacks. The engine consumes it on construction, so behavior cannot
//! change afterwards.

use crate::config::{format_status, SiftConfig};
use crate::error::HookError;
use crate::matching::MatchMode;
use crate::pass::{AfterHook, AfterPass, BeforeHook, BeforePass, StatusFormatter};

pub struct FilterOptions {
    pub(crate) items: String,
    pub(crate) controls: String,
    pub(crate) status: Option<String>,
    pub(crate) no_results: Option<String>,
    pub(crate) root: Option<String>,
    pub(crate) all_value: String,
    pub(crate) match_mode: MatchMode,
    pub(crate) attribute_prefix: String,
    pub(crate) transitions: bool,
    pub(crate) formatter: StatusFormatter,
    pub(crate) before: Option<BeforeHook>,
    pub(crate) after: Option<AfterHook>,
}

impl FilterOptions {
    /// Options with compiled defaults for the element selector `items`.
    pub fn new(items: impl Into<String>) -> Self {
        let mut options = Self::from_config(&SiftConfig::default());
        options.items = items.into();
        options
    }

    /// Options from a loaded configuration. A missing `items` selector is
    /// kept empty and rejected when the engine is constructed.
    pub fn from_config(config: &SiftConfig) -> Self {
        let template = config.status_template.clone();
        Self {
            items: config.items.clone().unwrap_or_default(),
            controls: config.controls.clone(),
            status: config.status.clone(),
            no_results: Some(config.no_results.clone()),
            root: config.root.clone(),
            all_value: config.all_value.clone(),
            match_mode: config.match_mode,
            attribute_prefix: config.attribute_prefix.clone(),
            transitions: config.transitions,
            formatter: Box::new(move |count| format_status(&template, count)),
            before: None,
            after: None,
        }
    }

    pub fn with_items(mut self, selector: impl Into<String>) -> Self {
        self.items = selector.into();
        self
    }

    pub fn with_controls(mut self, selector: impl Into<String>) -> Self {
        self.controls = selector.into();
        self
    }

    pub fn with_status(mut self, selector: impl Into<String>) -> Self {
        self.status = Some(selector.into());
        self
    }

    pub fn with_no_results(mut self, selector: impl Into<String>) -> Self {
        self.no_results = Some(selector.into());
        self
    }

    pub fn without_no_results(mut self) -> Self {
        self.no_results = None;
        self
    }

    pub fn with_root(mut self, selector: impl Into<String>) -> Self {
        self.root = Some(selector.into());
        self
    }

    pub fn with_all_value(mut self, value: impl Into<String>) -> Self {
        self.all_value = value.into();
        self
    }

    pub fn with_match_mode(mut self, mode: MatchMode) -> Self {
        self.match_mode = mode;
        self
    }

    pub fn with_attribute_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.attribute_prefix = prefix.into();
        self
    }

    pub fn with_transitions(mut self, enabled: bool) -> Self {
        self.transitions = enabled;
        self
    }

    pub fn with_status_formatter<F>(mut self, formatter: F) -> Self
    where
        F: Fn(usize) -> String + 'static,
    {
        self.formatter = Box::new(formatter);
        self
    }

    pub fn on_before<F>(mut self, hook: F) -> Self
    where
        F: FnMut(BeforePass<'_>) -> Result<(), HookError> + 'static,
    {
        self.before = Some(Box::new(hook));
        self
    }

    pub fn on_after<F>(mut self, hook: F) -> Self
    where
        F: FnMut(AfterPass<'_>) -> Result<(), HookError> + 'static,
    {
        self.after = Some(Box::new(hook));
        self
    }

    pub fn items(&self) -> &str {
        &self.items
    }

    pub fn all_value(&self) -> &str {
        &self.all_value
    }

    pub fn match_mode(&self) -> MatchMode {
        self.match_mode
    }
}

impl std::fmt::Debug for FilterOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterOptions")
            .field("items", &self.items)
            .field("controls", &self.controls)
            .field("status", &self.status)
            .field("no_results", &self.no_results)
            .field("root", &self.root)
            .field("all_value", &self.all_value)
            .field("match_mode", &self.match_mode)
            .field("attribute_prefix", &self.attribute_prefix)
            .field("transitions", &self.transitions)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_uses_defaults() {
        let options = FilterOptions::new(".card");
        assert_eq!(options.items(), ".card");
        assert_eq!(options.all_value(), "all");
        assert_eq!(options.match_mode(), MatchMode::Equals);
        assert_eq!(options.no_results.as_deref(), Some("[data-filter-no-results]"));
        assert_eq!((options.formatter)(4), "4 results found");
    }

    #[test]
    fn from_config_keeps_template_and_missing_items() {
        let config = SiftConfig {
            status_template: "{count} cards".to_string(),
            match_mode: MatchMode::Contains,
            ..Default::default()
        };
        let options = FilterOptions::from_config(&config);
        assert_eq!(options.items(), "");
        assert_eq!(options.match_mode(), MatchMode::Contains);
        assert_eq!((options.formatter)(2), "2 cards");
    }

    #[test]
    fn builders_override() {
        let options = FilterOptions::new(".card")
            .with_all_value("*")
            .with_status("#status")
            .without_no_results()
            .with_status_formatter(|n| format!("{} shown", n))
            .on_before(|_| Ok(()));
        assert_eq!(options.all_value(), "*");
        assert_eq!(options.status.as_deref(), Some("#status"));
        assert!(options.no_results.is_none());
        assert!(options.before.is_some());
        assert_eq!((options.formatter)(1), "1 shown");
    }
}
