//! # Configuration
//!
//! Sift configuration is managed by [`confique`], which handles layered loading
//! from TOML files, environment variables, and compiled defaults.
//!
//! ## Storage Hierarchy
//!
//! Configuration is resolved in priority order:
//! 1. **Environment variables**: `SIFT_` followed by the upper-cased key, e.g.
//!    `SIFT_ITEMS`, `SIFT_MATCH_MODE`, `SIFT_TRANSITIONS`.
//! 2. **Explicit file**: passed with `--config`.
//! 3. **Project Config**: `sift.toml` in the working directory.
//! 4. **Global Config**: OS-appropriate config directory (via `directories` crate).
//! 5. **Compiled Defaults**: Built-in fallbacks via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `items` | none | Selector for the elements to filter |
//! | `controls` | `[data-filter-control]` | Selector for the input controls |
//! | `status` | none | Selector for the status line |
//! | `no_results` | `[data-filter-no-results]` | Selector for the no-results marker |
//! | `root` | none | Selector for the discovery scope |
//! | `all_value` | `all` | The match-all sentinel |
//! | `match_mode` | `equals` | `equals` or `contains` |
//! | `status_template` | `{count} results found` | Status text, `{count}` is replaced |
//! | `attribute_prefix` | `data-` | Prefix of element attributes that declare filter keys |
//! | `transitions` | `true` | Wrap passes in transitions when the host supports them |

use crate::error::Result;
use crate::matching::MatchMode;
use confique::Config;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const CONFIG_FILENAME: &str = "sift.toml";

pub const DEFAULT_CONTROLS: &str = "[data-filter-control]";
pub const DEFAULT_NO_RESULTS: &str = "[data-filter-no-results]";
pub const DEFAULT_ALL_VALUE: &str = "all";
pub const DEFAULT_STATUS_TEMPLATE: &str = "{count} results found";
pub const DEFAULT_ATTRIBUTE_PREFIX: &str = "data-";

/// Configuration for sift, stored in `sift.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct SiftConfig {
    /// Selector for the elements subject to filtering.
    #[config(env = "SIFT_ITEMS")]
    pub items: Option<String>,

    /// Selector for the input controls.
    #[config(env = "SIFT_CONTROLS", default = "[data-filter-control]")]
    pub controls: String,

    /// Selector for the status line that reports the visible count.
    #[config(env = "SIFT_STATUS")]
    pub status: Option<String>,

    /// Selector for the marker shown when nothing matches.
    #[config(env = "SIFT_NO_RESULTS", default = "[data-filter-no-results]")]
    pub no_results: String,

    /// Selector for the discovery scope. The whole document when absent.
    #[config(env = "SIFT_ROOT")]
    pub root: Option<String>,

    /// The value that means "this filter is unconstrained".
    #[config(env = "SIFT_ALL_VALUE", default = "all")]
    pub all_value: String,

    #[config(env = "SIFT_MATCH_MODE", parse_env = MatchMode::from_str, default = "equals")]
    pub match_mode: MatchMode,

    /// Status text; `{count}` is replaced with the visible count.
    #[config(env = "SIFT_STATUS_TEMPLATE", default = "{count} results found")]
    pub status_template: String,

    /// Prefix of element attributes that declare filter keys.
    #[config(env = "SIFT_ATTRIBUTE_PREFIX", default = "data-")]
    pub attribute_prefix: String,

    /// Wrap passes in animated transitions when the host supports them.
    #[config(env = "SIFT_TRANSITIONS", default = true)]
    pub transitions: bool,
}

impl Default for SiftConfig {
    fn default() -> Self {
        Self {
            items: None,
            controls: DEFAULT_CONTROLS.to_string(),
            status: None,
            no_results: DEFAULT_NO_RESULTS.to_string(),
            root: None,
            all_value: DEFAULT_ALL_VALUE.to_string(),
            match_mode: MatchMode::Equals,
            status_template: DEFAULT_STATUS_TEMPLATE.to_string(),
            attribute_prefix: DEFAULT_ATTRIBUTE_PREFIX.to_string(),
            transitions: true,
        }
    }
}

impl SiftConfig {
    /// Load the layered configuration for a working directory.
    pub fn load(cwd: &Path, explicit: Option<&Path>) -> Result<Self> {
        let mut builder = Self::builder().env();
        if let Some(path) = explicit {
            builder = builder.file(path);
        }
        builder = builder.file(cwd.join(CONFIG_FILENAME));
        if let Some(global) = global_config_path() {
            builder = builder.file(global);
        }
        Ok(builder.load()?)
    }

    /// Load a single file on top of the compiled defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        Ok(Self::builder().file(path).load()?)
    }

    /// Render the status text for `count` visible elements.
    pub fn format_status(&self, count: usize) -> String {
        format_status(&self.status_template, count)
    }
}

/// Location of the global `sift.toml`, if the platform has a config directory.
pub fn global_config_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "sift", "sift").map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
}

pub fn format_status(template: &str, count: usize) -> String {
    template.replace("{count}", &count.to_string())
}
