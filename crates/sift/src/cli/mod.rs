//! # CLI Behavior
//!
//! This is **one possible client** for siftapp, not the application itself.
//! The CLI is the only place that knows about terminal I/O, exit codes, and
//! output formatting.
//!
//! ## Commands
//!
//! - `sift run <document.json>`: bind engines to the document, apply
//!   `--set key=value` changes in order, optionally `--reset`, then print what
//!   is visible. Engines come from `--items` (or `items` in `sift.toml`) when
//!   given, otherwise from containers marked with `data-filter-target`.
//! - `sift match --attr k=v --filter k=v`: evaluate one attribute map against
//!   one filter state. Useful for checking matching rules in isolation.
//! - `sift config`: print the effective layered configuration.
//!
//! ## Module Structure
//!
//! - `commands`: context setup and per-command handlers
//! - `render`: terminal and JSON output
//! - `setup`: argument parsing via clap
//! - `logging`: tracing subscriber initialization

mod commands;
mod logging;
mod render;
pub mod setup;

pub use commands::run;
