//! # Sift Architecture
//!
//! Sift is a **UI-agnostic filtering library**. Content elements declare their
//! properties as attributes, input controls declare which property they
//! constrain, and sift keeps the visible set in sync with the controls.
//! It never knows what a page looks like; it only talks to a [`host::Host`].
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Binding Layer (binding.rs, setup.rs)                       │
//! │  - Finds declared containers, one engine per container      │
//! │  - One-time stylesheet install                              │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Lifecycle Layer (engine.rs, options.rs)                    │
//! │  - Discovery, control registration, change handling         │
//! │  - refresh / reset / transitions                            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Pass Layer (pass.rs, matching.rs, state.rs)                │
//! │  - Pure matching of attribute maps against filter state     │
//! │  - Visibility, no-results marker, status text, callbacks    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Host Layer (host/)                                         │
//! │  - Abstract Host trait                                      │
//! │  - MemDocument (in-memory tree with a selector engine)      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Matching
//!
//! An element is visible iff every constrained filter key agrees with it. A
//! key is unconstrained when its value is the match-all sentinel (`all` by
//! default). An element that does not declare a key is **not** excluded by
//! it: absence is permissive.
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! Nothing in this crate writes to stdout/stderr or exits the process.
//! Diagnostics go through `tracing`; the caller decides where they end up.
//!
//! ## Testing Strategy
//!
//! 1. **Matching and state**: exhaustive unit tests beside the code.
//! 2. **Engine**: scenario tests over [`host::MemDocument`] fixtures
//!    (`host::document::fixtures`, also exported under the `test_utils`
//!    feature).
//! 3. **CLI**: end-to-end tests in the `sift` crate.
//!
//! ## Module Overview
//!
//! - [`engine`]: the lifecycle controller
//! - [`pass`]: one evaluation pass and its callbacks
//! - [`matching`]: equals/contains matching with the match-all sentinel
//! - [`state`]: filter key to value store
//! - [`controls`]: control kinds and their logical values
//! - [`host`]: the host trait and the in-memory document
//! - [`binding`]: declarative auto-binding
//! - [`setup`]: base stylesheet installation
//! - [`config`]: layered configuration
//! - [`error`]: error types

pub mod binding;
pub mod config;
pub mod controls;
pub mod engine;
pub mod error;
pub mod host;
pub mod matching;
pub mod model;
pub mod options;
pub mod pass;
pub mod setup;
pub mod state;

pub use config::SiftConfig;
pub use engine::FilterEngine;
pub use error::{Result, SiftError};
pub use host::{Host, MemDocument};
pub use matching::{MatchMode, Matcher};
pub use options::FilterOptions;
