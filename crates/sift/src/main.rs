//! # Sift CLI Architecture
//!
//! The `sift` binary is intentionally thin: the CLI lives in `src/cli/`, while
//! this file only invokes `cli::run()` and handles process termination.
//!
//! ## Workspace Structure
//!
//! - `crates/siftapp/`: the UI-agnostic filtering library
//! - `crates/sift/`: this CLI, depends on `siftapp`
//!
//! ## Layering
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/sift/src/cli/)                           │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - Context wiring + dispatch (commands.rs)                  │
//! │  - Terminal rendering (render.rs)                           │
//! │  - tracing subscriber (logging.rs)                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Library (crates/siftapp)                                   │
//! │  - Engines, binding, matching over a Host                   │
//! │  - No knowledge of stdout/stderr or process exits           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The CLI drives a [`siftapp::MemDocument`] loaded from JSON. It plays the
//! role a page plays for an embedding host: it owns the document, delivers
//! control changes and reads the outcome back.
//!
//! ## Testing Approach
//!
//! - Library behavior is tested inside `siftapp`.
//! - Parsing and rendering have unit tests beside the code.
//! - `tests/cli_e2e.rs` runs the binary against documents in temp dirs.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
