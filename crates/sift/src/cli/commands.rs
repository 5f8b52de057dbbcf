//! # CLI Layer
//!
//! The CLI layer is the **only** place that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Handles argument parsing
//! - Formats output for human consumption
//!
//! ## Responsibilities
//!
//! 1. **Argument Parsing**: shell arguments into typed commands via clap
//! 2. **Context Setup**: working directory, layered configuration, logging
//! 3. **Dispatch**: route each command to its handler
//! 4. **Output Formatting**: hand settled engines to `render`

use super::logging::{init_logging, LogConfig};
use super::render::{render_json, render_reports, EngineReport};
use super::setup::{Cli, Commands, MatchArgs, RunArgs};
use anyhow::{bail, Context, Result};
use clap::Parser;
use siftapp::binding::{bind_all, SharedHost};
use siftapp::model::Attributes;
use siftapp::setup::install_styles;
use siftapp::state::FilterState;
use siftapp::{FilterEngine, FilterOptions, MemDocument, Matcher, SiftConfig};
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use tracing::debug;

type Engine = FilterEngine<SharedHost<MemDocument>>;

/// Everything a handler needs besides its own arguments.
pub struct AppContext {
    pub cwd: PathBuf,
    pub config: SiftConfig,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&LogConfig::from_verbosity(cli.verbose));

    let ctx = create_context(&cli)?;
    match cli.command {
        Commands::Run(args) => handle_run(&ctx, args),
        Commands::Match(args) => handle_match(&ctx, args),
        Commands::Config => handle_config(&ctx),
    }
}

fn create_context(cli: &Cli) -> Result<AppContext> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    if let Some(path) = &cli.config {
        if !path.is_file() {
            bail!("config file not found: {}", path.display());
        }
    }
    let config = SiftConfig::load(&cwd, cli.config.as_deref()).context("loading configuration")?;
    debug!(cwd = %cwd.display(), "configuration loaded");
    Ok(AppContext { cwd, config })
}

fn handle_run(ctx: &AppContext, args: RunArgs) -> Result<()> {
    let path = if args.document.is_absolute() {
        args.document.clone()
    } else {
        ctx.cwd.join(&args.document)
    };
    let mut doc = MemDocument::load(&path).with_context(|| format!("loading {}", path.display()))?;
    install_styles(&mut doc);

    let mut config = ctx.config.clone();
    if let Some(items) = args.items {
        config.items = Some(items);
    }
    if let Some(status) = args.status {
        config.status = Some(status);
    }
    if let Some(mode) = args.mode {
        config.match_mode = mode;
    }
    if let Some(all) = args.all_value {
        config.all_value = all;
    }

    let host: SharedHost<MemDocument> = Rc::new(RefCell::new(doc));
    let mut engines = match config.items.as_deref().filter(|s| !s.trim().is_empty()) {
        Some(_) => vec![FilterEngine::new(Rc::clone(&host), FilterOptions::from_config(&config))?],
        None => bind_all(&host, &config)?,
    };
    if engines.is_empty() {
        bail!(
            "nothing to filter: pass --items, set `items` in sift.toml, \
             or mark a container with data-filter-target"
        );
    }

    for (key, value) in &args.set {
        for engine in engines.iter_mut() {
            apply_setting(engine, key, value)?;
        }
    }
    if args.reset {
        for engine in engines.iter_mut() {
            engine.reset()?;
        }
    }

    let reports: Vec<EngineReport> = engines
        .iter()
        .map(|engine| EngineReport::collect(engine, &config.attribute_prefix))
        .collect();
    if args.json {
        println!("{}", render_json(&reports)?);
    } else {
        print!("{}", render_reports(&reports));
    }
    Ok(())
}

/// Route `key=value` through the control that owns `key`, as a user would.
/// Keys no control owns go straight into the filter state.
fn apply_setting(engine: &mut Engine, key: &str, value: &str) -> Result<()> {
    let owner = engine.controls().iter().find(|c| c.key == key).map(|c| c.node);
    let Some(node) = owner else {
        engine.update_filter(key, value)?;
        return Ok(());
    };

    let all_value = engine.matcher().all_value().to_string();
    let accepted = engine
        .host_mut()
        .borrow_mut()
        .set_control_value(node, value, &all_value)?;
    if !accepted {
        bail!("control `{}` cannot take the value `{}`", key, value);
    }
    engine.pump()?;
    Ok(())
}

fn handle_match(ctx: &AppContext, args: MatchArgs) -> Result<()> {
    let mode = args.mode.unwrap_or(ctx.config.match_mode);
    let all_value = args.all_value.unwrap_or_else(|| ctx.config.all_value.clone());
    let matcher = Matcher::new(mode, all_value);

    let attrs: Attributes = args.attrs.into_iter().collect();
    let state: FilterState = args.filters.into_iter().collect();
    let verdict = if matcher.matches(&attrs, &state) {
        "visible"
    } else {
        "hidden"
    };
    println!("{}", verdict);
    Ok(())
}

fn handle_config(ctx: &AppContext) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&ctx.config)?);
    Ok(())
}
