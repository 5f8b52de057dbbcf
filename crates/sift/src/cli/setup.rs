use clap::{Args, Parser, Subcommand};
use siftapp::MatchMode;
use std::path::PathBuf;

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format for releases: "v0.3.0"
/// Format for dev builds: "v0.3.0\ndev: abc1234 2026-01-15 14:30"
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            format!("v{}", VERSION)
        } else {
            format!("v{}\ndev: {} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(
    name = "sift",
    bin_name = "sift",
    version = get_version(),
    disable_help_subcommand = true
)]
#[command(about = "Declarative attribute filtering for documents", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count, help_heading = "Options")]
    pub verbose: u8,

    /// Configuration file layered over sift.toml and the global config
    #[arg(long, global = true, value_name = "PATH", help_heading = "Options")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Bind filters to a document, apply changes and print the result
    #[command(display_order = 1)]
    Run(RunArgs),

    /// Evaluate one attribute map against one filter state
    #[command(display_order = 2)]
    Match(MatchArgs),

    /// Print the effective configuration
    #[command(display_order = 3)]
    Config,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Document to load (JSON node tree)
    pub document: PathBuf,

    /// Change a filter, in order (e.g. --set season=spring)
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub set: Vec<(String, String)>,

    /// Reset every control to its neutral selection after applying changes
    #[arg(long)]
    pub reset: bool,

    /// Element selector; disables auto-binding
    #[arg(long, value_name = "SELECTOR")]
    pub items: Option<String>,

    /// Status line selector
    #[arg(long, value_name = "SELECTOR")]
    pub status: Option<String>,

    /// Match mode (equals or contains)
    #[arg(long, value_name = "MODE")]
    pub mode: Option<MatchMode>,

    /// Match-all sentinel value
    #[arg(long = "all", value_name = "VALUE")]
    pub all_value: Option<String>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct MatchArgs {
    /// Element attribute (repeatable)
    #[arg(long = "attr", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub attrs: Vec<(String, String)>,

    /// Filter value (repeatable)
    #[arg(long = "filter", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub filters: Vec<(String, String)>,

    /// Match mode (equals or contains)
    #[arg(long, value_name = "MODE")]
    pub mode: Option<MatchMode>,

    /// Match-all sentinel value
    #[arg(long = "all", value_name = "VALUE")]
    pub all_value: Option<String>,
}

/// Parses `key=value`. The value may be empty or contain further `=`.
pub fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{}`", raw))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing key in `{}`", raw));
    }
    Ok((key.to_string(), value.to_string()))
}
