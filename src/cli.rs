use clap::{Args, Parser, Subcommand};
use plarix::config::DEFAULT_CONFIG_PATH;
use plarix::github::DEFAULT_API_URL;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "plarix",
    version,
    about = "Estimate the LLM API spend delta of a pull request"
)]
pub struct Cli {
    /// Arguments for the default `check` command
    #[command(flatten)]
    pub check: CheckArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Build the report for the current pull request (default)
    Check(CheckArgs),

    /// Build the report from a local unified diff, without GitHub
    Render(RenderArgs),

    /// Show the pricing catalog
    Pricing(PricingArgs),
}

/// Inputs shared by every report-producing command
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Assumptions file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Pricing catalog JSON overriding the built-in one
    #[arg(long, env = "PLARIX_PRICING")]
    pub pricing: Option<PathBuf>,

    /// JSONL usage log measured on the base branch
    #[arg(long, env = "PLARIX_MEASURE_BASE")]
    pub measure_base: Option<PathBuf>,

    /// JSONL usage log measured on the head branch
    #[arg(long, env = "PLARIX_MEASURE_HEAD")]
    pub measure_head: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    #[command(flatten)]
    pub inputs: InputArgs,

    /// Token used to read the pull request and post the comment
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Repository as owner/name
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repo: Option<String>,

    /// Path to the pull_request event payload
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    pub event_path: Option<PathBuf>,

    /// Job summary file the report is appended to (stdout when unset)
    #[arg(long, env = "GITHUB_STEP_SUMMARY")]
    pub step_summary: Option<PathBuf>,

    /// GitHub REST API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Do not create or update the pull request comment
    #[arg(long)]
    pub no_comment: bool,
}

#[derive(Args, Debug, Clone)]
pub struct RenderArgs {
    #[command(flatten)]
    pub inputs: InputArgs,

    /// Unified diff to scan, `-` for stdin
    #[arg(short, long, default_value = "-")]
    pub diff: String,
}

#[derive(Args, Debug, Clone)]
pub struct PricingArgs {
    /// Pricing catalog JSON overriding the built-in one
    #[arg(long, env = "PLARIX_PRICING")]
    pub pricing: Option<PathBuf>,

    /// Print the catalog as JSON
    #[arg(long)]
    pub json: bool,

    /// Write the validated catalog as pricing JSON to this file
    #[arg(long, value_name = "PATH")]
    pub write: Option<PathBuf>,
}

impl Cli {
    /// Get the command to execute, defaulting to Check if none provided
    pub fn get_command(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or_else(|| Commands::Check(self.check.clone()))
    }
}

/// Actions sets unused inputs to empty strings; treat those as unset
pub fn non_empty_path(path: &Option<PathBuf>) -> Option<&std::path::Path> {
    path.as_deref().filter(|p| !p.as_os_str().is_empty())
}

pub fn non_empty_str(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
