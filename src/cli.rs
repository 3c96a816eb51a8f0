use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "siteflow", version, about = "Scripted site-journey automation driver")]
pub struct Cli {
    /// Configuration file (TOML). Defaults to the user config directory.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Also append JSON logs to this file.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Execute the configured journey end to end.
    Run(RunArgs),

    /// Print the resolved journey steps without touching a browser.
    Plan,
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Drive a scripted in-memory page instead of a browser, with settle
    /// delays collapsed.
    #[arg(long)]
    pub dry_run: bool,

    /// Run the browser headless (default true); pass `--headless=false`
    /// for a visible window.
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub headless: Option<bool>,

    /// Browser binary to launch.
    #[arg(long)]
    pub chrome_path: Option<PathBuf>,

    /// Write a PNG of the final page state to this path.
    #[arg(long)]
    pub screenshot: Option<PathBuf>,

    /// Override the element readiness timeout, e.g. "10s" or "1500ms".
    #[arg(long, value_parser = humantime::parse_duration)]
    pub element_timeout: Option<Duration>,

    /// Print the journey report as JSON instead of the text summary.
    #[arg(long)]
    pub json: bool,
}
