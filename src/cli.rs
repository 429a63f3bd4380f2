use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::store::diff::MatchBy;

#[derive(Parser)]
#[command(name = "fuelcheck")]
#[command(about = "Checks fuel station prices and mails a report when they change")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub global: GlobalArgs,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the scraper, compare with the last snapshot and send the report (default)
    Check(CheckArgs),

    /// Print the stored snapshot
    Show(ShowArgs),
}

#[derive(Args, Default, Debug, Clone)]
pub struct GlobalArgs {
    /// Config file (defaults to the platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Snapshot file location
    #[arg(long, global = true)]
    pub state: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Args, Default, Debug, Clone)]
pub struct CheckArgs {
    /// Scraper program to run
    #[arg(long)]
    pub scraper: Option<String>,

    /// Argument passed to the scraper, repeatable
    #[arg(long = "scraper-arg", allow_hyphen_values = true)]
    pub scraper_args: Vec<String>,

    /// Pair stations between snapshots by list position or by name
    #[arg(long, value_enum)]
    pub match_by: Option<MatchBy>,

    /// Only mail when prices changed or on the first run
    #[arg(long, default_value_t = false)]
    pub no_always_notify: bool,

    /// Print the report instead of mailing it
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Exit non-zero when the check fails
    #[arg(long, default_value_t = false)]
    pub strict: bool,
}

#[derive(Args, Default, Debug, Clone)]
pub struct ShowArgs {
    /// Output the raw snapshot JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}
