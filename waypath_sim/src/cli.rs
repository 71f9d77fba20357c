use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Waypath: plan smooth, velocity-profiled paths for holonomic robots and
/// replay them in simulated time.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Log filter, e.g. "debug" or "info,waypath_core=trace". Overrides RUST_LOG.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Plan a scenario, log its metrics and optionally export the document.
    Plan {
        /// The path to the scenario TOML file to plan.
        #[arg(short, long, default_value = "assets/scenarios/straight_line.toml")]
        scenario: PathBuf,

        /// Where to write the exported JSON document.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Replay a planned path through the simulation player.
    Replay(ReplayArgs),

    /// Plan every scenario under a directory and export one document each.
    Batch {
        #[arg(short, long, default_value = "assets/scenarios")]
        dir: PathBuf,

        #[arg(short, long)]
        out: PathBuf,
    },

    /// Turn an exported document back into a scenario TOML file.
    Convert {
        #[arg(short, long)]
        document: PathBuf,

        #[arg(short, long)]
        output: PathBuf,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ReplayArgs {
    /// Scenario TOML file to plan and replay.
    #[arg(short, long, conflicts_with = "document", required_unless_present = "document")]
    pub scenario: Option<PathBuf>,

    /// Exported JSON document to replan and replay.
    #[arg(short, long)]
    pub document: Option<PathBuf>,

    /// Override the scenario's speed factor.
    #[arg(long)]
    pub speed: Option<f64>,

    /// Feed a fixed dt per tick without sleeping.
    #[arg(long, default_value_t = false)]
    pub headless_fast: bool,
}
