use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rulegate", version, about = "Ruling regression harness")]
pub struct Cli {
    /// Run a single rule instead of the whole battery
    pub rule: Option<String>,

    /// Rewrite baselines from this run instead of checking against them
    #[arg(long)]
    pub update: bool,

    /// Corpus root containing target descriptors
    #[arg(long, value_name = "DIR")]
    pub corpus: Option<PathBuf>,

    /// Directory holding per-rule baseline files
    #[arg(long, value_name = "DIR")]
    pub snapshots: Option<PathBuf>,

    /// Worker pool size (default: available parallelism)
    #[arg(long, short)]
    pub jobs: Option<usize>,

    /// Per-target timeout in seconds (0 disables)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Emit the verdict as JSON instead of console output
    #[arg(long)]
    pub json: bool,

    /// Enable verbose logging
    #[arg(long, short)]
    pub verbose: bool,
}
