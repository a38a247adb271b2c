use clap::{Parser, Subcommand};

/// CLI arguments for corpdb-cli
#[derive(Debug, Parser)]
#[command(
    name = "corpdb",
    version,
    about = "CLI for querying and inspecting a corpdb company-record index"
)]
pub struct CliArgs {
    /// Path to the corpus directory (default: the data/ dir bundled with corpdb-core)
    #[arg(short = 'd', long = "data-dir", global = true)]
    pub data_dir: Option<String>,

    /// Path to the index snapshot (default: colocated with the corpus)
    #[arg(short = 's', long = "snapshot", global = true)]
    pub snapshot: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show a summary of the index contents
    Stats,

    /// Rescan the corpus and rewrite the snapshot, even if one exists
    Build,

    /// Search company records by a substring of name or identifier
    Search {
        /// Substring to search (case-insensitive, minimum 2 characters)
        query: String,

        /// Caller identity used for rate accounting (default: loopback)
        #[arg(short = 'i', long = "identity", default_value = "")]
        identity: String,

        /// Skip rate limiting, as a privileged caller would
        #[arg(short = 'p', long = "privileged")]
        privileged: bool,
    },
}
