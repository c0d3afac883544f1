use clap::{Args, Parser, Subcommand};

use crate::models::recommendation::{Matching, Strategy};

#[derive(Parser)]
#[command(
    name = "pair-sight",
    version,
    about = "Pair programming matrix and pairing recommendations from git history"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Pretty-print JSON output (default: compact)
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Path to configuration file
    #[arg(long, global = true)]
    pub config: Option<std::path::PathBuf>,
}

/// Repository, window and team selection shared by analysis commands.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Git repository directory
    #[arg(short, long, default_value = ".")]
    pub dir: String,

    /// Time window: <N>d, <N>w, <N>m, <N>y or YYYY-MM-DD..YYYY-MM-DD (default: config, "1w")
    #[arg(short, long)]
    pub window: Option<String>,

    /// Team file (default: <dir>/.team when present)
    #[arg(short, long)]
    pub team: Option<String>,

    /// Team section to include (repeatable)
    #[arg(short, long = "section")]
    pub sections: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show how many days each pair of developers worked together
    Matrix {
        #[command(flatten)]
        args: AnalyzeArgs,
    },

    /// Suggest who should pair next
    Recommend {
        #[command(flatten)]
        args: AnalyzeArgs,

        /// Ranking strategy (default: config, least-paired)
        #[arg(long, value_enum)]
        strategy: Option<Strategy>,

        /// Matching policy for least-paired (default: config, greedy)
        #[arg(long, value_enum)]
        matching: Option<Matching>,

        /// Skip recommendations above this many developers (max 20)
        #[arg(long)]
        max_developers: Option<usize>,
    },

    /// Check git availability
    Doctor,

    /// NDJSON streaming session (stdin → stdout)
    Session,

    /// Start MCP (Model Context Protocol) server over stdio
    Mcp,

    /// Generate default configuration file
    Init {
        /// Path to write the configuration file (default: ~/.config/pair-sight/config.toml)
        #[arg(short, long)]
        path: Option<std::path::PathBuf>,
    },
}
