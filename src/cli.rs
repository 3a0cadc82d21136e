// Command-line interface definition.

use clap::{Parser, Subcommand};

/// Query the HFS exam results API and print JSON.
#[derive(Debug, Parser)]
#[command(name = "hfs", version, about = "Query the HFS exam results API")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Bearer token for the HFS backend
    #[arg(long, global = true, env = "HFS_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Backend base URL (overrides HFS_BASE_URL)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Request timeout in seconds (overrides HFS_TIMEOUT_SECS)
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: Option<u64>,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// All exams, newest first, with scores
    Exams,
    /// Signed-in user snapshot
    Snapshot,
    /// Overview of the most recent exam
    LastExam,
    /// Score overview for one exam
    Overview { exam_id: String },
    /// v4 overview (grade rank) for one exam
    OverviewV4 { exam_id: String },
    /// Rank info for one exam
    Rank { exam_id: String },
    /// Rank info for one paper of an exam
    PaperRank { exam_id: String, paper_id: String },
    /// Answer-sheet picture URLs for one paper
    Pictures {
        exam_id: String,
        paper_id: String,
        pid: String,
    },
    /// List the endpoint registry
    Endpoints,
}
