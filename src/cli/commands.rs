//! CLI command definitions using clap.
//!
//! - run: feedback for a local paper and review
//! - openreview: feedback for a review fetched from OpenReview
//! - check: validate an architecture string

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Revfeed - LLM feedback on peer reviews
#[derive(Parser, Debug)]
#[command(name = "revfeed")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Options shared by every command that runs the pipeline
#[derive(Args, Debug, Clone, Default)]
pub struct RunOptions {
    /// Architecture string, e.g. "Actor(2)->Aggregator->FeedbackCritic->Formatter"
    #[arg(short, long)]
    pub architecture: Option<String>,

    /// Write the JSON report to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Audit the final feedback with the LLM judge
    #[arg(long)]
    pub audit: bool,
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate feedback for a local paper and review
    Run {
        /// Paper file (PDF or text)
        #[arg(short, long)]
        paper: PathBuf,

        /// Review file (OpenReview note JSON or text)
        #[arg(short, long)]
        review: PathBuf,

        #[command(flatten)]
        options: RunOptions,
    },

    /// Generate feedback for a review hosted on OpenReview
    #[command(name = "openreview")]
    OpenReview {
        /// Submission (forum) id
        #[arg(long)]
        paper_id: String,

        /// Review note id
        #[arg(long, required_unless_present = "reviewer_id", conflicts_with = "reviewer_id")]
        review_id: Option<String>,

        /// Anonymous reviewer id, e.g. "AbCd" from "Reviewer_AbCd"
        #[arg(long)]
        reviewer_id: Option<String>,

        #[command(flatten)]
        options: RunOptions,
    },

    /// Parse an architecture string and print the stage sequence
    Check {
        /// Architecture string to check
        architecture: String,
    },
}
