//! CLI module for revfeed - command-line interface and subcommands.
//!
//! Provides the main entry point with subcommands for running the feedback
//! pipeline on local files or OpenReview notes, and for checking
//! architecture strings.

pub mod commands;

pub use commands::Cli;
