//! Command-line parsing for the listing utilities.
//!
//! Argument parsing and command dispatch stay separate from the store and
//! verification code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cleanup::DEFAULT_MAX_ROUNDS;

pub mod confirm;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "listing-ops",
    version,
    about = "Audit, verify, clean up, and monitor the property-listing store"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Dump listings, report duplicate URLs, and show batch progress.
    Audit,
    /// Check listing records against the data-quality rules.
    Verify(VerifyArgs),
    /// Delete every document in the given collections.
    Cleanup(CleanupArgs),
    /// Look for price drops and send a notification.
    Monitor,
}

#[derive(Debug, Parser, Clone, Default)]
pub struct VerifyArgs {
    /// Only verify listings whose URL contains this text (repeatable, case-insensitive).
    #[arg(long = "url", value_name = "SUBSTR")]
    pub targets: Vec<String>,

    /// Write per-listing results to a JSON file.
    #[arg(long, value_name = "JSON")]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Parser, Clone)]
pub struct CleanupArgs {
    /// Collection to drain (repeatable). Defaults to `listings` and `batch_status`.
    #[arg(long = "collection", value_name = "NAME")]
    pub collections: Vec<String>,

    /// Upper bound on list/delete rounds per collection.
    #[arg(long, default_value_t = DEFAULT_MAX_ROUNDS)]
    pub max_rounds: usize,

    /// Skip the interactive confirmation.
    #[arg(long)]
    pub yes: bool,
}
