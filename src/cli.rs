// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Usage:
//   follow-check <FOLLOWED> <CANDIDATES>...
//
// FOLLOWED is the account whose followers we look through (a handle, or a
// numeric user id with --user-id). CANDIDATES are the handles to check.
// =============================================================================

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "follow-check",
    version = "0.1.0",
    about = "Check whether a list of accounts follow a given Twitter account",
    long_about = "follow-check pages through every follower of an account, resolves their handles, \
                  and reports which of the given candidates follow it. Credentials are read from \
                  FOLLOW_CHECK_BEARER_TOKEN."
)]
pub struct Cli {
    /// The followed account: a handle like "rustlang" (or a numeric id with --user-id)
    pub followed: String,

    /// Handles to check, e.g. alice Bob @carol (matched case-insensitively)
    #[arg(required = true, num_args = 1..)]
    pub candidates: Vec<String>,

    /// Treat FOLLOWED as a numeric user id instead of a handle
    #[arg(long)]
    pub user_id: bool,

    /// Output results in JSON format instead of a table
    #[arg(long)]
    pub json: bool,

    /// API base URL (overrides FOLLOW_CHECK_API_BASE)
    #[arg(long)]
    pub api_base: Option<String>,

    /// Per-request timeout in seconds, at least 1 (overrides FOLLOW_CHECK_TIMEOUT_SECS)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Max users/lookup requests in flight, at least 1 (overrides FOLLOW_CHECK_LOOKUP_CONCURRENCY)
    #[arg(long, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    pub concurrency: Option<usize>,
}
