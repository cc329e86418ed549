// src/config.rs
// =============================================================================
// Runtime configuration, read from environment variables.
//
//   FOLLOW_CHECK_BEARER_TOKEN        app-only bearer token (required;
//                                    TWITTER_BEARER_TOKEN also works)
//   FOLLOW_CHECK_API_BASE            API root, default https://api.twitter.com/1.1/
//   FOLLOW_CHECK_TIMEOUT_SECS        per-request timeout, default 30, at least 1
//   FOLLOW_CHECK_LOOKUP_CONCURRENCY  max users/lookup requests in flight,
//                                    at least 1; default: all batches at once
//
// Command-line flags override whatever the environment says.
// =============================================================================

use std::env;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};

use crate::cli::Cli;

pub const DEFAULT_API_BASE: &str = "https://api.twitter.com/1.1/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    pub bearer_token: String,
    pub api_base: String,
    pub timeout: Duration,
    pub lookup_concurrency: Option<usize>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    // Same as from_env, but reads variables through `var` so tests don't
    // have to touch the process environment
    fn from_lookup<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bearer_token = var("FOLLOW_CHECK_BEARER_TOKEN")
            .or_else(|| var("TWITTER_BEARER_TOKEN"))
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                anyhow!("No API credentials: set FOLLOW_CHECK_BEARER_TOKEN (or TWITTER_BEARER_TOKEN)")
            })?;

        let api_base = var("FOLLOW_CHECK_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let timeout_secs = match var("FOLLOW_CHECK_TIMEOUT_SECS") {
            Some(raw) => parse_positive::<u64>(&raw)
                .with_context(|| format!("FOLLOW_CHECK_TIMEOUT_SECS is invalid: '{}'", raw))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let lookup_concurrency = match var("FOLLOW_CHECK_LOOKUP_CONCURRENCY") {
            Some(raw) => Some(parse_positive::<usize>(&raw).with_context(|| {
                format!("FOLLOW_CHECK_LOOKUP_CONCURRENCY is invalid: '{}'", raw)
            })?),
            None => None,
        };

        Ok(Config {
            bearer_token: bearer_token.trim().to_string(),
            api_base,
            timeout: Duration::from_secs(timeout_secs),
            lookup_concurrency,
        })
    }

    // Command-line flags win over the environment
    pub fn apply_cli(mut self, cli: &Cli) -> Self {
        if let Some(base) = &cli.api_base {
            self.api_base = base.clone();
        }
        if let Some(secs) = cli.timeout {
            self.timeout = Duration::from_secs(secs);
        }
        if let Some(limit) = cli.concurrency {
            self.lookup_concurrency = Some(limit);
        }
        self
    }
}

// Same rule as the matching CLI flags: a whole number, at least 1
fn parse_positive<T>(raw: &str) -> Result<T>
where
    T: std::str::FromStr + PartialEq + From<u8>,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value: T = raw.trim().parse()?;
    if value == T::from(0) {
        return Err(anyhow!("must be at least 1"));
    }
    Ok(value)
}
