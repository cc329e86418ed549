// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Set up logging (tracing, to stderr, RUST_LOG controls the level)
// 2. Parse command-line arguments and load configuration
// 3. Ask the resolver which candidates follow the given account
// 4. Print the results as a table or JSON
// 5. Exit with a code: 0 = everyone follows, 1 = someone doesn't, 2 = error
// =============================================================================

mod cli;
mod config;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use config::Config;
use follow_check::{AccountRef, FollowingReport, FollowingStatusResolver, HttpApiClient};

#[tokio::main]
async fn main() {
    // Logs go to stderr so stdout stays clean for --json
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "follow_check=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = every candidate follows the account
//   Ok(1) = at least one candidate doesn't
//   Err   = bad input, missing credentials, or an API failure
async fn run() -> Result<i32> {
    let cli = Cli::parse();
    let config = Config::from_env()?.apply_cli(&cli);

    let followed = if cli.user_id {
        AccountRef::new(None, Some(cli.followed.as_str()))?
    } else {
        AccountRef::new(Some(cli.followed.as_str()), None)?
    };

    let client = HttpApiClient::new(&config.api_base, &config.bearer_token, config.timeout)
        .context("Could not set up the API client")?;
    let resolver =
        FollowingStatusResolver::new(&client).with_lookup_concurrency(config.lookup_concurrency);

    info!(
        followed = %followed,
        candidates = cli.candidates.len(),
        api = %config.api_base,
        "checking following status"
    );

    let report = resolver
        .report(&followed, &cli.candidates)
        .await
        .with_context(|| format!("Could not check the followers of {}", followed))?;

    print_report(&report, cli.json)?;

    if report.statuses.all_following() {
        Ok(0)
    } else {
        Ok(1)
    }
}

fn print_report(report: &FollowingReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print_table(report);
    }
    Ok(())
}

fn print_table(report: &FollowingReport) {
    println!("{:<40} {:<20}", "ACCOUNT", "STATUS");
    println!("{}", "=".repeat(60));

    for (handle, following) in report.statuses.iter() {
        let status = if following { "✅ FOLLOWING" } else { "❌ NOT FOLLOWING" };
        println!("{:<40} {:<20}", handle, status);
    }

    println!();
    println!("📊 Summary for {} ({} followers):", report.followed, report.follower_count);
    println!("   ✅ Following: {}", report.statuses.following_count());
    println!(
        "   ❌ Not following: {}",
        report.statuses.len() - report.statuses.following_count()
    );

    if !report.unresolved_ids.is_empty() {
        println!(
            "   ⚠️  Unresolved followers: {} (protected/suspended accounts count as not following)",
            report.unresolved_ids.len()
        );
    }
}
