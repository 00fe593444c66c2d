// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (tracing, filtered by RUST_LOG or --log-level)
// 3. Build the HTTP fetcher and hook up Ctrl-C / SIGTERM / SIGUSR1
// 4. Run the crawl, printing each result as it arrives
// 5. Print a summary and exit with the proper code
//    (0 = run ended normally, 1 = too many errors, 2 = internal error)
// =============================================================================

mod cli;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use deepcrawl::crawl::{Outcome, Reporter};
use deepcrawl::fetch::HttpFetcher;
use deepcrawl::run::{run_crawl, Budget, RunReport, RunState};
use deepcrawl::signals::Triggers;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{e:#}");
            2
        }
    };

    std::process::exit(exit_code);
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Logs on stderr; stdout carries the crawl results
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<i32> {
    let config = cli.to_config();
    config.validate()?;

    let domain = if config.same_domain {
        config.seed_domain()
    } else {
        None
    };
    let fetcher = Arc::new(HttpFetcher::new(config.request_timeout, domain)?);

    let triggers = Triggers::from_os_signals().context("failed to install signal handlers")?;

    let report = run_crawl(&config, fetcher, triggers, outcome_printer(cli.json)).await?;

    print_summary(&report);

    match report.state {
        RunState::BudgetExhausted(Budget::Errors) => Ok(1),
        _ => Ok(0),
    }
}

// Prints results to stdout as they arrive.
// Plain mode shows successes only (failures are already logged);
// JSON mode emits every outcome.
fn outcome_printer(json: bool) -> Reporter {
    Box::new(move |outcome: &Outcome| {
        if json {
            match serde_json::to_string(outcome) {
                Ok(line) => println!("{line}"),
                Err(e) => tracing::error!(error = %e, "failed to serialize outcome"),
            }
        } else if outcome.is_success() {
            println!("{outcome}");
        }
    })
}

fn print_summary(report: &RunReport) {
    eprintln!();
    eprintln!("📊 Summary ({}):", report.state);
    eprintln!("   ✅ Crawled: {}", report.successes);
    eprintln!("   ❌ Failed: {}", report.failures);
    eprintln!("   📋 Claimed: {}", report.claimed);
    eprintln!("   ⏱️  Elapsed: {:.2?}", report.elapsed);
}
