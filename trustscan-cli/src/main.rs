//! TrustScan CLI
//!
//! Composite website trust checks from independent signal probes.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use trustscan_core::{sentiment_report, AggregateReport, Target};
use trustscan_probes::ReviewSentimentProbe;
use trustscan_runtime::{Orchestrator, ScanConfig};

#[derive(Parser)]
#[command(name = "trustscan")]
#[command(author, version, about = "TrustScan: composite website trust scoring", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level (0-3)
    #[arg(short, long, default_value = "1")]
    verbose: u8,

    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every probe against a domain or URL and print the report
    Check {
        /// Domain or URL to check
        #[arg(short, long)]
        url: String,

        /// Threat lookup API key (or set GOOGLE_API_KEY env var)
        #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
        google_api_key: Option<String>,

        /// Registration lookup API key (or set WHOIS_API_KEY env var)
        #[arg(long, env = "WHOIS_API_KEY", hide_env_values = true)]
        whois_api_key: Option<String>,

        /// Refuse to run probes unless the URL answers 200 OK
        #[arg(long)]
        require_reachable: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check whether a URL answers 200 OK
    Exists {
        /// URL to check
        #[arg(short, long)]
        url: String,
    },

    /// Print the review sentiment report for a domain
    Reviews {
        /// Domain or URL whose reviews to analyze
        #[arg(short, long)]
        url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = match cli.verbose {
        0 => Level::ERROR,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let config = match &cli.config {
        Some(path) => ScanConfig::load(path)?,
        None => ScanConfig::default(),
    };

    match cli.command {
        Commands::Check {
            url,
            google_api_key,
            whois_api_key,
            require_reachable,
            json,
        } => {
            let config = config.with_credentials(google_api_key, whois_api_key);
            run_check(&url, config, require_reachable, json).await?;
        }
        Commands::Exists { url } => {
            check_exists(&url).await?;
        }
        Commands::Reviews { url } => {
            run_reviews(&url, config).await?;
        }
    }

    Ok(())
}

async fn run_check(input: &str, config: ScanConfig, require_reachable: bool, json: bool) -> Result<()> {
    // Input errors are rejected before any probe runs
    let target = Target::parse(input)?;

    if require_reachable && !trustscan_web::check_url_exists(&target.url).await? {
        bail!("{} does not exist or is unreachable", target.url);
    }

    if config.blacklist.api_key.is_none() {
        tracing::warn!("No threat lookup API key; blacklist probe will score 0.0");
    }
    if config.whois.api_key.is_none() {
        tracing::warn!("No registration lookup API key; domain age probe will score 0.0");
    }

    let orchestrator = Orchestrator::from_config(&config)?;
    let report = orchestrator.check_target(&target).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

fn print_report(report: &AggregateReport) {
    println!("🔍 Target: {}", report.target);
    println!("🆔 Check: {}", report.check_id);
    println!("{}", "=".repeat(60));

    for (kind, result) in &report.per_probe {
        let marker = if result.is_ok() { "✅" } else { "⚠️ " };
        let note = result
            .error_message()
            .map(|e| format!("  ({})", e))
            .unwrap_or_default();
        println!("{} {:<18} {:.2}{}", marker, kind.name(), result.score, note);
    }

    println!("{}", "=".repeat(60));
    println!("📊 Final score: {:.2}", report.final_score);
}

async fn check_exists(url: &str) -> Result<()> {
    let target = Target::parse(url)?;

    if trustscan_web::check_url_exists(&target.url).await? {
        println!("✅ The URL '{}' exists.", target.url);
    } else {
        println!("❌ The URL '{}' does not exist or is unreachable.", target.url);
    }

    Ok(())
}

async fn run_reviews(url: &str, config: ScanConfig) -> Result<()> {
    let target = Target::parse(url)?;
    println!("Checking reviews for {}...\n", target.bare_domain);

    let probe = ReviewSentimentProbe::from_config(config.reviews)?;
    let summary = probe.collect(&target).await?;

    if summary.reviews.is_empty() {
        println!("No reviews found or unable to scrape the website.");
        return Ok(());
    }

    print!(
        "{}",
        sentiment_report(&summary.domain, &summary.distribution, summary.reviews.len())
    );
    Ok(())
}
