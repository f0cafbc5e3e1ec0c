//! PatternOS CLI — query the ad-decisioning API from a terminal
//!
//! Usage:
//!   patternos-cli intent <user_id>                       Show a user's purchase intent
//!   patternos-cli recommendations <user_id> [--limit N]  List product recommendations
//!   patternos-cli campaigns                              List campaigns for the aggregator
//!   patternos-cli config                                 Show the resolved configuration

use anyhow::{bail, Context};
use patternos_sdk::client::DEFAULT_RECOMMENDATION_LIMIT;
use patternos_sdk::{AdClient, AdClientConfig};
use serde::Serialize;

#[tokio::main]
async fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let result = match args[1].as_str() {
        "intent" => cmd_intent(&args[2..]).await,
        "recommendations" | "recs" => cmd_recommendations(&args[2..]).await,
        "campaigns" => cmd_campaigns(&args[2..]).await,
        "config" => cmd_config(&args[2..]),
        "version" | "--version" | "-V" => {
            cmd_version();
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn print_usage() {
    println!(
        r#"patternos-cli — PatternOS ads API command-line tool

USAGE:
    patternos-cli <COMMAND> [OPTIONS] [--config <file.yaml>]

COMMANDS:
    intent <user_id>                      Show a user's purchase intent
    recommendations <user_id> [--limit N] List product recommendations (default 10)
    campaigns                             List campaigns for the configured aggregator
    config                                Show the resolved configuration (API key hidden)
    version                               Show version information
    help                                  Show this help message

ENVIRONMENT:
    PATTERNOS_API_KEY, PATTERNOS_AGGREGATOR   Credentials (unless --config is given)
    PATTERNOS_ENVIRONMENT                     production | staging | development
    PATTERNOS_API_URL                         Base URL override
    PATTERNOS_TIMEOUT_MS                      Per-call timeout (default 5000)
    RUST_LOG                                  Log filter, e.g. patternos_sdk=debug"#
    );
}

fn cmd_version() {
    println!("patternos-cli {}", env!("CARGO_PKG_VERSION"));
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

/// Positional arguments, skipping `--flag value` pairs.
fn positionals(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg.starts_with("--") {
            iter.next();
        } else {
            out.push(arg.as_str());
        }
    }
    out
}

fn load_config(args: &[String]) -> anyhow::Result<AdClientConfig> {
    match flag_value(args, "--config") {
        Some(path) => AdClientConfig::from_yaml_file(path)
            .with_context(|| format!("cannot load config from {path}")),
        None => AdClientConfig::from_env().context("cannot read PATTERNOS_* environment"),
    }
}

fn client(args: &[String]) -> anyhow::Result<AdClient> {
    Ok(AdClient::new(load_config(args)?)?)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn cmd_intent(args: &[String]) -> anyhow::Result<()> {
    let Some(user_id) = positionals(args).first().copied() else {
        bail!("usage: patternos-cli intent <user_id>");
    };
    let intent = client(args)?.get_user_intent(user_id).await?;
    print_json(&intent)
}

async fn cmd_recommendations(args: &[String]) -> anyhow::Result<()> {
    let Some(user_id) = positionals(args).first().copied() else {
        bail!("usage: patternos-cli recommendations <user_id> [--limit N]");
    };
    let limit = match flag_value(args, "--limit") {
        Some(raw) => raw
            .parse::<u32>()
            .with_context(|| format!("--limit expects a positive integer, got '{raw}'"))?,
        None => DEFAULT_RECOMMENDATION_LIMIT,
    };
    let recs = client(args)?.get_recommendations(user_id, limit).await?;
    print_json(&recs)
}

async fn cmd_campaigns(args: &[String]) -> anyhow::Result<()> {
    let campaigns = client(args)?.list_campaigns().await?;
    print_json(&campaigns)
}

fn cmd_config(args: &[String]) -> anyhow::Result<()> {
    let client = client(args)?;
    let config = client.config();
    println!("aggregator:  {}", config.aggregator);
    println!("environment: {}", config.environment);
    println!("base_url:    {}", client.base_url());
    println!("timeout:     {:?}", client.timeout());
    if let Some(share) = &config.revenue_share {
        println!(
            "revenue:     aggregator {}% / platform {}%",
            share.aggregator, share.platform
        );
    }
    Ok(())
}
