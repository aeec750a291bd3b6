//! Deprecated API Gate - CLI Entry Point
//!
//! Validates a gate configuration and shows what the gate would do with a set
//! of requests or registered routes.

use anyhow::{bail, Context, Result};
use clap::Parser;
use deprecated_api_gate::{DeprecationGate, GateConfig, GateDecision, RegisteredRoute};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(
    name = "deprecated-api-gate",
    about = "Check requests and routes against deprecated REST API declarations",
    version
)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "deprecated-api.yaml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'L', long, default_value = "info")]
    log_level: Level,

    /// Print default configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Validate configuration and exit
    #[arg(long)]
    validate: bool,

    /// Request to evaluate, as "METHOD URI" (repeatable)
    #[arg(long, value_name = "REQUEST")]
    check: Vec<String>,

    /// File with one "METHOD PATH" route per line; prints the routes the gate disables
    #[arg(long, value_name = "FILE")]
    routes: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    if args.print_config {
        let default_config = include_str!("../config/default-config.yaml");
        println!("{}", default_config);
        return Ok(());
    }

    // Load configuration
    let mut config = if args.config.exists() {
        info!(path = ?args.config, "Loading configuration");
        GateConfig::from_file(&args.config)?
    } else if args.validate {
        bail!("Configuration file not found: {:?}", args.config);
    } else {
        info!("Using default configuration");
        GateConfig::default()
    };
    config.apply_env()?;

    if args.validate {
        let patterns = config.api().patterns.as_ref().map_or(0, Vec::len);
        println!(
            "Configuration is valid (disabled: {}, patterns: {})",
            config.api().disabled,
            patterns
        );
        return Ok(());
    }

    let Some(gate) = DeprecationGate::from_config(config.api())? else {
        info!("Deprecated API gate is switched off, every request is allowed");
        return Ok(());
    };

    for request in &args.check {
        let (method, uri) = parse_request_line(request)
            .with_context(|| format!("invalid request {:?}, expected \"METHOD URI\"", request))?;
        match gate.evaluate(method, uri) {
            GateDecision::Continue => println!("ALLOW   [{}] {}", method, uri),
            GateDecision::Decline(err) => println!("DECLINE {}", err),
        }
    }

    if let Some(path) = &args.routes {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read routes file {:?}", path))?;
        let routes = parse_routes(&content)?;
        for line in gate.report_disabled_routes(&routes) {
            println!("{}", line);
        }
    }

    Ok(())
}

fn parse_request_line(line: &str) -> Option<(&str, &str)> {
    let mut parts = line.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(method), Some(uri), None) => Some((method, uri)),
        _ => None,
    }
}

fn parse_routes(content: &str) -> Result<Vec<RegisteredRoute>> {
    content
        .lines()
        .enumerate()
        .map(|(n, line)| (n + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(n, line)| match parse_request_line(line) {
            Some((method, path)) => Ok(RegisteredRoute::new(method.to_ascii_uppercase(), path)),
            None => bail!("line {}: expected \"METHOD PATH\", got {:?}", n, line),
        })
        .collect()
}
