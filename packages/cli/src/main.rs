#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI for computing the moderation dashboard's analytics offline.
//!
//! ```text
//! safesignal report --incidents incidents.json [--users users.json] [--period 7d]
//!     [--now 2025-06-18T12:00:00Z] [--utc-offset -300] [--config safesignal.toml] [--pretty]
//! safesignal periods
//! ```
//!
//! Logging goes to stderr and is controlled by `RUST_LOG`.

mod config;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use safesignal_analytics::{AnalysisContext, AnalyticsError, Snapshot, build_report};
use safesignal_analytics_models::Period;
use thiserror::Error;

use crate::config::{DashboardConfig, ReportArgs, Settings};

/// Errors surfaced by the CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Config file is not valid TOML of the expected shape.
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    /// A file could not be read.
    #[error("I/O error reading {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Loading or analysis failed.
    #[error(transparent)]
    Analytics(#[from] AnalyticsError),

    /// The report could not be serialized.
    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),

    /// No incident snapshot was given on the command line or in config.
    #[error("No incident snapshot given (use --incidents or set `incidents` in the config file)")]
    MissingIncidents,

    /// UTC offset is outside the representable range.
    #[error("UTC offset out of range: {minutes} minutes")]
    InvalidOffset {
        /// The rejected offset.
        minutes: i32,
    },
}

#[derive(Parser)]
#[command(name = "safesignal", about = "Moderation dashboard analytics")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the analytics report for a snapshot and print it as JSON
    Report {
        /// Incident snapshot (JSON array or object wrapping one)
        #[arg(long)]
        incidents: Option<PathBuf>,
        /// User snapshot for reporter names
        #[arg(long)]
        users: Option<PathBuf>,
        /// Reporting window: 7d, 30d, 90d or 1y
        #[arg(long)]
        period: Option<String>,
        /// Reference instant (RFC 3339). Defaults to the current time
        #[arg(long)]
        now: Option<String>,
        /// Offset from UTC in minutes for weekday/hour bucketing.
        /// Defaults to the machine's local offset
        #[arg(long, allow_hyphen_values = true)]
        utc_offset: Option<i32>,
        /// TOML config file; flags override its values
        #[arg(long)]
        config: Option<PathBuf>,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// List the accepted period tags
    Periods,
}

fn run_report(args: ReportArgs, config_path: Option<PathBuf>) -> Result<(), CliError> {
    let config = config_path
        .as_deref()
        .map(DashboardConfig::load)
        .transpose()?
        .unwrap_or_default();
    let settings = Settings::resolve(args, config)?;

    let mut ctx = AnalysisContext::current();
    if let Some(now) = settings.now {
        ctx.now = now;
    }
    if let Some(offset) = settings.offset {
        ctx.offset = offset;
    }
    log::info!(
        "Building {} report at {} (offset {})",
        settings.period,
        ctx.now,
        ctx.offset
    );

    let snapshot = Snapshot::load(&settings.incidents, settings.users.as_deref())?;
    let report = build_report(&snapshot, settings.period, &ctx);

    let quality = &report.data_quality;
    if quality.malformed_records > 0
        || quality.invalid_created_at > 0
        || quality.invalid_updated_at > 0
    {
        log::warn!(
            "{} malformed records skipped, {} skipped for a bad created_at, {} excluded from response times",
            quality.malformed_records,
            quality.invalid_created_at,
            quality.invalid_updated_at
        );
    }

    let json = if settings.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{json}");

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Report {
            incidents,
            users,
            period,
            now,
            utc_offset,
            config,
            pretty,
        } => {
            let args = ReportArgs {
                incidents,
                users,
                period,
                now,
                utc_offset,
                pretty,
            };
            run_report(args, config)?;
        }
        Commands::Periods => {
            for period in Period::all() {
                let tag: &str = period.as_ref();
                println!("{tag:<4} last {} days", period.days());
            }
        }
    }

    Ok(())
}
