//! Lead scan runner
//!
//! Reads leads as JSON, scans their websites and writes one result record per
//! lead as a JSON line.

mod batch;
mod config;
mod record;

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lead_scanner::{Lead, Scanner};
use serde_json::Value;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

#[derive(Parser)]
#[command(name = "lead-scan")]
#[command(about = "Qualify business leads by scanning their websites")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a JSON array of leads
    Batch {
        /// Input file, or `-` for stdin
        #[arg(long, default_value = "-")]
        input: String,

        /// Output file for JSON lines (default: stdout)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Maximum scans in flight
        #[arg(long)]
        concurrency: Option<usize>,
    },

    /// Scan a single website
    Url {
        url: String,

        #[arg(long)]
        city: Option<String>,

        #[arg(long, default_value = "Ad-hoc lead")]
        name: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (stderr, so stdout stays machine-readable)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,lead_scanner=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(true)
                .with_line_number(true),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;
    let scanner = Scanner::new(config.scan_config()).context("Failed to build HTTP client")?;

    match cli.command {
        Commands::Batch {
            input,
            output,
            concurrency,
        } => {
            let rows = read_rows(&input)?;
            let mut out: Box<dyn Write> = match &output {
                Some(path) => Box::new(BufWriter::new(
                    File::create(path)
                        .with_context(|| format!("Failed to create {}", path.display()))?,
                )),
                None => Box::new(BufWriter::new(io::stdout().lock())),
            };

            let concurrency = concurrency.unwrap_or(config.concurrency);
            let summary = batch::run_batch(&scanner, rows, concurrency, |record| {
                serde_json::to_writer(&mut out, record)?;
                writeln!(out)?;
                Ok(())
            })
            .await?;
            out.flush().context("Failed to flush output")?;

            eprintln!(
                "Processed {} leads ({} failed, {} unreachable); confidence low={} medium={} high={}",
                summary.processed,
                summary.failed,
                summary.unreachable,
                summary.low,
                summary.medium,
                summary.high,
            );
        }
        Commands::Url { url, city, name } => {
            let lead = Lead {
                business_name: name,
                city,
                ..Default::default()
            }
            .with_website(url);
            let result = scanner.scan(&lead).await;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}

/// Read a JSON array of lead rows from a file or stdin.
fn read_rows(input: &str) -> Result<Vec<Value>> {
    let raw = if input == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read leads from stdin")?;
        buf
    } else {
        std::fs::read_to_string(input).with_context(|| format!("Failed to read {input}"))?
    };

    serde_json::from_str(&raw).context("Input must be a JSON array of leads")
}
