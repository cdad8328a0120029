//! Command-line utilities for the ActiveCampaign tap harness.
//!
//! # Usage Examples
//!
//! ```bash
//! # Print the expected replication contract for every stream
//! tap-activecampaign-verify streams
//!
//! # Normalize a connector-emitted timestamp to canonical UTC form
//! tap-activecampaign-verify normalize "2020-08-25T13:17:36-07:00"
//!
//! # Compute the injection state for a second sync from a persisted-state file
//! tap-activecampaign-verify calculated-state --state state.json --minutes 1
//!
//! # Shift a start-date fixture by whole days
//! tap-activecampaign-verify shift-start-date "2021-12-01T00:00:00Z" --days 7
//! ```

use anyhow::Context;
use bookmark::{calculated_states, normalize, shift_start_date, BookmarkOffset, BookmarkState};
use clap::{Parser, Subcommand};
use stream_meta::StreamRegistry;

#[derive(Parser)]
#[command(name = "tap-activecampaign-verify")]
#[command(about = "Verification harness utilities for the ActiveCampaign tap")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the expected replication contract for every stream
    Streams,

    /// Normalize a connector-emitted timestamp to canonical UTC form
    Normalize {
        /// Timestamp in any format the connector is known to emit
        timestamp: String,
    },

    /// Compute the state to inject before a second sync run
    CalculatedState {
        /// Path to a persisted-state JSON file ({"bookmarks": {...}})
        #[arg(long)]
        state: std::path::PathBuf,

        /// Days to move each bookmark into the past
        #[arg(long, default_value = "0")]
        days: i64,

        /// Hours to move each bookmark into the past
        #[arg(long, default_value = "0")]
        hours: i64,

        /// Minutes to move each bookmark into the past
        #[arg(long, default_value = "1")]
        minutes: i64,
    },

    /// Shift a start-date fixture by whole days
    ShiftStartDate {
        /// Start date in the tap's configured format (YYYY-MM-DDT00:00:00Z)
        date: String,

        /// Days to add; negative values move the date back
        #[arg(long, allow_hyphen_values = true, default_value = "0")]
        days: i64,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Streams => {
            let registry = StreamRegistry::activecampaign();
            for spec in registry.iter() {
                let keys: Vec<&str> = spec
                    .replication_keys
                    .iter()
                    .map(|key| key.as_str())
                    .collect();
                println!(
                    "{}\t{}\t{}",
                    spec.name,
                    spec.replication_method,
                    keys.join(",")
                );
            }
        }

        Commands::Normalize { timestamp } => {
            println!("{}", normalize(&timestamp)?);
        }

        Commands::CalculatedState {
            state,
            days,
            hours,
            minutes,
        } => {
            let content = std::fs::read_to_string(&state)
                .with_context(|| format!("failed to read state file {}", state.display()))?;
            let current: BookmarkState =
                serde_json::from_str(&content).context("state file is not valid state JSON")?;

            let calculated =
                calculated_states(&current, BookmarkOffset::new(days, hours, minutes))?;
            println!("{}", serde_json::to_string_pretty(&calculated)?);
        }

        Commands::ShiftStartDate { date, days } => {
            println!("{}", shift_start_date(&date, days)?);
        }
    }

    Ok(())
}
