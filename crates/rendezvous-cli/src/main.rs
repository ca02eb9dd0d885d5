//! `rendezvous` CLI - rank proposed meeting slots and explore common availability.
//!
//! ## Usage
//!
//! ```sh
//! # Rank the slots of an event stored in a snapshot file
//! rendezvous recommend -i snapshot.json --event 6f1c...e2
//!
//! # Same, rendered as a table in Pacific time
//! rendezvous --tz America/Los_Angeles recommend -i snapshot.json --format table
//!
//! # Common availability across several ranges, at least 60 minutes long
//! rendezvous common -i ranges.json --min-duration 60
//!
//! # Show an instant in another zone
//! rendezvous convert --time 2026-03-02T17:00:00Z --tz Europe/Berlin
//! ```
//!
//! Logs go to stderr; filter with `RENDEZVOUS_LOG` or `--log`.

mod config;

use std::io::{self, Read};

use anyhow::{bail, Context, Result};
use chrono::Duration;
use chrono_tz::Tz;
use clap::{Parser, Subcommand, ValueEnum};
use rendezvous_core::model::{Recommendation, RecommendationResponse, UserSummary};
use rendezvous_core::{common_slots, tz, InMemoryStore, Recommender, Snapshot, TimeRange};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use crate::config::Config;

#[derive(Parser)]
#[command(
    name = "rendezvous",
    version,
    about = "Rank proposed meeting slots by attendee availability"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log filter directive (overrides RENDEZVOUS_LOG)
    #[arg(long, global = true)]
    log: Option<String>,

    /// IANA timezone for human-readable output (overrides RENDEZVOUS_TIMEZONE)
    #[arg(long, global = true)]
    tz: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank an event's proposed slots from a snapshot file
    Recommend {
        /// Snapshot JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Event id; may be omitted when the snapshot holds a single event
        #[arg(short, long)]
        event: Option<Uuid>,
        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },
    /// Intersect a JSON array of {start, end} ranges
    Common {
        /// Ranges JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Drop common ranges shorter than this many minutes
        #[arg(long, default_value_t = 0)]
        min_duration: i64,
    },
    /// Show an RFC 3339 instant in the display timezone
    Convert {
        /// Instant to convert, e.g. 2026-03-02T17:00:00Z
        #[arg(long)]
        time: String,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Table,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env().with_overrides(cli.log, cli.tz);
    init_logging(&config);
    let display_tz = config.display_timezone()?;

    match cli.command {
        Commands::Recommend {
            input,
            output,
            event,
            format,
        } => {
            let json = read_input(input.as_deref())?;
            let snapshot = Snapshot::from_json(&json).context("Failed to parse snapshot JSON")?;
            let event_id = resolve_event(&snapshot, event)?;
            debug!(%event_id, "ranking slots");

            let store = InMemoryStore::from_snapshot(snapshot);
            let recommender = Recommender::new(&store, &store, &store, &store);
            let response = recommender
                .recommend(event_id)
                .with_context(|| format!("Failed to compute recommendations for {}", event_id))?;

            let rendered = match format {
                Format::Json => serde_json::to_string_pretty(&response)?,
                Format::Table => render_table(&response, display_tz),
            };
            write_output(output.as_deref(), &rendered)?;
        }
        Commands::Common {
            input,
            output,
            min_duration,
        } => {
            if min_duration < 0 {
                bail!("--min-duration must not be negative (got {})", min_duration);
            }
            let min_duration = Duration::try_minutes(min_duration)
                .with_context(|| format!("--min-duration is too large (got {})", min_duration))?;
            let json = read_input(input.as_deref())?;
            let ranges: Vec<TimeRange> =
                serde_json::from_str(&json).context("Failed to parse ranges JSON")?;
            let common = common_slots(&ranges, min_duration);
            write_output(output.as_deref(), &serde_json::to_string_pretty(&common)?)?;
        }
        Commands::Convert { time } => {
            let instant =
                tz::parse_instant(&time).with_context(|| format!("Failed to parse time: {}", time))?;
            println!(
                "{} ({})",
                tz::format_in_timezone(instant, &config.timezone)?,
                tz::abbreviation(&config.timezone, instant)?
            );
        }
    }

    Ok(())
}

fn init_logging(config: &Config) {
    let filter = EnvFilter::try_new(&config.log_filter)
        .unwrap_or_else(|_| EnvFilter::new(config::DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Pick the event to rank: the explicit id, or the only event in the snapshot.
fn resolve_event(snapshot: &Snapshot, requested: Option<Uuid>) -> Result<Uuid> {
    if let Some(id) = requested {
        return Ok(id);
    }
    match snapshot.events.as_slice() {
        [only] => Ok(only.id),
        [] => bail!("Snapshot contains no events"),
        many => bail!(
            "Snapshot contains {} events; choose one with --event",
            many.len()
        ),
    }
}

fn render_table(response: &RecommendationResponse, tz: Tz) -> String {
    if response.recommendations.is_empty() {
        return "No slot can hold the meeting.\n".to_string();
    }
    let mut out = String::new();
    for (rank, rec) in response.recommendations.iter().enumerate() {
        out.push_str(&render_row(rank + 1, rec, tz));
        out.push('\n');
    }
    out
}

fn render_row(rank: usize, rec: &Recommendation, tz: Tz) -> String {
    let start = rec.time_slot.start_time.with_timezone(&tz);
    let end = rec.time_slot.end_time.with_timezone(&tz);
    format!(
        "#{rank}  score {}  {} - {}  attending: {}  missing: {}",
        rec.score,
        start.format("%Y-%m-%d %H:%M"),
        end.format("%H:%M %Z"),
        names(&rec.attendees),
        names(&rec.non_attendees),
    )
}

fn names(users: &[UserSummary]) -> String {
    if users.is_empty() {
        return "-".to_string();
    }
    users
        .iter()
        .map(|u| u.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content.trim_end());
        }
    }
    Ok(())
}
