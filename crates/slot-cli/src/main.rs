//! `slots` CLI — validate weekly availability and resolve bookable slots.
//!
//! ## Usage
//!
//! ```sh
//! # Validate a schedule form (stdin → stdout)
//! echo '{"timezone":"UTC","availabilities":[...]}' | slots validate
//!
//! # Resolve bookable starts for a request file
//! slots resolve -i request.json
//!
//! # Resolve with a custom booking policy, printed in the owner's local time
//! slots resolve -i request.json --config policy.json --format text
//!
//! # Explain whether one start is bookable under the same policy
//! slots check -i request.json --start 2026-03-16T09:00:00Z --config policy.json
//! ```
//!
//! Logging goes to stderr and honours `RUST_LOG`; `--verbose` enables debug output.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Deserialize;
use slot_engine::format::{format_duration, format_utc_offset};
use slot_engine::schedule::format_time_of_day;
use slot_engine::weekday::day_of_week_at;
use slot_engine::{
    BookingPolicy, BusyInterval, CalendarEntry, Interval, Schedule, ScheduleForm,
};
use std::io::{self, Read};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "slots",
    version,
    about = "Validate weekly availability and resolve bookable meeting slots"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging on stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a schedule form and report field-scoped violations
    Validate {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Resolve which candidate starts are bookable
    Resolve {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Booking policy JSON file (defaults apply if omitted)
        #[arg(long)]
        config: Option<String>,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
    /// Check a single start and list any busy conflicts
    Check {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Proposed start (RFC 3339)
        #[arg(long)]
        start: String,
        /// Booking policy JSON file (defaults apply if omitted)
        #[arg(long)]
        config: Option<String>,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// JSON array of RFC 3339 instants
    Json,
    /// One line per slot in the schedule's local time
    Text,
}

/// A resolution request as read from JSON.
#[derive(Deserialize)]
struct Request {
    schedule: Option<Schedule>,
    #[serde(default)]
    busy: Vec<CalendarEntry>,
    duration_minutes: i64,
    /// Explicit candidates; generated from `now` and the policy when omitted.
    candidates: Option<Vec<DateTime<Utc>>>,
    /// Anchor for candidate generation; the system clock when omitted.
    now: Option<DateTime<Utc>>,
}

impl Request {
    fn timezone(&self) -> Result<Tz> {
        match &self.schedule {
            Some(schedule) => schedule
                .tz()
                .with_context(|| format!("Schedule for '{}' has a bad timezone", schedule.owner_id)),
            None => Ok(Tz::UTC),
        }
    }

    fn busy_intervals(&self, tz: Tz) -> Vec<BusyInterval> {
        slot_engine::normalize_entries(&self.busy, tz)
    }

    fn candidates(&self, policy: &BookingPolicy, tz: Tz) -> Result<Vec<DateTime<Utc>>> {
        match &self.candidates {
            Some(candidates) => Ok(candidates.clone()),
            None => {
                let now = self.now.unwrap_or_else(Utc::now);
                slot_engine::generate_candidates(now, policy, tz)
                    .context("Failed to generate candidates")
            }
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Validate { input } => {
            let json = read_input(input.as_deref())?;
            let form: ScheduleForm =
                serde_json::from_str(&json).context("Failed to parse schedule form JSON")?;

            match form.validate() {
                Ok(windows) => {
                    info!(windows = windows.len(), "schedule form is valid");
                    println!("ok");
                }
                Err(violations) => {
                    let pretty = serde_json::to_string_pretty(&violations)?;
                    println!("{}", pretty);
                    anyhow::bail!("{} availability violation(s)", violations.len());
                }
            }
        }
        Commands::Resolve {
            input,
            output,
            config,
            format,
        } => {
            let policy = load_policy(config.as_deref())?;
            let request = parse_request(&read_input(input.as_deref())?)?;
            policy.check_duration(request.duration_minutes)?;

            let tz = request.timezone()?;
            let candidates = request.candidates(&policy, tz)?;
            let busy = request.busy_intervals(tz);
            debug!(candidates = candidates.len(), busy = busy.len(), "resolving");

            let valid = slot_engine::resolve_with_policy(
                &candidates,
                request.duration_minutes,
                request.schedule.as_ref(),
                &busy,
                policy.dst_policy,
            )
            .context("Failed to resolve slots")?;

            let rendered = match format {
                OutputFormat::Json => {
                    let strings: Vec<String> = valid.iter().map(|dt| dt.to_rfc3339()).collect();
                    serde_json::to_string_pretty(&strings)?
                }
                OutputFormat::Text => render_text(&valid, request.duration_minutes, tz),
            };
            write_output(output.as_deref(), &rendered)?;
        }
        Commands::Check {
            input,
            start,
            config,
        } => {
            let policy = load_policy(config.as_deref())?;
            let request = parse_request(&read_input(input.as_deref())?)?;
            policy.check_duration(request.duration_minutes)?;
            let start = DateTime::parse_from_rfc3339(&start)
                .with_context(|| format!("Invalid --start datetime: {}", start))?
                .with_timezone(&Utc);

            let tz = request.timezone()?;
            let busy = request.busy_intervals(tz);
            let valid = slot_engine::resolve_with_policy(
                &[start],
                request.duration_minutes,
                request.schedule.as_ref(),
                &busy,
                policy.dst_policy,
            )?;

            let meeting = Interval::starting_at(start, request.duration_minutes)?;
            let conflicts = slot_engine::find_conflicts(&meeting, &busy);

            if valid.is_empty() {
                println!("unavailable: {}", start.to_rfc3339());
                if conflicts.is_empty() {
                    println!("  outside availability");
                }
            } else {
                println!("available: {}", start.to_rfc3339());
            }
            for conflict in &conflicts {
                println!(
                    "  conflicts with busy {} - {} ({} min overlap)",
                    conflict.busy.start.to_rfc3339(),
                    conflict.busy.end.to_rfc3339(),
                    conflict.overlap_minutes
                );
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_policy(path: Option<&str>) -> Result<BookingPolicy> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path))?;
            BookingPolicy::from_json(&json)
                .with_context(|| format!("Failed to load booking policy from {}", path))
        }
        None => Ok(BookingPolicy::default()),
    }
}

fn parse_request(json: &str) -> Result<Request> {
    serde_json::from_str(json).context("Failed to parse request JSON")
}

/// One line per slot: local date, time range, weekday, and offset.
fn render_text(valid: &[DateTime<Utc>], duration_minutes: i64, tz: Tz) -> String {
    if valid.is_empty() {
        return "No available slots\n".to_string();
    }

    let mut out = format!(
        "{} slot(s) of {} in {}\n",
        valid.len(),
        format_duration(duration_minutes.try_into().unwrap_or(0)),
        tz.name()
    );
    for slot in valid {
        let local = slot.with_timezone(&tz);
        let end = (*slot + chrono::Duration::minutes(duration_minutes)).with_timezone(&tz);
        out.push_str(&format!(
            "{} {}-{} {} ({})\n",
            local.format("%Y-%m-%d"),
            format_time_of_day(local.time()),
            format_time_of_day(end.time()),
            day_of_week_at(*slot, tz),
            format_utc_offset(tz, *slot)
        ));
    }
    out
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
            print!("{}", content);
        }
    }
    Ok(())
}
