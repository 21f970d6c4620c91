//! `planner` CLI: check a timetable snapshot from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # List every tutor/location double-booking
//! planner conflicts -i planner.json
//!
//! # Same, as JSON
//! planner conflicts -i planner.json --json
//!
//! # Run all save-time checks for one course (exit code 2 if blocking)
//! planner check course-42 -i planner.json
//!
//! # Is a tutor free on Monday 09:00-11:00?
//! planner available --tutor t1 --day 1 --start 09:00 --end 11:00 -i planner.json
//!
//! # Which planning week is it?
//! planner week -i planner.json --today 2024-10-01
//!
//! # Override the period table / travel buffer
//! planner --config planner-config.json conflicts -i planner.json
//! ```

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};
use std::io::{self, Read};
use std::process;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use planner_engine::calendar::{self, day_name};
use planner_engine::{
    assess_course, current_week, detect_all_conflicts, is_location_available,
    is_tutor_available, week_start_date, PlannerConfig, Snapshot,
};

/// Exit code when a course fails a blocking check.
const EXIT_BLOCKING: i32 = 2;

#[derive(Parser)]
#[command(
    name = "planner",
    version,
    about = "Course timetable constraint checker"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON file overriding the period table, travel buffer, or planning horizon
    #[arg(long, global = true)]
    config: Option<String>,

    /// Log engine decisions to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List every tutor and location double-booking in the snapshot
    Conflicts {
        /// Snapshot file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Print conflict records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run every save-time check for one course
    Check {
        /// Id of the course to check
        course_id: String,
        /// Snapshot file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Print the assessment as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check whether a tutor or location is available for a time range
    Available {
        /// Tutor id
        #[arg(long, conflicts_with = "location", required_unless_present = "location")]
        tutor: Option<String>,
        /// Location id
        #[arg(long)]
        location: Option<String>,
        /// Day index, 0 = Sunday .. 6 = Saturday
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=6))]
        day: u8,
        /// Start time (HH:MM)
        #[arg(long, value_parser = parse_time)]
        start: NaiveTime,
        /// End time (HH:MM)
        #[arg(long, value_parser = parse_time)]
        end: NaiveTime,
        /// Snapshot file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Show the current planning week
    Week {
        /// Snapshot file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Date to evaluate instead of today (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        today: Option<NaiveDate>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if cli.verbose { "debug" } else { "warn" })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Conflicts { input, json } => {
            let snapshot = load_snapshot(input.as_deref(), &config)?;
            let conflicts = detect_all_conflicts(&snapshot);

            if json {
                println!("{}", serde_json::to_string_pretty(&conflicts)?);
            } else if conflicts.is_empty() {
                println!("No conflicts detected");
            } else {
                println!("{} conflict(s) found:", conflicts.len());
                for conflict in &conflicts {
                    println!("- {}", conflict.message);
                }
            }
        }
        Commands::Check {
            course_id,
            input,
            json,
        } => {
            let snapshot = load_snapshot(input.as_deref(), &config)?;
            let course = snapshot
                .course(&course_id)
                .with_context(|| format!("Unknown course: '{}'", course_id))?;
            let assessment = assess_course(course, &snapshot, &config);

            if json {
                let report = serde_json::json!({
                    "assessment": &assessment,
                    "blocking": assessment.is_blocking(),
                    "blockingReasons": assessment.blocking_reasons(),
                    "warnings": assessment.warnings(),
                });
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("Course \"{}\" ({})", course.name, course.id);
                for reason in assessment.blocking_reasons() {
                    println!("BLOCKING: {}", reason);
                }
                for warning in assessment.warnings() {
                    println!("WARNING: {}", warning);
                }
                if assessment.is_clean() {
                    println!("OK: no issues found");
                }
            }

            if assessment.is_blocking() {
                process::exit(EXIT_BLOCKING);
            }
        }
        Commands::Available {
            tutor,
            location,
            day,
            start,
            end,
            input,
        } => {
            let snapshot = load_snapshot(input.as_deref(), &config)?;
            let (name, available) = match (tutor.as_deref(), location.as_deref()) {
                (Some(id), _) => (
                    snapshot.tutor_name(id),
                    is_tutor_available(&snapshot, id, day, start, end, &config.periods),
                ),
                (None, Some(id)) => (
                    snapshot.location_name(id),
                    is_location_available(&snapshot, id, day, start, end, &config.periods),
                ),
                (None, None) => anyhow::bail!("Either --tutor or --location is required"),
            };

            println!(
                "{} is {} on {} {}-{}",
                name,
                if available { "available" } else { "NOT available" },
                day_name(day),
                start.format("%H:%M"),
                end.format("%H:%M")
            );
        }
        Commands::Week { input, today } => {
            let snapshot = load_snapshot(input.as_deref(), &config)?;
            let today = today.unwrap_or_else(|| Local::now().date_naive());

            match current_week(snapshot.week1_start, today, config.planning_weeks) {
                Some(week) => {
                    let starts = week_start_date(week, snapshot.week1_start)
                        .map(|d| d.format("%-d %b %Y").to_string())
                        .unwrap_or_default();
                    println!("Week {} (w/b {})", week, starts);
                }
                None if snapshot.week1_start.is_some() => println!("Outside planning period"),
                None => println!("Week 1 start date not set"),
            }
        }
    }

    Ok(())
}

fn parse_time(s: &str) -> std::result::Result<NaiveTime, String> {
    calendar::parse_clock(s).map_err(|e| e.to_string())
}

fn parse_date(s: &str) -> std::result::Result<NaiveDate, String> {
    calendar::parse_iso_date(s).map_err(|e| e.to_string())
}

fn load_config(path: Option<&str>) -> Result<PlannerConfig> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path))?;
            let config = PlannerConfig::from_json(&json)
                .with_context(|| format!("Failed to parse config: {}", path))?;
            debug!(path, ?config, "loaded config");
            Ok(config)
        }
        None => Ok(PlannerConfig::default()),
    }
}

fn load_snapshot(path: Option<&str>, config: &PlannerConfig) -> Result<Snapshot> {
    let json = read_input(path)?;
    Snapshot::from_json_with_horizon(&json, config.planning_weeks)
        .context("Failed to load snapshot")
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
