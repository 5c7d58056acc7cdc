//! Tally CLI
//!
//! Terminal calculator that records every interaction into the activity log
//! and prints the log when the session ends.
//!
//! # Usage
//!
//! ```bash
//! tally --help
//! tally run 7 + 8 =
//! tally --watch --max-entries 20 demo
//! tally --json run 1 / 0 =
//! ```

#![deny(unsafe_code)]

mod calculator;
mod display;

use anyhow::{Context, Result};
use calculator::{Calculator, Key};
use clap::{Parser, Subcommand};
use eventlog::validator::Validate;
use eventlog::{EventLog, EventLogConfig, LogLevel};
use serde_json::json;
use std::io::{self, Write};
use std::sync::Arc;

/// Key sequence played by the `demo` command.
const DEMO_KEYS: &[&str] = &[
    "7", "+", "8", "=", "*", "2", "=", "±", "1", ".", "5", "/", "0", "=", "C", "9", "-", "4", "-",
    "1", "=", "x²", "ERROR", "ERROR", "ERROR", "M+",
];

/// Token that clears the activity log instead of pressing a key.
const CLEAR_LOG_TOKEN: &str = "clear-log";

/// Tally CLI - calculator with a live activity log
#[derive(Parser)]
#[command(name = "tally")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Maximum number of log entries to keep
    #[arg(short, long, env = "TALLY_MAX_ENTRIES")]
    max_entries: Option<usize>,

    /// Print the final log as JSON instead of a text panel
    #[arg(long)]
    json: bool,

    /// Print each entry as soon as it is recorded
    #[arg(short, long)]
    watch: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Press the given keys in order (use `clear-log` to clear the log)
    Run {
        /// Keys such as 7, +, =, C, √, ERROR
        #[arg(required = true, allow_hyphen_values = true)]
        keys: Vec<String>,
    },
    /// Play a scripted session that exercises every key family
    Demo,
}

/// One step of a session.
#[derive(Debug, Clone, PartialEq)]
enum Input {
    Press(Key),
    ClearLog,
}

fn parse_inputs<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<Input>> {
    tokens
        .iter()
        .map(|token| match token.as_ref() {
            CLEAR_LOG_TOKEN => Ok(Input::ClearLog),
            key => key
                .parse()
                .map(Input::Press)
                .with_context(|| format!("cannot press {key:?}")),
        })
        .collect()
}

fn load_config(max_entries: Option<usize>) -> Result<EventLogConfig> {
    let mut config = EventLogConfig::from_env()?;
    if let Some(max_entries) = max_entries {
        config.max_entries = max_entries;
    }
    config.validate()?;
    Ok(config)
}

/// Plays `inputs` against a fresh calculator wired to `log`.
fn run_session(log: &EventLog, inputs: &[Input]) {
    log.record(
        LogLevel::Info,
        "App initialized",
        [(
            "timestamp".to_string(),
            json!(chrono::Utc::now().to_rfc3339()),
        )]
        .into_iter()
        .collect(),
    );

    let mut calculator = Calculator::new(log);
    for input in inputs {
        match input {
            Input::Press(key) => calculator.press(key),
            Input::ClearLog => display::clear_logs(log),
        }
    }

    tracing::debug!(display = calculator.display(), "Session finished");
}

fn print_log<W: Write>(log: &EventLog, as_json: bool, out: &mut W) -> Result<()> {
    let entries = log.entries();
    if as_json {
        serde_json::to_writer_pretty(&mut *out, &entries)?;
        writeln!(out)?;
    } else {
        display::render_panel(&entries, out)?;
    }
    Ok(())
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let inputs = match &cli.command {
        Some(Commands::Run { keys }) => parse_inputs(keys.as_slice())?,
        Some(Commands::Demo) => parse_inputs(DEMO_KEYS)?,
        None => {
            println!("Tally CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for usage information");
            return Ok(());
        }
    };

    let log = EventLog::with_config(load_config(cli.max_entries)?);
    let feed = cli
        .watch
        .then(|| log.subscribe(Arc::new(display::LiveFeed::new(io::stdout()))));

    run_session(&log, &inputs);

    if let Some(subscription) = feed {
        subscription.unsubscribe();
        println!();
    }

    let stdout = io::stdout();
    print_log(&log, cli.json, &mut stdout.lock())
}
