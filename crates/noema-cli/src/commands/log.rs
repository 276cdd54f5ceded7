use std::env;
use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Args, ValueEnum};
use serde::Serialize;
use serde_json::Value;

use crate::output;
use crate::output::console;

const LOG_FILE: &str = "workflow.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Component {
    Agent,
    Command,
    Skill,
    Hook,
    Session,
}

impl Component {
    pub fn as_str(&self) -> &'static str {
        match self {
            Component::Agent => "AGENT",
            Component::Command => "COMMAND",
            Component::Skill => "SKILL",
            Component::Hook => "HOOK",
            Component::Session => "SESSION",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Event {
    Start,
    End,
    Error,
    Pass,
    Fail,
    Info,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::Start => "START",
            Event::End => "END",
            Event::Error => "ERROR",
            Event::Pass => "PASS",
            Event::Fail => "FAIL",
            Event::Info => "INFO",
        }
    }
}

#[derive(Args)]
pub struct LogArgs {
    /// Component type
    #[arg(long = "type", value_enum)]
    pub kind: Component,

    /// Component name (e.g. planner, bash-guard)
    #[arg(long)]
    pub name: String,

    /// Event
    #[arg(long, value_enum)]
    pub event: Event,

    /// JSON metadata; unparseable text degrades to {"raw": …}
    #[arg(long)]
    pub meta: Option<String>,

    /// Write a session-start marker instead of a component entry
    #[arg(long)]
    pub init: bool,

    /// Skip the colored stderr rendering
    #[arg(long)]
    pub no_console: bool,

    /// Skip the append to logs/workflow.log
    #[arg(long)]
    pub no_file: bool,
}

/// One line of the append-only workflow log (JSON Lines).
#[derive(Debug, Serialize)]
pub struct LogEntry {
    pub ts: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub event: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

pub fn run(args: &LogArgs) -> Result<()> {
    let home = super::open_home()?;
    home.ensure_dirs()?;
    let log_file = home.logs_dir().join(LOG_FILE);

    if args.init {
        let marker = LogEntry {
            ts: Utc::now(),
            kind: "SESSION".into(),
            name: "noema".into(),
            event: "START".into(),
            meta: Some(serde_json::json!({
                "cwd": env::current_dir()?.display().to_string(),
                "log_file": log_file.display().to_string(),
            })),
        };
        append_line(&log_file, &marker)?;
        return output::emit(&marker);
    }

    let entry = LogEntry {
        ts: Utc::now(),
        kind: args.kind.as_str().into(),
        name: args.name.clone(),
        event: args.event.as_str().into(),
        meta: args.meta.as_deref().map(parse_meta),
    };

    // Console goes to stderr so the JSON result object owns stdout.
    if !args.no_console {
        eprintln!("{}", console::render(&entry));
    }
    if !args.no_file {
        append_line(&log_file, &entry)?;
    }
    output::emit(&entry)
}

fn parse_meta(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| serde_json::json!({ "raw": raw }))
}

fn append_line(path: &Path, entry: &LogEntry) -> Result<()> {
    let line = serde_json::to_string(entry)?;
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("could not open {}", path.display()))?;
    writeln!(file, "{line}")?;
    Ok(())
}
