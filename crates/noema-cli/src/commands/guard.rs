use std::io::Read as _;

use anyhow::{Context, Result};
use clap::Subcommand;
use serde::Deserialize;
use serde_json::Value;

use noema_guard::{check_command, check_path, Verdict};

use crate::output;

#[derive(Subcommand)]
pub enum GuardCommand {
    /// Validate a Bash tool invocation (hook JSON on stdin)
    Bash,
    /// Check an Edit/Write target path (hook JSON on stdin)
    File,
}

/// Tool-use hook payload, as delivered on stdin.
#[derive(Deserialize)]
struct HookEvent {
    #[serde(default)]
    tool_name: String,
    #[serde(default)]
    tool_input: Value,
}

pub fn run(cmd: &GuardCommand) -> Result<()> {
    let mut raw = String::new();
    std::io::stdin()
        .read_to_string(&mut raw)
        .context("could not read hook input from stdin")?;
    let event: HookEvent =
        serde_json::from_str(&raw).context("hook input is not valid JSON")?;

    let verdict = match cmd {
        GuardCommand::Bash => {
            if event.tool_name != "Bash" {
                tracing::debug!("ignoring tool: {}", event.tool_name);
                Verdict::pass()
            } else {
                match event.tool_input.get("command").and_then(Value::as_str) {
                    Some(command) => check_command(command),
                    None => Verdict::pass(),
                }
            }
        }
        GuardCommand::File => {
            if event.tool_name != "Edit" && event.tool_name != "Write" {
                Verdict::pass()
            } else {
                match event.tool_input.get("file_path").and_then(Value::as_str) {
                    Some(path) => check_path(path),
                    None => Verdict::pass(),
                }
            }
        }
    };

    for warning in &verdict.warnings {
        eprintln!("Warning: {warning}");
    }
    if let Some(reason) = &verdict.reason {
        eprintln!("{reason}");
    }

    output::emit(&verdict)?;
    if verdict.blocked {
        // Exit code 2 tells the hook runner to block the tool call.
        std::process::exit(2);
    }
    Ok(())
}
