//! Colored stderr rendering for workflow log entries.

use serde_json::Value;

use crate::commands::log::LogEntry;

const RESET: &str = "\x1b[0m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const BLUE: &str = "\x1b[34m";
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";
const AGENT: &str = "\x1b[38;5;208m";
const COMMAND: &str = "\x1b[38;5;141m";
const SKILL: &str = "\x1b[38;5;205m";
const HOOK: &str = "\x1b[38;5;75m";

fn icon(event: &str) -> &'static str {
    match event {
        "START" => "\u{1f7e2}",
        "END" => "\u{1f535}",
        "ERROR" => "\u{1f534}",
        "PASS" => "\u{2705}",
        "FAIL" => "\u{274c}",
        "INFO" => "\u{2139}\u{fe0f}",
        _ => "\u{1f4cc}",
    }
}

fn type_color(kind: &str) -> &'static str {
    match kind {
        "AGENT" => AGENT,
        "COMMAND" => COMMAND,
        "SKILL" => SKILL,
        "HOOK" => HOOK,
        _ => CYAN,
    }
}

fn event_color(event: &str) -> &'static str {
    match event {
        "START" | "PASS" => GREEN,
        "END" => BLUE,
        "ERROR" | "FAIL" => RED,
        _ => CYAN,
    }
}

pub fn render(entry: &LogEntry) -> String {
    let mut line = format!(
        "{} {}[{}:{}]{RESET} {}{}{RESET}",
        icon(&entry.event),
        type_color(&entry.kind),
        entry.kind,
        entry.name,
        event_color(&entry.event),
        entry.event,
    );

    if let Some(meta) = &entry.meta {
        if let Some(duration) = meta.get("duration").and_then(Value::as_f64) {
            line.push_str(&format!(" {DIM}({duration:.1}s){RESET}"));
        }
        if let Some(status) = meta.get("status").and_then(Value::as_str) {
            let color = if status == "success" { GREEN } else { RED };
            line.push_str(&format!(" {color}{status}{RESET}"));
        }
        if let Some(task) = meta.get("task").and_then(Value::as_str) {
            line.push_str(&format!(
                "\n   \u{2514}\u{2500} {DIM}task: \"{}\"{RESET}",
                truncate(task, 50)
            ));
        }
        if let Some(error) = meta.get("error").and_then(Value::as_str) {
            line.push_str(&format!(
                "\n   \u{2514}\u{2500} {RED}error: {}{RESET}",
                truncate(error, 80)
            ));
        }
        if let Some(reason) = meta.get("reason").and_then(Value::as_str) {
            line.push_str(&format!(
                "\n   \u{2514}\u{2500} {DIM}reason: {reason}{RESET}"
            ));
        }
    }

    line
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let head: String = text.chars().take(max).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}
