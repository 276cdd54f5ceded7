//! Watches completed tool output for failure signatures and records them
//! for the REFLECTOR phase. The monitor only recommends a transition; the
//! caller decides whether to take it.

use serde::Serialize;
use serde_json::{json, Value};

use crate::error::CoreError;
use crate::model::WorkflowNode;
use crate::state::StateStore;

/// Output substrings that indicate a failed command or test run. Matched
/// case-insensitively.
pub const FAILURE_PATTERNS: &[&str] = &[
    "FAILED",
    "FAIL:",
    "Error:",
    "AssertionError",
    "TypeError",
    "SyntaxError",
    "ReferenceError",
    "test failed",
    "tests failed",
    "npm ERR!",
    "pytest: error",
    "FAILURES",
    "panic:",
    "error[E",
];

/// Only this much of the offending output is kept in the error log.
const SNIPPET_LEN: usize = 500;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MonitorReport {
    /// Nothing to analyze: no output, or no active state.
    Skip { reason: String },
    /// Output inspected, nothing recorded.
    Ok { reason: String },
    /// A failure entry was appended to the error log.
    FailureDetected {
        recommendation: WorkflowNode,
        reason: String,
        message: String,
    },
}

/// True when the output carries any failure signature.
pub fn detect_failure(output: &str) -> bool {
    let lowered = output.to_lowercase();
    FAILURE_PATTERNS
        .iter()
        .any(|pattern| lowered.contains(&pattern.to_lowercase()))
}

/// Inspect one completed command's output against the active state.
/// Failures observed during CODER or VERIFIER are appended to `error_log`
/// through the same write path as any other append.
pub fn observe(state: &StateStore, output: &str) -> Result<MonitorReport, CoreError> {
    if output.trim().is_empty() {
        return Ok(MonitorReport::Skip {
            reason: "no tool output".into(),
        });
    }

    let snapshot = match state.dump() {
        Ok(snapshot) => snapshot,
        Err(CoreError::NotFound(_)) => {
            return Ok(MonitorReport::Skip {
                reason: "no active state".into(),
            });
        }
        Err(err) => return Err(err),
    };

    let current = snapshot
        .get("current_node")
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string();
    if current != WorkflowNode::Coder.as_str() && current != WorkflowNode::Verifier.as_str() {
        return Ok(MonitorReport::Ok {
            reason: format!("not in CODER/VERIFIER (currently {current})"),
        });
    }

    if !detect_failure(output) {
        return Ok(MonitorReport::Ok {
            reason: "no failures detected".into(),
        });
    }

    let snippet: String = output.chars().take(SNIPPET_LEN).collect();
    let entry = json!({
        "type": "test_failure",
        "trigger": "automatic",
        "output_snippet": snippet,
        "from_node": current,
    });
    state.append_value("error_log", entry)?;

    Ok(MonitorReport::FailureDetected {
        recommendation: WorkflowNode::Reflector,
        reason: "test failure detected".into(),
        message: "Test failure detected. Consider transitioning to REFLECTOR for analysis.".into(),
    })
}
