//! Distills a completed working state into durable memory: one episodic
//! record per episode, plus one procedural record per critique that carries
//! a correction.

use serde::Serialize;
use serde_json::{json, Value};

use crate::error::CoreError;
use crate::memory::MemoryStore;
use crate::model::MemoryTier;
use crate::state::StateStore;

/// Only the last transitions are kept in the episodic summary.
const TRACE_SUMMARY_LEN: usize = 10;

/// Outcome of one consolidation pass.
#[derive(Debug, Clone, Serialize)]
pub struct ConsolidationReport {
    pub episodic_id: String,
    pub learnings: usize,
    pub failures: Vec<String>,
}

/// Consolidate the working state into the memory tiers. Incomplete episodes
/// are rejected up front; nothing is written for them.
pub fn consolidate(
    state: &StateStore,
    memory: &MemoryStore,
) -> Result<ConsolidationReport, CoreError> {
    let snapshot = state.dump()?;

    if !has_text(&snapshot, "user_query") || !has_text(&snapshot, "selected_solution") {
        return Err(CoreError::IncompleteEpisode(
            "user_query and selected_solution must be set before consolidating".into(),
        ));
    }

    let episode_id = text(&snapshot, "episode_id");
    let episode = json!({
        "user_query": snapshot.get("user_query").cloned().unwrap_or(Value::Null),
        "problem_reflection": snapshot.get("problem_reflection").cloned().unwrap_or(Value::Null),
        "selected_solution": snapshot.get("selected_solution").cloned().unwrap_or(Value::Null),
        "thought_trace_summary": summarize_trace(snapshot.get("thought_trace")),
        "critiques": snapshot.get("critiques").cloned().unwrap_or_else(|| json!([])),
        "test_results": snapshot.get("test_results").cloned().unwrap_or_else(|| json!({})),
        "outcome": outcome(&snapshot),
        "episode_id": episode_id,
        "project_hash": text(&snapshot, "project_hash"),
    });

    let stored = memory.store(
        MemoryTier::Episodic,
        &episode.to_string(),
        vec!["episode".into()],
    )?;

    // Each learning is stored independently: one failed write is reported
    // in the result, never fatal to the rest of the batch.
    let mut learnings = 0usize;
    let mut failures = Vec::new();
    for critique in snapshot
        .get("critiques")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
    {
        let Some(correction) = correction_of(critique) else {
            continue;
        };
        let learning = json!({
            "learning": correction,
            "context": critique.get("root_cause").cloned().unwrap_or_else(|| json!("")),
            "source_episode": episode_id,
        });
        match memory.store(
            MemoryTier::Procedural,
            &learning.to_string(),
            vec!["learning".into(), "correction".into()],
        ) {
            Ok(_) => learnings += 1,
            Err(err) => failures.push(err.to_string()),
        }
    }

    Ok(ConsolidationReport {
        episodic_id: stored.id,
        learnings,
        failures,
    })
}

/// Transition events only, rendered `from -> to`, last 10 kept, oldest
/// first.
fn summarize_trace(trace: Option<&Value>) -> Vec<String> {
    let mut summary: Vec<String> = trace
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter(|item| item.get("type").and_then(Value::as_str) == Some("transition"))
                .map(|item| {
                    format!(
                        "{} -> {}",
                        item.get("from").and_then(Value::as_str).unwrap_or("?"),
                        item.get("to").and_then(Value::as_str).unwrap_or("?"),
                    )
                })
                .collect()
        })
        .unwrap_or_default();
    if summary.len() > TRACE_SUMMARY_LEN {
        summary.drain(..summary.len() - TRACE_SUMMARY_LEN);
    }
    summary
}

fn outcome(snapshot: &Value) -> &'static str {
    match snapshot.get("error_log").and_then(Value::as_array) {
        Some(errors) if !errors.is_empty() => "partial",
        _ => "success",
    }
}

/// A critique qualifies when its `correction` field is present and
/// non-empty.
fn correction_of(critique: &Value) -> Option<&Value> {
    match critique.get("correction")? {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        other => Some(other),
    }
}

fn has_text(snapshot: &Value, key: &str) -> bool {
    snapshot
        .get(key)
        .and_then(Value::as_str)
        .is_some_and(|s| !s.is_empty())
}

fn text(snapshot: &Value, key: &str) -> String {
    snapshot
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
