use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::node::WorkflowNode;

/// Structured restatement of the task, filled in during PLANNER.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProblemReflection {
    pub goal: String,
    pub inputs: Vec<Value>,
    pub outputs: Vec<Value>,
    pub constraints: Vec<Value>,
    pub edge_cases: Vec<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TestResults {
    pub public_tests: Vec<Value>,
    pub ai_tests: Vec<Value>,
    pub anchor_tests: Vec<Value>,
}

/// The single in-progress episode record. Field order is the default JSON
/// shape written by `init`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkingState {
    // Task
    pub user_query: String,
    pub problem_reflection: ProblemReflection,

    // Thought process
    pub current_plan: Vec<Value>,
    pub thought_trace: Vec<Value>,
    pub critiques: Vec<Value>,
    pub possible_solutions: Vec<Value>,
    pub selected_solution: String,

    // Execution context
    pub file_context: Map<String, Value>,
    pub test_results: TestResults,
    pub error_log: Vec<Value>,

    // Cycle control
    pub current_node: WorkflowNode,
    pub retry_count: u32,
    pub max_retries: u32,

    // Meta
    pub episode_id: String,
    pub project_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WorkingState {
    /// Fresh default-shaped state. Nested defaults are built per instance,
    /// never shared with a template.
    pub fn new(project_hash: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            user_query: String::new(),
            problem_reflection: ProblemReflection::default(),
            current_plan: Vec::new(),
            thought_trace: Vec::new(),
            critiques: Vec::new(),
            possible_solutions: Vec::new(),
            selected_solution: String::new(),
            file_context: Map::new(),
            test_results: TestResults::default(),
            error_log: Vec::new(),
            current_node: WorkflowNode::Planner,
            retry_count: 0,
            max_retries: 3,
            episode_id: fresh_episode_id(),
            project_hash: project_hash.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Short episode id: the first 8 hex chars of a v4 UUID.
fn fresh_episode_id() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

/// One phase transition in the audit trail. Append-only: once pushed into
/// `thought_trace` an event is never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TraceEvent {
    #[serde(rename = "type")]
    pub kind: String,
    pub from: String,
    pub to: String,
    pub timestamp: DateTime<Utc>,
}

impl TraceEvent {
    pub fn transition(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            kind: "transition".into(),
            from: from.into(),
            to: to.into(),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_defaults() {
        let state = WorkingState::new("abc12345");
        assert_eq!(state.current_node, WorkflowNode::Planner);
        assert_eq!(state.retry_count, 0);
        assert_eq!(state.max_retries, 3);
        assert_eq!(state.episode_id.len(), 8);
        assert!(state.thought_trace.is_empty());
        assert!(state.user_query.is_empty());
        assert_eq!(state.created_at, state.updated_at);
    }

    #[test]
    fn test_fresh_states_do_not_share_ids() {
        let a = WorkingState::new("same");
        let b = WorkingState::new("same");
        assert_ne!(a.episode_id, b.episode_id);
    }

    #[test]
    fn test_default_shape_keys() {
        let state = WorkingState::new("abc12345");
        let value = serde_json::to_value(&state).unwrap();
        for key in [
            "user_query",
            "problem_reflection",
            "current_plan",
            "thought_trace",
            "critiques",
            "possible_solutions",
            "selected_solution",
            "file_context",
            "test_results",
            "error_log",
            "current_node",
            "retry_count",
            "max_retries",
            "episode_id",
            "project_hash",
            "created_at",
            "updated_at",
        ] {
            assert!(value.get(key).is_some(), "missing key {key}");
        }
        assert_eq!(value["current_node"], "PLANNER");
        assert_eq!(
            value["problem_reflection"]["edge_cases"],
            serde_json::json!([])
        );
    }

    #[test]
    fn test_trace_event_shape() {
        let event = TraceEvent::transition("PLANNER", "CODER");
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "transition");
        assert_eq!(value["from"], "PLANNER");
        assert_eq!(value["to"], "CODER");
        assert!(value.get("timestamp").is_some());
    }
}
