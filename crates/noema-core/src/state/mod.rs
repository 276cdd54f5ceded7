//! The single mutable working-state record and the workflow state machine
//! that moves it between phases.

pub mod path;

use std::io::ErrorKind;

use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};

use crate::codec;
use crate::error::CoreError;
use crate::model::{TraceEvent, WorkflowNode, WorkingState};
use crate::storage::{self, records, MemoryHome};

/// Outcome of one workflow transition.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Transition {
    pub from: String,
    pub to: WorkflowNode,
}

/// Accessor for the working-state record. Every mutating operation is a
/// full read-modify-write that stamps `updated_at` before persisting.
pub struct StateStore {
    home: MemoryHome,
}

impl StateStore {
    pub fn new(home: MemoryHome) -> Self {
        Self { home }
    }

    pub fn home(&self) -> &MemoryHome {
        &self.home
    }

    /// Build and persist a fresh default-shaped state, replacing any prior
    /// state. Never merges with what was there before.
    pub fn init(&self, project_hash: Option<String>) -> Result<WorkingState, CoreError> {
        let hash = match project_hash {
            Some(hash) => hash,
            None => storage::current_project_hash()?,
        };
        let state = WorkingState::new(hash);
        let mut value = serde_json::to_value(&state)?;
        self.persist(&mut value)?;
        serde_json::from_value(value).map_err(CoreError::from)
    }

    /// The whole state, or the value at a dot-delimited key.
    pub fn get(&self, key: Option<&str>) -> Result<Value, CoreError> {
        let state = self.load_required()?;
        match key {
            None => Ok(state),
            Some(key) => path::lookup(&state, key)
                .cloned()
                .ok_or_else(|| CoreError::NotFound(format!("key {key}"))),
        }
    }

    /// Assign a leaf, creating missing intermediate mappings along the way.
    /// String values that look like JSON literals are decoded first; decode
    /// failures store the text verbatim.
    pub fn set(&self, key: &str, raw: &str) -> Result<Value, CoreError> {
        let decoded = codec::decode_flexible(raw);
        let mut state = self.load_required()?;
        let (parent, leaf) = path::resolve_parent(&mut state, key)?;
        parent.insert(leaf, decoded.clone());
        self.persist(&mut state)?;
        Ok(decoded)
    }

    /// Append to a sequence leaf, creating an empty sequence when absent.
    pub fn append(&self, key: &str, raw: &str) -> Result<Value, CoreError> {
        let decoded = codec::decode_flexible(raw);
        self.append_value(key, decoded.clone())?;
        Ok(decoded)
    }

    /// Append an already-decoded value. This is the shared write path used
    /// by the failure monitor as well as the command surface.
    pub fn append_value(&self, key: &str, value: Value) -> Result<(), CoreError> {
        let mut state = self.load_required()?;
        let (parent, leaf) = path::resolve_parent(&mut state, key)?;
        let slot = parent
            .entry(leaf)
            .or_insert_with(|| Value::Array(Vec::new()));
        match slot.as_array_mut() {
            Some(items) => items.push(value),
            None => return Err(CoreError::TypeMismatch(format!("key {key} is not a list"))),
        }
        self.persist(&mut state)?;
        Ok(())
    }

    /// Move the workflow to `node` and append the transition to the trace.
    /// Membership is the only constraint: any node may follow any other,
    /// and a no-op transition is still recorded.
    pub fn transition(&self, node: &str) -> Result<Transition, CoreError> {
        let to = WorkflowNode::parse(node)?;
        let mut state = self.load_required()?;
        let from = state
            .get("current_node")
            .and_then(Value::as_str)
            .ok_or_else(|| CoreError::NotFound("key current_node".into()))?
            .to_string();

        state["current_node"] = json!(to);
        let event = TraceEvent::transition(from.clone(), to.as_str());
        let trace = state
            .get_mut("thought_trace")
            .and_then(Value::as_array_mut)
            .ok_or_else(|| CoreError::TypeMismatch("key thought_trace is not a list".into()))?;
        trace.push(serde_json::to_value(&event)?);

        self.persist(&mut state)?;
        Ok(Transition { from, to })
    }

    /// Re-initialize for a new episode, preserving only the project hash
    /// (recomputed from the working directory when no prior state exists).
    pub fn reset(&self) -> Result<WorkingState, CoreError> {
        let hash = self.load()?.and_then(|state| {
            state
                .get("project_hash")
                .and_then(Value::as_str)
                .map(str::to_string)
        });
        self.init(hash)
    }

    /// The full current record; `NotFound` when uninitialized.
    pub fn dump(&self) -> Result<Value, CoreError> {
        self.load_required()
    }

    /// The current record parsed into its typed shape.
    pub fn dump_typed(&self) -> Result<WorkingState, CoreError> {
        serde_json::from_value(self.load_required()?).map_err(CoreError::from)
    }

    fn load_required(&self) -> Result<Value, CoreError> {
        self.load()?
            .ok_or_else(|| CoreError::NotFound("active working state (run `init` first)".into()))
    }

    /// `None` when no state file exists yet.
    fn load(&self) -> Result<Option<Value>, CoreError> {
        match records::read_json(&self.home.state_file()) {
            Ok(state) => Ok(Some(state)),
            Err(CoreError::Io(err)) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Stamp `updated_at` and write the record under an exclusive lock.
    fn persist(&self, state: &mut Value) -> Result<(), CoreError> {
        self.home.ensure_dirs()?;
        if let Some(map) = state.as_object_mut() {
            map.insert("updated_at".into(), json!(Utc::now()));
        }
        records::write_json(&self.home.state_file(), state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, StateStore) {
        let tmp = TempDir::new().unwrap();
        let store = StateStore::new(MemoryHome::new(tmp.path().join("store")));
        (tmp, store)
    }

    #[test]
    fn test_init_then_dump() {
        let (_tmp, store) = store();
        let state = store.init(Some("hash1234".into())).unwrap();

        let dumped = store.dump().unwrap();
        assert_eq!(dumped["current_node"], "PLANNER");
        assert_eq!(dumped["thought_trace"], json!([]));
        assert_eq!(dumped["episode_id"], json!(state.episode_id));
        assert_eq!(dumped["project_hash"], "hash1234");
    }

    #[test]
    fn test_init_replaces_prior_state() {
        let (_tmp, store) = store();
        let first = store.init(Some("h".into())).unwrap();
        store.set("user_query", "solve it").unwrap();

        let second = store.init(Some("h".into())).unwrap();
        assert_ne!(first.episode_id, second.episode_id);
        assert_eq!(store.get(Some("user_query")).unwrap(), json!(""));
    }

    #[test]
    fn test_dump_without_init_is_not_found() {
        let (_tmp, store) = store();
        assert!(matches!(store.dump(), Err(CoreError::NotFound(_))));
    }

    #[test]
    fn test_set_then_get_nested() {
        let (_tmp, store) = store();
        store.init(Some("h".into())).unwrap();

        store.set("problem_reflection.goal", "x").unwrap();
        assert_eq!(
            store.get(Some("problem_reflection.goal")).unwrap(),
            json!("x")
        );
        assert!(matches!(
            store.get(Some("problem_reflection.nonexistent")),
            Err(CoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_set_decodes_json_literals() {
        let (_tmp, store) = store();
        store.init(Some("h".into())).unwrap();

        store.set("current_plan", r#"["step one", "step two"]"#).unwrap();
        assert_eq!(
            store.get(Some("current_plan")).unwrap(),
            json!(["step one", "step two"])
        );

        // Invalid literal stays verbatim.
        store.set("selected_solution", "[unclosed").unwrap();
        assert_eq!(
            store.get(Some("selected_solution")).unwrap(),
            json!("[unclosed")
        );
    }

    #[test]
    fn test_set_creates_missing_intermediates() {
        let (_tmp, store) = store();
        store.init(Some("h".into())).unwrap();

        store.set("scratch.notes.first", "ok").unwrap();
        assert_eq!(store.get(Some("scratch.notes.first")).unwrap(), json!("ok"));
    }

    #[test]
    fn test_append_in_order() {
        let (_tmp, store) = store();
        store.init(Some("h".into())).unwrap();

        store.append("thought_trace", "one").unwrap();
        store.append("thought_trace", "two").unwrap();
        assert_eq!(
            store.get(Some("thought_trace")).unwrap(),
            json!(["one", "two"])
        );
    }

    #[test]
    fn test_append_creates_missing_sequence() {
        let (_tmp, store) = store();
        store.init(Some("h".into())).unwrap();

        store.append("scratch.items", "a").unwrap();
        assert_eq!(store.get(Some("scratch.items")).unwrap(), json!(["a"]));
    }

    #[test]
    fn test_append_to_non_sequence_fails_without_mutation() {
        let (_tmp, store) = store();
        store.init(Some("h".into())).unwrap();

        let err = store.append("user_query", "oops").unwrap_err();
        assert!(matches!(err, CoreError::TypeMismatch(_)));
        assert_eq!(store.get(Some("user_query")).unwrap(), json!(""));
    }

    #[test]
    fn test_transition_records_trace_event() {
        let (_tmp, store) = store();
        store.init(Some("h".into())).unwrap();

        let t = store.transition("coder").unwrap();
        assert_eq!(t.from, "PLANNER");
        assert_eq!(t.to, WorkflowNode::Coder);

        let dumped = store.dump().unwrap();
        assert_eq!(dumped["current_node"], "CODER");
        let trace = dumped["thought_trace"].as_array().unwrap();
        assert_eq!(trace.len(), 1);
        assert_eq!(trace[0]["type"], "transition");
        assert_eq!(trace[0]["from"], "PLANNER");
        assert_eq!(trace[0]["to"], "CODER");
    }

    #[test]
    fn test_noop_transition_is_still_logged() {
        let (_tmp, store) = store();
        store.init(Some("h".into())).unwrap();

        store.transition("PLANNER").unwrap();
        let trace = store.get(Some("thought_trace")).unwrap();
        assert_eq!(trace.as_array().unwrap().len(), 1);
        assert_eq!(trace[0]["from"], "PLANNER");
        assert_eq!(trace[0]["to"], "PLANNER");
    }

    #[test]
    fn test_invalid_transition_leaves_state_untouched() {
        let (_tmp, store) = store();
        store.init(Some("h".into())).unwrap();
        store.transition("verifier").unwrap();

        let err = store.transition("bogus").unwrap_err();
        assert!(matches!(err, CoreError::InvalidState { .. }));

        let dumped = store.dump().unwrap();
        assert_eq!(dumped["current_node"], "VERIFIER");
        assert_eq!(dumped["thought_trace"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_reset_preserves_project_hash_only() {
        let (_tmp, store) = store();
        let first = store.init(Some("keepme00".into())).unwrap();
        store.set("user_query", "old query").unwrap();
        store.transition("coder").unwrap();

        let fresh = store.reset().unwrap();
        assert_eq!(fresh.project_hash, "keepme00");
        assert_ne!(fresh.episode_id, first.episode_id);
        assert_eq!(fresh.user_query, "");
        assert_eq!(fresh.current_node, WorkflowNode::Planner);
        assert!(fresh.thought_trace.is_empty());
    }

    #[test]
    fn test_updated_at_moves_forward() {
        let (_tmp, store) = store();
        store.init(Some("h".into())).unwrap();
        let before = store.dump_typed().unwrap().updated_at;

        store.set("user_query", "q").unwrap();
        let after = store.dump_typed().unwrap().updated_at;
        assert!(after >= before);
    }
}
