use anyhow::Result;

use crate::output;

pub fn run() -> Result<()> {
    let state = super::state_store()?;
    let memory = super::memory_store()?;
    let report = noema_core::consolidate::consolidate(&state, &memory)?;
    output::emit(&serde_json::json!({
        "success": true,
        "episodic_id": report.episodic_id,
        "learnings": report.learnings,
        "failures": report.failures,
        "message": "working state consolidated to episodic memory",
    }))
}
