use std::io::Read as _;

use anyhow::{Context, Result};

use crate::output;

pub fn run() -> Result<()> {
    let mut tool_output = String::new();
    std::io::stdin()
        .read_to_string(&mut tool_output)
        .context("could not read tool output from stdin")?;

    let store = super::state_store()?;
    let report = noema_core::monitor::observe(&store, &tool_output)?;
    output::emit(&report)
}
