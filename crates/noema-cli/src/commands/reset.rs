use anyhow::Result;

use crate::output;

pub fn run() -> Result<()> {
    let store = super::state_store()?;
    let state = store.reset()?;
    output::emit(&state)
}
