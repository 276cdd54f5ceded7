use anyhow::Result;

use crate::output;

pub fn run() -> Result<()> {
    let store = super::memory_store()?;
    let stats = store.stats()?;
    output::emit(&stats)
}
