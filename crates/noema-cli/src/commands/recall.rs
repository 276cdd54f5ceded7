use anyhow::Result;
use clap::Args;

use crate::output;

#[derive(Args)]
pub struct RecallArgs {
    /// Record id (12 hex chars)
    pub id: String,
}

pub fn run(args: &RecallArgs) -> Result<()> {
    let store = super::memory_store()?;
    let record = store.recall(&args.id)?;
    output::emit(&record)
}
