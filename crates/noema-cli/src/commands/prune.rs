use anyhow::Result;
use clap::Args;

use noema_core::memory::DEFAULT_PRUNE_DAYS;

use crate::output;

#[derive(Args)]
pub struct PruneArgs {
    /// Age cutoff in days; 0 prunes every never-recalled record
    #[arg(default_value_t = DEFAULT_PRUNE_DAYS)]
    pub days: i64,
}

pub fn run(args: &PruneArgs) -> Result<()> {
    let store = super::memory_store()?;
    let report = store.prune(args.days)?;
    output::emit(&report)
}
