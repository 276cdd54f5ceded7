use anyhow::Result;
use clap::Args;

use noema_core::memory::DEFAULT_SEARCH_LIMIT;
use noema_core::model::MemoryTier;

use crate::output;

#[derive(Args)]
pub struct SearchArgs {
    /// Memory tier (episodic, semantic, procedural)
    pub tier: String,

    /// Free-text query; tokens are matched as substrings
    pub query: String,

    /// Maximum number of results
    #[arg(default_value_t = DEFAULT_SEARCH_LIMIT)]
    pub limit: usize,
}

pub fn run(args: &SearchArgs) -> Result<()> {
    let tier = MemoryTier::parse(&args.tier)?;
    let store = super::memory_store()?;
    let hits = store.search(tier, &args.query, args.limit)?;
    output::emit(&hits)
}
