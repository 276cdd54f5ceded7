use anyhow::Result;
use clap::Args;

use noema_core::model::MemoryTier;

use crate::output;

#[derive(Args)]
pub struct StoreArgs {
    /// Memory tier (episodic, semantic, procedural)
    pub tier: String,

    /// Record content; JSON literals become the record's data
    pub content: String,

    /// Comma-separated tags
    pub tags: Option<String>,
}

pub fn run(args: &StoreArgs) -> Result<()> {
    let tier = MemoryTier::parse(&args.tier)?;
    let tags = args
        .tags
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect();

    let store = super::memory_store()?;
    let stored = store.store(tier, &args.content, tags)?;
    output::emit(&serde_json::json!({
        "success": true,
        "id": stored.id,
        "type": stored.tier,
    }))
}
