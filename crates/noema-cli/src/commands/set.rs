use anyhow::Result;
use clap::Args;

use crate::output;

#[derive(Args)]
pub struct SetArgs {
    /// Dot-delimited key; missing intermediate maps are created
    pub key: String,

    /// Value; text starting with `[` or `{` is decoded as JSON
    pub value: String,
}

pub fn run(args: &SetArgs) -> Result<()> {
    let store = super::state_store()?;
    let stored = store.set(&args.key, &args.value)?;
    output::emit(&serde_json::json!({
        "success": true,
        "key": args.key,
        "value": stored,
    }))
}
