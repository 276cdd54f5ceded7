use anyhow::Result;
use clap::Args;

use crate::output;

#[derive(Args)]
pub struct UpdateArgs {
    /// Dot-delimited key of a list (created empty when absent)
    pub key: String,

    /// Value to append; text starting with `[` or `{` is decoded as JSON
    pub value: String,
}

pub fn run(args: &UpdateArgs) -> Result<()> {
    let store = super::state_store()?;
    let appended = store.append(&args.key, &args.value)?;
    output::emit(&serde_json::json!({
        "success": true,
        "key": args.key,
        "appended": appended,
    }))
}
