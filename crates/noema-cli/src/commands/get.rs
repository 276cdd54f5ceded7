use anyhow::Result;
use clap::Args;

use crate::output;

#[derive(Args)]
pub struct GetArgs {
    /// Dot-delimited key (omit for the whole state)
    pub key: Option<String>,
}

pub fn run(args: &GetArgs) -> Result<()> {
    let store = super::state_store()?;
    let value = store.get(args.key.as_deref())?;
    match &args.key {
        Some(key) => output::emit(&serde_json::json!({ "key": key, "value": value })),
        None => output::emit(&value),
    }
}
