use anyhow::Result;
use clap::Args;

use crate::output;

#[derive(Args)]
pub struct TransitionArgs {
    /// Target node (case-insensitive)
    pub node: String,
}

pub fn run(args: &TransitionArgs) -> Result<()> {
    let store = super::state_store()?;
    let transition = store.transition(&args.node)?;
    output::emit(&serde_json::json!({
        "success": true,
        "from": transition.from,
        "to": transition.to,
    }))
}
