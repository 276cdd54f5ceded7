use anyhow::Result;
use clap::Args;

use crate::output;

#[derive(Args)]
pub struct InitArgs {
    /// Project hash to carry (default: hash of the working directory)
    pub project_hash: Option<String>,
}

pub fn run(args: &InitArgs) -> Result<()> {
    let store = super::state_store()?;
    let state = store.init(args.project_hash.clone())?;
    output::emit(&state)
}
