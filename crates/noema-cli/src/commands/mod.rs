pub mod consolidate;
pub mod dump;
pub mod get;
pub mod guard;
pub mod init;
pub mod log;
pub mod prune;
pub mod recall;
pub mod reflect;
pub mod reset;
pub mod search;
pub mod set;
pub mod stats;
pub mod store;
pub mod transition;
pub mod update;

use anyhow::{Context, Result};
use clap::Subcommand;

use noema_core::memory::MemoryStore;
use noema_core::state::StateStore;
use noema_core::storage::MemoryHome;

#[derive(Subcommand)]
pub enum Commands {
    /// Start a fresh working state for a new episode
    Init(init::InitArgs),
    /// Read the working state, or one dot-delimited key
    Get(get::GetArgs),
    /// Assign a value at a dot-delimited key
    Set(set::SetArgs),
    /// Append a value to a list at a dot-delimited key
    Update(update::UpdateArgs),
    /// Move the workflow to another node
    Transition(transition::TransitionArgs),
    /// Re-initialize, keeping only the project hash
    Reset,
    /// Print the full working state
    Dump,
    /// Keyword-search one memory tier
    Search(search::SearchArgs),
    /// Store a record in a memory tier
    Store(store::StoreArgs),
    /// Fetch a record by id, updating its access accounting
    Recall(recall::RecallArgs),
    /// Distill the working state into episodic and procedural memory
    Consolidate,
    /// Show per-tier record counts and sizes
    Stats,
    /// Delete old, never-recalled records
    Prune(prune::PruneArgs),
    /// Append a workflow log entry (file and console)
    Log(log::LogArgs),
    /// Safety predicates for tool-use hooks
    #[command(subcommand)]
    Guard(guard::GuardCommand),
    /// Inspect tool output on stdin for failure signatures
    Reflect,
}

/// Resolve the store root (`NOEMA_HOME` override, else `~/.noema`).
pub fn open_home() -> Result<MemoryHome> {
    MemoryHome::resolve().context("could not resolve the noema home directory")
}

pub fn state_store() -> Result<StateStore> {
    Ok(StateStore::new(open_home()?))
}

pub fn memory_store() -> Result<MemoryStore> {
    Ok(MemoryStore::new(open_home()?))
}
