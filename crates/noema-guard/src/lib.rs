//! Stateless safety predicates gating the tool layer: a bash-command
//! validator and a file-protection check. Pure functions over strings;
//! nothing here reads or writes the stores.

mod bash;
mod files;

pub use bash::check_command;
pub use files::check_path;

use serde::Serialize;

/// Outcome of a guard check.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct Verdict {
    pub blocked: bool,
    pub reason: Option<String>,
    pub warnings: Vec<String>,
}

impl Verdict {
    /// Allow, with nothing to report.
    pub fn pass() -> Self {
        Self::default()
    }

    pub fn block(reason: impl Into<String>) -> Self {
        Self {
            blocked: true,
            reason: Some(reason.into()),
            warnings: Vec::new(),
        }
    }
}
