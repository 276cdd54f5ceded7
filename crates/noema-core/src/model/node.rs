use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The six workflow phases. Any node may transition to any other; the state
/// machine enforces membership, not adjacency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkflowNode {
    Planner,
    Reasoner,
    Coder,
    Verifier,
    Reflector,
    Consolidator,
}

impl WorkflowNode {
    pub const ALL: [WorkflowNode; 6] = [
        WorkflowNode::Planner,
        WorkflowNode::Reasoner,
        WorkflowNode::Coder,
        WorkflowNode::Verifier,
        WorkflowNode::Reflector,
        WorkflowNode::Consolidator,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowNode::Planner => "PLANNER",
            WorkflowNode::Reasoner => "REASONER",
            WorkflowNode::Coder => "CODER",
            WorkflowNode::Verifier => "VERIFIER",
            WorkflowNode::Reflector => "REFLECTOR",
            WorkflowNode::Consolidator => "CONSOLIDATOR",
        }
    }

    /// Parse a node name, normalizing case. The error lists the valid set.
    pub fn parse(input: &str) -> Result<Self, CoreError> {
        let normalized = input.to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|node| node.as_str() == normalized)
            .ok_or_else(|| CoreError::InvalidState {
                node: normalized,
                valid: Self::valid_set(),
            })
    }

    fn valid_set() -> String {
        Self::ALL
            .iter()
            .map(|node| node.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::fmt::Display for WorkflowNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
