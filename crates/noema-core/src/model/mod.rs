mod node;
mod record;
mod state;

pub use node::WorkflowNode;
pub use record::{generate_id, MemoryRecord, MemoryTier};
pub use state::{ProblemReflection, TestResults, TraceEvent, WorkingState};
