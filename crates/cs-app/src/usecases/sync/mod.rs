pub mod agent;
pub mod reconciler;

pub use agent::{AgentError, StopOutcome, SyncAgent, SyncAgentConfig};
pub use reconciler::{ClipboardReconciler, CommandOutcome, TickError, TickReport};
