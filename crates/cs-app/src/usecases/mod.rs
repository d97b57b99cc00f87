pub mod account;
pub mod settings;
pub mod sync;
pub mod typing;

pub use account::{ListClients, LoginError, LoginOutcome, LoginUseCase, RegisterUseCase};
pub use settings::{GetSettings, SetTypingSpeed};
pub use sync::{
    AgentError, ClipboardReconciler, CommandOutcome, StopOutcome, SyncAgent, SyncAgentConfig,
    TickError, TickReport,
};
pub use typing::{
    SendTypingCommand, SendTypingCommandError, TypingCapability, TypingExecutor, TypingOutcome,
};
