pub mod executor;
pub mod send_command;

pub use executor::{TypingCapability, TypingExecutor, TypingOutcome};
pub use send_command::{SendTypingCommand, SendTypingCommandError};
