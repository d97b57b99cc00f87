pub mod list_clients;
pub mod login;
pub mod register;

pub use list_clients::ListClients;
pub use login::{LoginError, LoginOutcome, LoginUseCase};
pub use register::RegisterUseCase;
