//! ID type wrappers for type safety.

mod id_macro;

pub mod client_id;
pub mod command_id;

pub use client_id::ClientId;
pub use command_id::CommandId;
